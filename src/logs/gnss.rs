//! GNSS velocity and position logs.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

const STATUS_SHIFT: u32 = 0;
const STATUS_MASK: u32 = 0x003F;
const TYPE_SHIFT: u32 = 6;
const TYPE_MASK: u32 = 0x003F;

/// GNSS velocity solution status, bits 0–5 of the status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum GnssVelStatus {
    /// A valid solution has been computed.
    SolComputed = 0,
    /// Not enough observations to compute a solution.
    InsufficientObs = 1,
    /// The receiver reported an internal error.
    InternalError = 2,
    /// The velocity limit was exceeded.
    Limit = 3,
}

impl GnssVelStatus {
    fn from_bits(bits: u32) -> Self {
        match bits {
            0 => GnssVelStatus::SolComputed,
            1 => GnssVelStatus::InsufficientObs,
            3 => GnssVelStatus::Limit,
            _ => GnssVelStatus::InternalError,
        }
    }
}

/// GNSS velocity solution type, bits 6–11 of the status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum GnssVelType {
    NoSolution = 0,
    Unknown = 1,
    Doppler = 2,
    Differential = 3,
}

impl GnssVelType {
    fn from_bits(bits: u32) -> Self {
        match bits {
            0 => GnssVelType::NoSolution,
            2 => GnssVelType::Doppler,
            3 => GnssVelType::Differential,
            _ => GnssVelType::Unknown,
        }
    }
}

/// GNSS velocity in the NED frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GnssVel {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// GNSS velocity status bitmask.
    pub status: u32,
    /// GPS time of week, in ms.
    pub time_of_week: u32,
    /// North, East, Down velocity, in m/s.
    pub velocity: [f32; 3],
    /// North, East, Down velocity 1-sigma accuracy, in m/s.
    pub velocity_acc: [f32; 3],
    /// True direction of motion over ground, in degrees.
    pub course: f32,
    /// 1-sigma course accuracy, in degrees.
    pub course_acc: f32,
}

impl GnssVel {
    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let status = cursor.read_u32();
        let time_of_week = cursor.read_u32();

        let velocity = [cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];
        let velocity_acc = [cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];

        let course = cursor.read_f32();
        let course_acc = cursor.read_f32();

        cursor.finish()?;

        Ok(Self { time_stamp, status, time_of_week, velocity, velocity_acc, course, course_acc })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u32(self.status);
        cursor.write_u32(self.time_of_week);

        cursor.write_f32(self.velocity[0]);
        cursor.write_f32(self.velocity[1]);
        cursor.write_f32(self.velocity[2]);

        cursor.write_f32(self.velocity_acc[0]);
        cursor.write_f32(self.velocity_acc[1]);
        cursor.write_f32(self.velocity_acc[2]);

        cursor.write_f32(self.course);
        cursor.write_f32(self.course_acc);

        cursor.finish()
    }

    pub fn solution_status(&self) -> GnssVelStatus {
        GnssVelStatus::from_bits((self.status >> STATUS_SHIFT) & STATUS_MASK)
    }

    pub fn solution_type(&self) -> GnssVelType {
        GnssVelType::from_bits((self.status >> TYPE_SHIFT) & TYPE_MASK)
    }

    pub fn set_solution(&mut self, status: GnssVelStatus, vel_type: GnssVelType) {
        self.status &= !((STATUS_MASK << STATUS_SHIFT) | (TYPE_MASK << TYPE_SHIFT));
        self.status |= ((status as u32) & STATUS_MASK) << STATUS_SHIFT;
        self.status |= ((vel_type as u32) & TYPE_MASK) << TYPE_SHIFT;
    }
}

/// GNSS position solution status, bits 0–5 of the status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum GnssPosStatus {
    SolComputed = 0,
    InsufficientObs = 1,
    InternalError = 2,
    HeightLimit = 3,
}

impl GnssPosStatus {
    fn from_bits(bits: u32) -> Self {
        match bits {
            0 => GnssPosStatus::SolComputed,
            1 => GnssPosStatus::InsufficientObs,
            3 => GnssPosStatus::HeightLimit,
            _ => GnssPosStatus::InternalError,
        }
    }
}

/// GNSS position solution type, bits 6–11 of the status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum GnssPosType {
    NoSolution = 0,
    Unknown = 1,
    Single = 2,
    PseudoRangeDiff = 3,
    Sbas = 4,
    Omnistar = 5,
    RtkFloat = 6,
    RtkFixed = 7,
    PppFloat = 8,
    PppFixed = 9,
    Fixed = 10,
}

impl GnssPosType {
    fn from_bits(bits: u32) -> Self {
        match bits {
            0 => GnssPosType::NoSolution,
            2 => GnssPosType::Single,
            3 => GnssPosType::PseudoRangeDiff,
            4 => GnssPosType::Sbas,
            5 => GnssPosType::Omnistar,
            6 => GnssPosType::RtkFloat,
            7 => GnssPosType::RtkFixed,
            8 => GnssPosType::PppFloat,
            9 => GnssPosType::PppFixed,
            10 => GnssPosType::Fixed,
            _ => GnssPosType::Unknown,
        }
    }
}

/// Geodetic GNSS position.
///
/// Two generations of trailing fields exist: satellite/base-station details,
/// then the extended status and tracked-satellite count. Each tail decodes
/// only when present, so all three payload generations remain readable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GnssPos {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// GNSS position status bitmask.
    pub status: u32,
    /// GPS time of week, in ms.
    pub time_of_week: u32,
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
    /// Altitude above mean sea level, in m.
    pub altitude: f64,
    /// Altitude difference between the geoid and the ellipsoid, in m.
    pub undulation: f32,
    /// 1-sigma latitude accuracy, in m.
    pub latitude_accuracy: f32,
    /// 1-sigma longitude accuracy, in m.
    pub longitude_accuracy: f32,
    /// 1-sigma altitude accuracy, in m.
    pub altitude_accuracy: f32,
    /// Number of space vehicles used in the solution (`u8::MAX` if unknown).
    pub num_sv_used: u8,
    /// Differential base station id (`u16::MAX` if unknown).
    pub base_station_id: u16,
    /// Differential correction age, in 0.01 s (`u16::MAX` if unknown).
    pub differential_age: u16,
    /// Number of space vehicles tracked (`u8::MAX` if unknown).
    pub num_sv_tracked: u8,
    /// Extended status bitmask (interference/authentication monitoring).
    pub status_ext: u32,
}

impl Default for GnssPos {
    fn default() -> Self {
        Self {
            time_stamp: 0,
            status: 0,
            time_of_week: 0,
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            undulation: 0.0,
            latitude_accuracy: 0.0,
            longitude_accuracy: 0.0,
            altitude_accuracy: 0.0,
            num_sv_used: u8::MAX,
            base_station_id: u16::MAX,
            differential_age: u16::MAX,
            num_sv_tracked: u8::MAX,
            status_ext: 0,
        }
    }
}

impl GnssPos {
    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let mut log = Self {
            time_stamp: cursor.read_u32(),
            status: cursor.read_u32(),
            time_of_week: cursor.read_u32(),
            latitude: cursor.read_f64(),
            longitude: cursor.read_f64(),
            altitude: cursor.read_f64(),
            undulation: cursor.read_f32(),
            latitude_accuracy: cursor.read_f32(),
            longitude_accuracy: cursor.read_f32(),
            altitude_accuracy: cursor.read_f32(),
            ..Self::default()
        };

        // First-generation tail: satellite and differential details.
        if cursor.remaining() >= 5 {
            log.num_sv_used = cursor.read_u8();
            log.base_station_id = cursor.read_u16();
            log.differential_age = cursor.read_u16();

            // Second-generation tail: tracked satellites and extended status.
            if cursor.remaining() >= 5 {
                log.num_sv_tracked = cursor.read_u8();
                log.status_ext = cursor.read_u32();
            }
        }

        cursor.finish()?;

        Ok(log)
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u32(self.status);
        cursor.write_u32(self.time_of_week);

        cursor.write_f64(self.latitude);
        cursor.write_f64(self.longitude);
        cursor.write_f64(self.altitude);

        cursor.write_f32(self.undulation);

        cursor.write_f32(self.latitude_accuracy);
        cursor.write_f32(self.longitude_accuracy);
        cursor.write_f32(self.altitude_accuracy);

        cursor.write_u8(self.num_sv_used);
        cursor.write_u16(self.base_station_id);
        cursor.write_u16(self.differential_age);

        cursor.write_u8(self.num_sv_tracked);
        cursor.write_u32(self.status_ext);

        cursor.finish()
    }

    pub fn solution_status(&self) -> GnssPosStatus {
        GnssPosStatus::from_bits((self.status >> STATUS_SHIFT) & STATUS_MASK)
    }

    pub fn solution_type(&self) -> GnssPosType {
        GnssPosType::from_bits((self.status >> TYPE_SHIFT) & TYPE_MASK)
    }

    pub fn set_solution(&mut self, status: GnssPosStatus, pos_type: GnssPosType) {
        self.status &= !((STATUS_MASK << STATUS_SHIFT) | (TYPE_MASK << TYPE_SHIFT));
        self.status |= ((status as u32) & STATUS_MASK) << STATUS_SHIFT;
        self.status |= ((pos_type as u32) & TYPE_MASK) << TYPE_SHIFT;
    }
}
