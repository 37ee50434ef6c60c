//! EKF attitude and navigation solution logs.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

const SOLUTION_MODE_SHIFT: u32 = 0;
const SOLUTION_MODE_MASK: u32 = 0x000F;

/// Kalman filter computation mode, packed in bits 0–3 of the solution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SolutionMode {
    /// The filter is not yet initialized.
    Uninitialized = 0,
    /// Roll and pitch only, from the vertical reference.
    VerticalGyro = 1,
    /// Full attitude with magnetic heading.
    Ahrs = 2,
    /// Attitude plus velocity navigation.
    NavVelocity = 3,
    /// Full navigation: attitude, velocity and position.
    NavPosition = 4,
}

impl SolutionMode {
    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => SolutionMode::VerticalGyro,
            2 => SolutionMode::Ahrs,
            3 => SolutionMode::NavVelocity,
            4 => SolutionMode::NavPosition,
            _ => SolutionMode::Uninitialized,
        }
    }
}

/// Extract the solution mode from an EKF status word.
pub fn status_solution_mode(status: u32) -> SolutionMode {
    SolutionMode::from_bits((status >> SOLUTION_MODE_SHIFT) & SOLUTION_MODE_MASK)
}

/// Store `mode` into an EKF status word, preserving the other bits.
pub fn status_set_solution_mode(status: u32, mode: SolutionMode) -> u32 {
    let cleared = status & !(SOLUTION_MODE_MASK << SOLUTION_MODE_SHIFT);
    cleared | (((mode as u32) & SOLUTION_MODE_MASK) << SOLUTION_MODE_SHIFT)
}

/// The attitude part of the solution is valid.
pub const EKF_ATTITUDE_VALID: u32 = 1 << 4;
/// The heading part of the solution is valid.
pub const EKF_HEADING_VALID: u32 = 1 << 5;
/// The velocity part of the solution is valid.
pub const EKF_VELOCITY_VALID: u32 = 1 << 6;
/// The position part of the solution is valid.
pub const EKF_POSITION_VALID: u32 = 1 << 7;

/// EKF attitude as Euler angles.
///
/// The magnetic declination/inclination fields are a newer addition; older
/// payloads decode with them set to NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EkfEuler {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// Roll, pitch, yaw, in rad.
    pub euler: [f32; 3],
    /// Roll, pitch, yaw 1-sigma standard deviation, in rad.
    pub euler_std: [f32; 3],
    /// EKF solution status bitmask.
    pub status: u32,
    /// Local magnetic declination, in rad (NaN when unavailable).
    pub mag_declination: f32,
    /// Local magnetic inclination, in rad (NaN when unavailable).
    pub mag_inclination: f32,
}

impl Default for EkfEuler {
    fn default() -> Self {
        Self {
            time_stamp: 0,
            euler: [0.0; 3],
            euler_std: [0.0; 3],
            status: 0,
            mag_declination: f32::NAN,
            mag_inclination: f32::NAN,
        }
    }
}

impl EkfEuler {
    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();

        let euler = [cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];
        let euler_std = [cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];

        let status = cursor.read_u32();

        let (mag_declination, mag_inclination) = if cursor.remaining() >= 8 {
            (cursor.read_f32(), cursor.read_f32())
        } else {
            (f32::NAN, f32::NAN)
        };

        cursor.finish()?;

        Ok(Self { time_stamp, euler, euler_std, status, mag_declination, mag_inclination })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);

        cursor.write_f32(self.euler[0]);
        cursor.write_f32(self.euler[1]);
        cursor.write_f32(self.euler[2]);

        cursor.write_f32(self.euler_std[0]);
        cursor.write_f32(self.euler_std[1]);
        cursor.write_f32(self.euler_std[2]);

        cursor.write_u32(self.status);

        cursor.write_f32(self.mag_declination);
        cursor.write_f32(self.mag_inclination);

        cursor.finish()
    }

    pub fn solution_mode(&self) -> SolutionMode {
        status_solution_mode(self.status)
    }

    pub fn set_solution_mode(&mut self, mode: SolutionMode) {
        self.status = status_set_solution_mode(self.status, mode);
    }
}

/// EKF attitude as a quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EkfQuat {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// W, X, Y, Z attitude quaternion.
    pub quaternion: [f32; 4],
    /// Roll, pitch, yaw 1-sigma standard deviation, in rad.
    pub euler_std: [f32; 3],
    /// EKF solution status bitmask.
    pub status: u32,
    /// Local magnetic declination, in rad (NaN when unavailable).
    pub mag_declination: f32,
    /// Local magnetic inclination, in rad (NaN when unavailable).
    pub mag_inclination: f32,
}

impl Default for EkfQuat {
    fn default() -> Self {
        Self {
            time_stamp: 0,
            quaternion: [0.0; 4],
            euler_std: [0.0; 3],
            status: 0,
            mag_declination: f32::NAN,
            mag_inclination: f32::NAN,
        }
    }
}

impl EkfQuat {
    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();

        let quaternion =
            [cursor.read_f32(), cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];
        let euler_std = [cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];

        let status = cursor.read_u32();

        let (mag_declination, mag_inclination) = if cursor.remaining() >= 8 {
            (cursor.read_f32(), cursor.read_f32())
        } else {
            (f32::NAN, f32::NAN)
        };

        cursor.finish()?;

        Ok(Self { time_stamp, quaternion, euler_std, status, mag_declination, mag_inclination })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);

        cursor.write_f32(self.quaternion[0]);
        cursor.write_f32(self.quaternion[1]);
        cursor.write_f32(self.quaternion[2]);
        cursor.write_f32(self.quaternion[3]);

        cursor.write_f32(self.euler_std[0]);
        cursor.write_f32(self.euler_std[1]);
        cursor.write_f32(self.euler_std[2]);

        cursor.write_u32(self.status);

        cursor.write_f32(self.mag_declination);
        cursor.write_f32(self.mag_inclination);

        cursor.finish()
    }

    pub fn solution_mode(&self) -> SolutionMode {
        status_solution_mode(self.status)
    }

    pub fn set_solution_mode(&mut self, mode: SolutionMode) {
        self.status = status_set_solution_mode(self.status, mode);
    }
}

/// EKF navigation solution: velocity and geodetic position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EkfNav {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// North, East, Down velocity, in m/s.
    pub velocity: [f32; 3],
    /// North, East, Down velocity 1-sigma standard deviation, in m/s.
    pub velocity_std: [f32; 3],
    /// Latitude, longitude in degrees; altitude above MSL in m.
    pub position: [f64; 3],
    /// Altitude difference between the geoid and the ellipsoid, in m.
    pub undulation: f32,
    /// Latitude, longitude, altitude 1-sigma standard deviation, in m.
    pub position_std: [f32; 3],
    /// EKF solution status bitmask.
    pub status: u32,
}

impl EkfNav {
    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();

        let velocity = [cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];
        let velocity_std = [cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];

        let position = [cursor.read_f64(), cursor.read_f64(), cursor.read_f64()];

        let undulation = cursor.read_f32();

        let position_std = [cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];

        let status = cursor.read_u32();

        cursor.finish()?;

        Ok(Self { time_stamp, velocity, velocity_std, position, undulation, position_std, status })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);

        cursor.write_f32(self.velocity[0]);
        cursor.write_f32(self.velocity[1]);
        cursor.write_f32(self.velocity[2]);

        cursor.write_f32(self.velocity_std[0]);
        cursor.write_f32(self.velocity_std[1]);
        cursor.write_f32(self.velocity_std[2]);

        cursor.write_f64(self.position[0]);
        cursor.write_f64(self.position[1]);
        cursor.write_f64(self.position[2]);

        cursor.write_f32(self.undulation);

        cursor.write_f32(self.position_std[0]);
        cursor.write_f32(self.position_std[1]);
        cursor.write_f32(self.position_std[2]);

        cursor.write_u32(self.status);

        cursor.finish()
    }

    pub fn solution_mode(&self) -> SolutionMode {
        status_solution_mode(self.status)
    }

    pub fn is_position_valid(&self) -> bool {
        self.status & EKF_POSITION_VALID != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euler_round_trip() {
        let mut log = EkfEuler {
            time_stamp: 77,
            euler: [0.01, -0.02, 1.57],
            euler_std: [0.001, 0.001, 0.01],
            status: EKF_ATTITUDE_VALID | EKF_HEADING_VALID,
            mag_declination: 0.04,
            mag_inclination: 1.08,
        };
        log.set_solution_mode(SolutionMode::Ahrs);

        let mut buffer = [0u8; 40];
        let mut writer = WriteCursor::new(&mut buffer);
        log.write_to_stream(&mut writer).unwrap();
        assert_eq!(writer.position(), 40);

        let mut reader = ReadCursor::new(&buffer);
        let decoded = EkfEuler::read_from_stream(&mut reader).unwrap();
        assert_eq!(decoded, log);
        assert_eq!(decoded.solution_mode(), SolutionMode::Ahrs);
    }

    #[test]
    fn legacy_euler_payload_defaults_magnetic_model_to_nan() {
        let full = EkfEuler { time_stamp: 5, ..Default::default() };
        let mut buffer = [0u8; 40];
        let mut writer = WriteCursor::new(&mut buffer);
        full.write_to_stream(&mut writer).unwrap();

        // Truncate to the pre-magnetic-model format.
        let mut reader = ReadCursor::new(&buffer[..32]);
        let decoded = EkfEuler::read_from_stream(&mut reader).unwrap();

        assert!(decoded.mag_declination.is_nan());
        assert!(decoded.mag_inclination.is_nan());
    }

    #[test]
    fn quat_round_trip() {
        let log = EkfQuat {
            time_stamp: 88,
            quaternion: [1.0, 0.0, 0.0, 0.0],
            euler_std: [0.1, 0.2, 0.3],
            status: status_set_solution_mode(EKF_VELOCITY_VALID, SolutionMode::NavPosition),
            mag_declination: 0.0,
            mag_inclination: 0.0,
        };

        let mut buffer = [0u8; 44];
        let mut writer = WriteCursor::new(&mut buffer);
        log.write_to_stream(&mut writer).unwrap();
        assert_eq!(writer.position(), 44);

        let mut reader = ReadCursor::new(&buffer);
        let decoded = EkfQuat::read_from_stream(&mut reader).unwrap();
        assert_eq!(decoded, log);
        assert_eq!(decoded.solution_mode(), SolutionMode::NavPosition);
    }

    #[test]
    fn nav_round_trip() {
        let log = EkfNav {
            time_stamp: 99,
            velocity: [10.0, -1.0, 0.1],
            velocity_std: [0.05, 0.05, 0.1],
            position: [48.8566, 2.3522, 96.0],
            undulation: 44.5,
            position_std: [0.8, 0.8, 1.5],
            status: status_set_solution_mode(EKF_POSITION_VALID, SolutionMode::NavPosition),
        };

        let mut buffer = [0u8; 72];
        let mut writer = WriteCursor::new(&mut buffer);
        log.write_to_stream(&mut writer).unwrap();
        assert_eq!(writer.position(), 72);

        let mut reader = ReadCursor::new(&buffer);
        let decoded = EkfNav::read_from_stream(&mut reader).unwrap();
        assert_eq!(decoded, log);
        assert!(decoded.is_position_valid());
    }

    #[test]
    fn solution_mode_bits_are_isolated() {
        let status = status_set_solution_mode(0xFFFF_FFF0, SolutionMode::NavVelocity);
        assert_eq!(status_solution_mode(status), SolutionMode::NavVelocity);
        assert_eq!(status & 0xFFFF_FFF0, 0xFFFF_FFF0);
    }
}
