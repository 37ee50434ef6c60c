//! Typed log message catalog.
//!
//! One plain-data struct per message type, each with a
//! `read_from_stream`/`write_to_stream` pair over the protocol cursors.
//! Field order in the codecs *is* the wire format: reads and writes mirror
//! each other exactly, little-endian, no padding.
//!
//! Several codecs are version-tolerant on the read side: after the base
//! fields they check [`ReadCursor::remaining`] and either read the newer
//! fields or fill in the documented defaults, so payloads produced by older
//! firmware keep decoding. Writers always emit the full current format.
//!
//! [`AnyLog`] is the catalog's sum type; [`AnyLog::parse`] selects the codec
//! from a [`MessageId`] and a raw payload.

pub mod air_data;
pub mod automotive;
pub mod depth;
pub mod diag;
pub mod ekf;
pub mod event;
pub mod gnss;
pub mod imu;
pub mod mag;
pub mod odometer;
pub mod session_info;
pub mod status;
pub mod usbl;
pub mod utc;
pub mod velocity;
pub mod vib_mon;

pub use air_data::AirData;
pub use automotive::Automotive;
pub use depth::Depth;
pub use diag::{Diag, DiagSeverity};
pub use ekf::{EkfEuler, EkfNav, EkfQuat, SolutionMode};
pub use event::Event;
pub use gnss::{GnssPos, GnssPosStatus, GnssPosType, GnssVel, GnssVelStatus, GnssVelType};
pub use imu::ImuShort;
pub use mag::Mag;
pub use odometer::Odometer;
pub use session_info::SessionInfoPage;
pub use status::DeviceStatus;
pub use usbl::Usbl;
pub use utc::{ClockState, UtcStatus, UtcTime};
pub use velocity::{Velocity, VelocityTimeType};
pub use vib_mon::{FftPage, VibMonAxis, VibMonBand, VibMonReport, VibMonWindow};

use crate::protocol::{ReadCursor, WriteCursor};
use crate::{NavlinkError, Result};
use serde::{Deserialize, Serialize};

/// Message class byte of a wire frame.
///
/// Routing happens one layer above the codecs: the frame layer hands
/// `(class, id, payload)` up, and only log classes reach the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageClass {
    /// Standard output logs.
    Log = 0x00,
    /// Command / configuration traffic (not decoded by this crate).
    Command = 0x10,
}

impl MessageClass {
    /// Decode a class byte (extended flag already stripped by the frame layer).
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(MessageClass::Log),
            0x10 => Some(MessageClass::Command),
            _ => None,
        }
    }

    /// Whether messages of this class carry catalog logs.
    pub fn is_log(self) -> bool {
        matches!(self, MessageClass::Log)
    }
}

/// Message id byte of a log frame.
///
/// Discriminants are wire values and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageId {
    Status = 1,
    UtcTime = 2,
    Mag = 4,
    EkfEuler = 6,
    EkfQuat = 7,
    EkfNav = 8,
    GnssVel = 13,
    GnssPos = 14,
    Odometer = 19,
    EventA = 24,
    EventB = 25,
    AirData = 36,
    Usbl = 37,
    Automotive = 38,
    ImuShort = 44,
    EventOutA = 45,
    EventOutB = 46,
    Depth = 47,
    Diag = 48,
    SessionInfo = 53,
    Velocity = 54,
    VibMonReport = 58,
    VibMonFft = 59,
}

impl MessageId {
    /// Decode a message id byte.
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            1 => Some(MessageId::Status),
            2 => Some(MessageId::UtcTime),
            4 => Some(MessageId::Mag),
            6 => Some(MessageId::EkfEuler),
            7 => Some(MessageId::EkfQuat),
            8 => Some(MessageId::EkfNav),
            13 => Some(MessageId::GnssVel),
            14 => Some(MessageId::GnssPos),
            19 => Some(MessageId::Odometer),
            24 => Some(MessageId::EventA),
            25 => Some(MessageId::EventB),
            36 => Some(MessageId::AirData),
            37 => Some(MessageId::Usbl),
            38 => Some(MessageId::Automotive),
            44 => Some(MessageId::ImuShort),
            45 => Some(MessageId::EventOutA),
            46 => Some(MessageId::EventOutB),
            47 => Some(MessageId::Depth),
            48 => Some(MessageId::Diag),
            53 => Some(MessageId::SessionInfo),
            54 => Some(MessageId::Velocity),
            58 => Some(MessageId::VibMonReport),
            59 => Some(MessageId::VibMonFft),
            _ => None,
        }
    }

    /// Stable lowercase name, used in diagnostics and log output.
    pub const fn name(self) -> &'static str {
        match self {
            MessageId::Status => "status",
            MessageId::UtcTime => "utc_time",
            MessageId::Mag => "mag",
            MessageId::EkfEuler => "ekf_euler",
            MessageId::EkfQuat => "ekf_quat",
            MessageId::EkfNav => "ekf_nav",
            MessageId::GnssVel => "gnss_vel",
            MessageId::GnssPos => "gnss_pos",
            MessageId::Odometer => "odometer",
            MessageId::EventA => "event_a",
            MessageId::EventB => "event_b",
            MessageId::AirData => "air_data",
            MessageId::Usbl => "usbl",
            MessageId::Automotive => "automotive",
            MessageId::ImuShort => "imu_short",
            MessageId::EventOutA => "event_out_a",
            MessageId::EventOutB => "event_out_b",
            MessageId::Depth => "depth",
            MessageId::Diag => "diag",
            MessageId::SessionInfo => "session_info",
            MessageId::Velocity => "velocity",
            MessageId::VibMonReport => "vib_mon_report",
            MessageId::VibMonFft => "vib_mon_fft",
        }
    }
}

/// Diagnostic name for an arbitrary id byte, `"unknown"` when unmapped.
pub fn message_name(id: u8) -> &'static str {
    MessageId::from_wire(id).map_or("unknown", MessageId::name)
}

/// One decoded log of any catalog type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnyLog {
    Status(DeviceStatus),
    UtcTime(UtcTime),
    Mag(Mag),
    EkfEuler(EkfEuler),
    EkfQuat(EkfQuat),
    EkfNav(EkfNav),
    GnssVel(GnssVel),
    GnssPos(GnssPos),
    Odometer(Odometer),
    Event(Event),
    AirData(AirData),
    Usbl(Usbl),
    Automotive(Automotive),
    ImuShort(ImuShort),
    Depth(Depth),
    Diag(Diag),
    SessionInfo(SessionInfoPage),
    Velocity(Velocity),
    VibMonReport(VibMonReport),
    VibMonFft(FftPage),
}

impl AnyLog {
    /// Decode `payload` as the log type `id` names.
    ///
    /// The whole decode either succeeds or fails; no partially-populated
    /// structure is ever returned.
    pub fn parse(class: MessageClass, id: MessageId, payload: &[u8]) -> Result<Self> {
        if !class.is_log() {
            return Err(NavlinkError::UnknownMessage { class: class as u8, id: id as u8 });
        }

        let mut cursor = ReadCursor::new(payload);

        let log = match id {
            MessageId::Status => AnyLog::Status(DeviceStatus::read_from_stream(&mut cursor)?),
            MessageId::UtcTime => AnyLog::UtcTime(UtcTime::read_from_stream(&mut cursor)?),
            MessageId::Mag => AnyLog::Mag(Mag::read_from_stream(&mut cursor)?),
            MessageId::EkfEuler => AnyLog::EkfEuler(EkfEuler::read_from_stream(&mut cursor)?),
            MessageId::EkfQuat => AnyLog::EkfQuat(EkfQuat::read_from_stream(&mut cursor)?),
            MessageId::EkfNav => AnyLog::EkfNav(EkfNav::read_from_stream(&mut cursor)?),
            MessageId::GnssVel => AnyLog::GnssVel(GnssVel::read_from_stream(&mut cursor)?),
            MessageId::GnssPos => AnyLog::GnssPos(GnssPos::read_from_stream(&mut cursor)?),
            MessageId::Odometer => AnyLog::Odometer(Odometer::read_from_stream(&mut cursor)?),
            MessageId::EventA
            | MessageId::EventB
            | MessageId::EventOutA
            | MessageId::EventOutB => AnyLog::Event(Event::read_from_stream(&mut cursor)?),
            MessageId::AirData => AnyLog::AirData(AirData::read_from_stream(&mut cursor)?),
            MessageId::Usbl => AnyLog::Usbl(Usbl::read_from_stream(&mut cursor)?),
            MessageId::Automotive => {
                AnyLog::Automotive(Automotive::read_from_stream(&mut cursor)?)
            }
            MessageId::ImuShort => AnyLog::ImuShort(ImuShort::read_from_stream(&mut cursor)?),
            MessageId::Depth => AnyLog::Depth(Depth::read_from_stream(&mut cursor)?),
            MessageId::Diag => AnyLog::Diag(Diag::read_from_stream(&mut cursor)?),
            MessageId::SessionInfo => {
                AnyLog::SessionInfo(SessionInfoPage::read_from_stream(&mut cursor)?)
            }
            MessageId::Velocity => AnyLog::Velocity(Velocity::read_from_stream(&mut cursor)?),
            MessageId::VibMonReport => {
                AnyLog::VibMonReport(VibMonReport::read_from_stream(&mut cursor)?)
            }
            MessageId::VibMonFft => AnyLog::VibMonFft(FftPage::read_from_stream(&mut cursor)?),
        };

        Ok(log)
    }

    /// Encode this log in the current wire format.
    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        match self {
            AnyLog::Status(log) => log.write_to_stream(cursor),
            AnyLog::UtcTime(log) => log.write_to_stream(cursor),
            AnyLog::Mag(log) => log.write_to_stream(cursor),
            AnyLog::EkfEuler(log) => log.write_to_stream(cursor),
            AnyLog::EkfQuat(log) => log.write_to_stream(cursor),
            AnyLog::EkfNav(log) => log.write_to_stream(cursor),
            AnyLog::GnssVel(log) => log.write_to_stream(cursor),
            AnyLog::GnssPos(log) => log.write_to_stream(cursor),
            AnyLog::Odometer(log) => log.write_to_stream(cursor),
            AnyLog::Event(log) => log.write_to_stream(cursor),
            AnyLog::AirData(log) => log.write_to_stream(cursor),
            AnyLog::Usbl(log) => log.write_to_stream(cursor),
            AnyLog::Automotive(log) => log.write_to_stream(cursor),
            AnyLog::ImuShort(log) => log.write_to_stream(cursor),
            AnyLog::Depth(log) => log.write_to_stream(cursor),
            AnyLog::Diag(log) => log.write_to_stream(cursor),
            AnyLog::SessionInfo(log) => log.write_to_stream(cursor),
            AnyLog::Velocity(log) => log.write_to_stream(cursor),
            AnyLog::VibMonReport(log) => log.write_to_stream(cursor),
            AnyLog::VibMonFft(log) => log.write_to_stream(cursor),
        }
    }
}
