//! Device diagnostic message log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Severity of a diagnostic message, mirroring the device's internal levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum DiagSeverity {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl DiagSeverity {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => DiagSeverity::Error,
            1 => DiagSeverity::Warning,
            3 => DiagSeverity::Debug,
            _ => DiagSeverity::Info,
        }
    }
}

/// Free-form diagnostic message emitted by the device firmware.
///
/// The message text fills the remainder of the payload; its length is implied
/// by the frame size rather than carried as a field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diag {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// Raw severity value.
    pub log_type: u8,
    /// Device-specific error code.
    pub error_code: u8,
    /// Diagnostic text.
    pub message: String,
}

impl Diag {
    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let log_type = cursor.read_u8();
        let error_code = cursor.read_u8();

        let text = cursor.read_bytes(cursor.remaining());
        let message = String::from_utf8_lossy(text).into_owned();

        cursor.finish()?;

        Ok(Self { time_stamp, log_type, error_code, message })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u8(self.log_type);
        cursor.write_u8(self.error_code);
        cursor.write_bytes(self.message.as_bytes());

        cursor.finish()
    }

    pub fn severity(&self) -> DiagSeverity {
        DiagSeverity::from_bits(self.log_type)
    }
}
