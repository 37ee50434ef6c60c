//! Calibrated magnetometer log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Magnetometer and companion accelerometer measurements.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Mag {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// Magnetometer status bitmask.
    pub status: u16,
    /// X, Y, Z magnetic field, in a.u.
    pub magnetometers: [f32; 3],
    /// X, Y, Z accelerations, in m/s².
    pub accelerometers: [f32; 3],
}

impl Mag {
    /// All magnetometer axes are within their operating range.
    pub const MAGS_IN_RANGE: u16 = 1 << 6;
    /// All accelerometer axes are within their operating range.
    pub const ACCELS_IN_RANGE: u16 = 1 << 7;
    /// The onboard magnetic calibration is valid.
    pub const CALIBRATION_OK: u16 = 1 << 8;

    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let status = cursor.read_u16();

        let magnetometers = [cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];
        let accelerometers = [cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];

        cursor.finish()?;

        Ok(Self { time_stamp, status, magnetometers, accelerometers })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u16(self.status);

        cursor.write_f32(self.magnetometers[0]);
        cursor.write_f32(self.magnetometers[1]);
        cursor.write_f32(self.magnetometers[2]);

        cursor.write_f32(self.accelerometers[0]);
        cursor.write_f32(self.accelerometers[1]);
        cursor.write_f32(self.accelerometers[2]);

        cursor.finish()
    }

    pub fn is_calibration_ok(&self) -> bool {
        self.status & Self::CALIBRATION_OK != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let log = Mag {
            time_stamp: 987_654,
            status: Mag::MAGS_IN_RANGE | Mag::CALIBRATION_OK,
            magnetometers: [0.21, -0.04, 0.43],
            accelerometers: [0.01, 0.02, -9.81],
        };

        let mut buffer = [0u8; 30];
        let mut writer = WriteCursor::new(&mut buffer);
        log.write_to_stream(&mut writer).unwrap();
        assert_eq!(writer.position(), 30);

        let mut reader = ReadCursor::new(&buffer);
        assert_eq!(Mag::read_from_stream(&mut reader).unwrap(), log);
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let buffer = [0u8; 29];
        let mut reader = ReadCursor::new(&buffer);
        assert!(Mag::read_from_stream(&mut reader).is_err());
    }
}
