//! Subsea depth sensor log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Depth measured by a subsea pressure sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Depth {
    /// Time in us since the sensor power up, or measurement delay in us when
    /// [`Depth::TIME_IS_DELAY`] is set.
    pub time_stamp: u32,
    /// Depth sensor status bitmask.
    pub status: u16,
    /// Raw absolute pressure, in Pa.
    pub pressure_abs: f32,
    /// Altitude, in m, positive up (negative below the surface).
    pub altitude: f32,
}

impl Depth {
    /// `time_stamp` is a measurement delay rather than an absolute time.
    pub const TIME_IS_DELAY: u16 = 1 << 0;
    /// `pressure_abs` is valid.
    pub const PRESSURE_ABS_VALID: u16 = 1 << 1;
    /// `altitude` is valid.
    pub const ALTITUDE_VALID: u16 = 1 << 2;

    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let status = cursor.read_u16();

        let pressure_abs = cursor.read_f32();
        let altitude = cursor.read_f32();

        cursor.finish()?;

        Ok(Self { time_stamp, status, pressure_abs, altitude })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u16(self.status);

        cursor.write_f32(self.pressure_abs);
        cursor.write_f32(self.altitude);

        cursor.finish()
    }

    pub fn is_altitude_valid(&self) -> bool {
        self.status & Self::ALTITUDE_VALID != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let log = Depth {
            time_stamp: 31,
            status: Depth::PRESSURE_ABS_VALID | Depth::ALTITUDE_VALID,
            pressure_abs: 1_215_000.0,
            altitude: -110.0,
        };

        let mut buffer = [0u8; 14];
        let mut writer = WriteCursor::new(&mut buffer);
        log.write_to_stream(&mut writer).unwrap();
        assert_eq!(writer.position(), 14);

        let mut reader = ReadCursor::new(&buffer);
        assert_eq!(Depth::read_from_stream(&mut reader).unwrap(), log);
    }
}
