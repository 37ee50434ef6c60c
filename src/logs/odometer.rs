//! Odometer velocity log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Velocity measured by an external odometer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Odometer {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// Odometer status bitmask.
    pub status: u16,
    /// Velocity along the odometer direction, in m/s.
    pub velocity: f32,
}

impl Odometer {
    /// The velocity comes from a real pulse measurement, not a model.
    pub const REAL_MEASUREMENT: u16 = 1 << 0;
    /// The measurement is correctly time synchronized.
    pub const TIME_SYNC: u16 = 1 << 1;
    /// The velocity is valid.
    pub const VALID: u16 = 1 << 2;

    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let status = cursor.read_u16();
        let velocity = cursor.read_f32();

        cursor.finish()?;

        Ok(Self { time_stamp, status, velocity })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u16(self.status);
        cursor.write_f32(self.velocity);

        cursor.finish()
    }

    pub fn is_valid(&self) -> bool {
        self.status & Self::VALID != 0
    }
}
