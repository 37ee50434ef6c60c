//! Generic 3D velocity aiding log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

const TIME_TYPE_SHIFT: u16 = 0;
const TIME_TYPE_MASK: u16 = 0x0003;

/// Interpretation of the `time_stamp` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum VelocityTimeType {
    /// Time since the INS power up, in us.
    Timestamp = 0,
    /// A measurement delay, in us.
    Delay = 1,
    /// A GPS time of week, in ms.
    TimeOfWeek = 2,
}

impl VelocityTimeType {
    fn from_bits(bits: u16) -> Self {
        match bits {
            1 => VelocityTimeType::Delay,
            2 => VelocityTimeType::TimeOfWeek,
            _ => VelocityTimeType::Timestamp,
        }
    }
}

/// Body-frame velocity measurement with per-axis standard deviations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    /// Time field; interpretation given by [`Velocity::time_type`].
    pub time_stamp: u32,
    /// Velocity status bitmask.
    pub status: u16,
    /// X, Y, Z velocity, in m/s.
    pub velocity: [f32; 3],
    /// X, Y, Z velocity standard deviation, in m/s.
    pub velocity_std: [f32; 3],
}

impl Velocity {
    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let status = cursor.read_u16();

        let velocity = [cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];
        let velocity_std = [cursor.read_f32(), cursor.read_f32(), cursor.read_f32()];

        cursor.finish()?;

        Ok(Self { time_stamp, status, velocity, velocity_std })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u16(self.status);

        cursor.write_f32(self.velocity[0]);
        cursor.write_f32(self.velocity[1]);
        cursor.write_f32(self.velocity[2]);

        cursor.write_f32(self.velocity_std[0]);
        cursor.write_f32(self.velocity_std[1]);
        cursor.write_f32(self.velocity_std[2]);

        cursor.finish()
    }

    /// Extract the time type from the status word.
    pub fn time_type(&self) -> VelocityTimeType {
        VelocityTimeType::from_bits((self.status >> TIME_TYPE_SHIFT) & TIME_TYPE_MASK)
    }

    /// Store `time_type` into the status word.
    pub fn set_time_type(&mut self, time_type: VelocityTimeType) {
        debug_assert!((time_type as u16) <= TIME_TYPE_MASK);

        self.status &= !(TIME_TYPE_MASK << TIME_TYPE_SHIFT);
        self.status |= ((time_type as u16) & TIME_TYPE_MASK) << TIME_TYPE_SHIFT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut log = Velocity {
            time_stamp: 250_000,
            status: 0,
            velocity: [1.5, -0.2, 0.05],
            velocity_std: [0.1, 0.1, 0.2],
        };
        log.set_time_type(VelocityTimeType::TimeOfWeek);

        let mut buffer = [0u8; 30];
        let mut writer = WriteCursor::new(&mut buffer);
        log.write_to_stream(&mut writer).unwrap();
        assert_eq!(writer.position(), 30);

        let mut reader = ReadCursor::new(&buffer);
        let decoded = Velocity::read_from_stream(&mut reader).unwrap();
        assert_eq!(decoded, log);
        assert_eq!(decoded.time_type(), VelocityTimeType::TimeOfWeek);
    }

    #[test]
    fn time_type_masks_only_its_bit_range() {
        let mut log = Velocity { status: 0xFFFC, ..Default::default() };

        log.set_time_type(VelocityTimeType::Delay);
        assert_eq!(log.time_type(), VelocityTimeType::Delay);
        // Unrelated status bits are untouched.
        assert_eq!(log.status & 0xFFFC, 0xFFFC);

        log.set_time_type(VelocityTimeType::Timestamp);
        assert_eq!(log.time_type(), VelocityTimeType::Timestamp);
    }
}
