//! Event marker log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Timestamped hardware event marker.
///
/// When several pulses arrive within the same output period, up to four
/// additional pulse times are reported as offsets from `time_stamp`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Event {
    /// Time in us since the sensor power up of the first pulse.
    pub time_stamp: u32,
    /// Event status bitmask.
    pub status: u16,
    /// Offset of the second pulse from `time_stamp`, in us.
    pub time_offset_0: u16,
    /// Offset of the third pulse from `time_stamp`, in us.
    pub time_offset_1: u16,
    /// Offset of the fourth pulse from `time_stamp`, in us.
    pub time_offset_2: u16,
    /// Offset of the fifth pulse from `time_stamp`, in us.
    pub time_offset_3: u16,
}

impl Event {
    /// More events arrived than could be reported.
    pub const OVERFLOW: u16 = 1 << 0;
    /// `time_offset_0` is valid.
    pub const OFFSET_0_VALID: u16 = 1 << 1;
    /// `time_offset_1` is valid.
    pub const OFFSET_1_VALID: u16 = 1 << 2;
    /// `time_offset_2` is valid.
    pub const OFFSET_2_VALID: u16 = 1 << 3;
    /// `time_offset_3` is valid.
    pub const OFFSET_3_VALID: u16 = 1 << 4;

    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let status = cursor.read_u16();
        let time_offset_0 = cursor.read_u16();
        let time_offset_1 = cursor.read_u16();
        let time_offset_2 = cursor.read_u16();
        let time_offset_3 = cursor.read_u16();

        cursor.finish()?;

        Ok(Self { time_stamp, status, time_offset_0, time_offset_1, time_offset_2, time_offset_3 })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u16(self.status);
        cursor.write_u16(self.time_offset_0);
        cursor.write_u16(self.time_offset_1);
        cursor.write_u16(self.time_offset_2);
        cursor.write_u16(self.time_offset_3);

        cursor.finish()
    }

    pub fn has_overflowed(&self) -> bool {
        self.status & Self::OVERFLOW != 0
    }
}
