//! UTC time reference log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

const CLOCK_STATE_SHIFT: u16 = 1;
const CLOCK_STATE_MASK: u16 = 0x000F;
const UTC_STATUS_SHIFT: u16 = 6;
const UTC_STATUS_MASK: u16 = 0x000F;

/// Internal clock alignment state, bits 1–4 of the status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ClockState {
    /// The clock is in an error state.
    Error = 0,
    /// Free-running on the internal oscillator.
    FreeRunning = 1,
    /// Being steered toward the GNSS reference.
    Steering = 2,
    /// Aligned with the GNSS reference.
    Valid = 3,
}

impl ClockState {
    fn from_bits(bits: u16) -> Self {
        match bits {
            1 => ClockState::FreeRunning,
            2 => ClockState::Steering,
            3 => ClockState::Valid,
            _ => ClockState::Error,
        }
    }
}

/// UTC information state, bits 6–9 of the status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum UtcStatus {
    /// UTC time is unknown.
    Invalid = 0,
    /// UTC time is known but the leap second is not.
    NoLeapSecond = 1,
    /// UTC time is fully resolved.
    Valid = 2,
}

impl UtcStatus {
    fn from_bits(bits: u16) -> Self {
        match bits {
            1 => UtcStatus::NoLeapSecond,
            2 => UtcStatus::Valid,
            _ => UtcStatus::Invalid,
        }
    }
}

/// Broken-down UTC time with clock quality estimates.
///
/// The clock-error fields were added in a later revision and decode to NaN
/// from older payloads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtcTime {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// Clock status bitmask.
    pub status: u16,
    /// Year, e.g. 2026.
    pub year: u16,
    /// Month in year, 1..=12.
    pub month: i8,
    /// Day in month, 1..=31.
    pub day: i8,
    /// Hour, 0..=23.
    pub hour: i8,
    /// Minute, 0..=59.
    pub minute: i8,
    /// Second, 0..=60 (60 during a leap second).
    pub second: i8,
    /// Nanosecond within the second.
    pub nano_second: i32,
    /// GPS time of week, in ms.
    pub gps_time_of_week: u32,
    /// 1-sigma clock bias standard deviation, in s (NaN when unavailable).
    pub clk_bias_std: f32,
    /// 1-sigma clock scale-factor error standard deviation (NaN when unavailable).
    pub clk_sf_error_std: f32,
    /// Residual clock error, in s (NaN when unavailable).
    pub clk_residual_error: f32,
}

impl Default for UtcTime {
    fn default() -> Self {
        Self {
            time_stamp: 0,
            status: 0,
            year: 0,
            month: 0,
            day: 0,
            hour: 0,
            minute: 0,
            second: 0,
            nano_second: 0,
            gps_time_of_week: 0,
            clk_bias_std: f32::NAN,
            clk_sf_error_std: f32::NAN,
            clk_residual_error: f32::NAN,
        }
    }
}

impl UtcTime {
    /// The internal clock is fed by a stable input signal.
    pub const CLOCK_STABLE_INPUT: u16 = 1 << 0;
    /// The reported UTC time is synchronized.
    pub const UTC_SYNC: u16 = 1 << 5;

    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let status = cursor.read_u16();
        let year = cursor.read_u16();
        let month = cursor.read_i8();
        let day = cursor.read_i8();
        let hour = cursor.read_i8();
        let minute = cursor.read_i8();
        let second = cursor.read_i8();
        let nano_second = cursor.read_i32();
        let gps_time_of_week = cursor.read_u32();

        let (clk_bias_std, clk_sf_error_std, clk_residual_error) = if cursor.remaining() >= 12 {
            (cursor.read_f32(), cursor.read_f32(), cursor.read_f32())
        } else {
            (f32::NAN, f32::NAN, f32::NAN)
        };

        cursor.finish()?;

        Ok(Self {
            time_stamp,
            status,
            year,
            month,
            day,
            hour,
            minute,
            second,
            nano_second,
            gps_time_of_week,
            clk_bias_std,
            clk_sf_error_std,
            clk_residual_error,
        })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u16(self.status);
        cursor.write_u16(self.year);
        cursor.write_i8(self.month);
        cursor.write_i8(self.day);
        cursor.write_i8(self.hour);
        cursor.write_i8(self.minute);
        cursor.write_i8(self.second);
        cursor.write_i32(self.nano_second);
        cursor.write_u32(self.gps_time_of_week);

        cursor.write_f32(self.clk_bias_std);
        cursor.write_f32(self.clk_sf_error_std);
        cursor.write_f32(self.clk_residual_error);

        cursor.finish()
    }

    pub fn clock_state(&self) -> ClockState {
        ClockState::from_bits((self.status >> CLOCK_STATE_SHIFT) & CLOCK_STATE_MASK)
    }

    pub fn utc_status(&self) -> UtcStatus {
        UtcStatus::from_bits((self.status >> UTC_STATUS_SHIFT) & UTC_STATUS_MASK)
    }

    pub fn set_clock_state(&mut self, state: ClockState) {
        self.status &= !(CLOCK_STATE_MASK << CLOCK_STATE_SHIFT);
        self.status |= ((state as u16) & CLOCK_STATE_MASK) << CLOCK_STATE_SHIFT;
    }

    pub fn set_utc_status(&mut self, status: UtcStatus) {
        self.status &= !(UTC_STATUS_MASK << UTC_STATUS_SHIFT);
        self.status |= ((status as u16) & UTC_STATUS_MASK) << UTC_STATUS_SHIFT;
    }
}
