//! Barometric air data log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Altimeter and airspeed measurements.
///
/// The differential-pressure fields (`pressure_diff`, `true_airspeed`,
/// `air_temperature`) were added in a later protocol revision; payloads from
/// older firmware stop after `altitude` and decode with those fields zeroed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AirData {
    /// Time in us since the sensor power up, or measurement delay in us when
    /// [`AirData::TIME_IS_DELAY`] is set.
    pub time_stamp: u32,
    /// Air data status bitmask.
    pub status: u16,
    /// Raw absolute pressure, in Pa.
    pub pressure_abs: f32,
    /// Altitude above mean sea level computed from the barometer, in m.
    pub altitude: f32,
    /// Raw differential pressure used for airspeed, in Pa.
    pub pressure_diff: f32,
    /// True airspeed, in m/s.
    pub true_airspeed: f32,
    /// Outside air temperature, in °C.
    pub air_temperature: f32,
}

impl AirData {
    /// `time_stamp` is a measurement delay rather than an absolute time.
    pub const TIME_IS_DELAY: u16 = 1 << 0;
    /// `pressure_abs` is valid.
    pub const PRESSURE_ABS_VALID: u16 = 1 << 1;
    /// `altitude` is valid.
    pub const ALTITUDE_VALID: u16 = 1 << 2;
    /// `pressure_diff` is valid.
    pub const PRESSURE_DIFF_VALID: u16 = 1 << 3;
    /// `true_airspeed` is valid.
    pub const AIRSPEED_VALID: u16 = 1 << 4;
    /// `air_temperature` is valid.
    pub const TEMPERATURE_VALID: u16 = 1 << 5;

    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let status = cursor.read_u16();

        let pressure_abs = cursor.read_f32();
        let altitude = cursor.read_f32();

        // The airspeed fields only exist in newer payloads.
        let (pressure_diff, true_airspeed, air_temperature) = if cursor.remaining() > 0 {
            (cursor.read_f32(), cursor.read_f32(), cursor.read_f32())
        } else {
            (0.0, 0.0, 0.0)
        };

        cursor.finish()?;

        Ok(Self {
            time_stamp,
            status,
            pressure_abs,
            altitude,
            pressure_diff,
            true_airspeed,
            air_temperature,
        })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u16(self.status);

        cursor.write_f32(self.pressure_abs);
        cursor.write_f32(self.altitude);

        cursor.write_f32(self.pressure_diff);
        cursor.write_f32(self.true_airspeed);
        cursor.write_f32(self.air_temperature);

        cursor.finish()
    }

    pub fn is_pressure_abs_valid(&self) -> bool {
        self.status & Self::PRESSURE_ABS_VALID != 0
    }

    pub fn is_altitude_valid(&self) -> bool {
        self.status & Self::ALTITUDE_VALID != 0
    }

    pub fn is_airspeed_valid(&self) -> bool {
        self.status & Self::AIRSPEED_VALID != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let log = AirData {
            time_stamp: 123_456,
            status: AirData::PRESSURE_ABS_VALID | AirData::AIRSPEED_VALID,
            pressure_abs: 101_325.0,
            altitude: 812.5,
            pressure_diff: 54.2,
            true_airspeed: 31.0,
            air_temperature: -12.5,
        };

        let mut buffer = [0u8; 64];
        let mut writer = WriteCursor::new(&mut buffer);
        log.write_to_stream(&mut writer).unwrap();
        assert_eq!(writer.position(), 26);
        let length = writer.position();

        let mut reader = ReadCursor::new(&buffer[..length]);
        let decoded = AirData::read_from_stream(&mut reader).unwrap();
        assert_eq!(decoded, log);
        assert!(decoded.is_pressure_abs_valid());
        assert!(decoded.is_airspeed_valid());
        assert!(!decoded.is_altitude_valid());
    }

    #[test]
    fn legacy_payload_defaults_newer_fields_to_zero() {
        // Base format: time stamp + status + two floats only.
        let mut buffer = [0u8; 14];
        let mut writer = WriteCursor::new(&mut buffer);
        writer.write_u32(42);
        writer.write_u16(AirData::ALTITUDE_VALID);
        writer.write_f32(99_000.0);
        writer.write_f32(152.0);
        writer.finish().unwrap();

        let mut reader = ReadCursor::new(&buffer);
        let decoded = AirData::read_from_stream(&mut reader).unwrap();

        assert_eq!(decoded.time_stamp, 42);
        assert_eq!(decoded.altitude, 152.0);
        assert_eq!(decoded.pressure_diff, 0.0);
        assert_eq!(decoded.true_airspeed, 0.0);
        assert_eq!(decoded.air_temperature, 0.0);
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let buffer = [0u8; 9];
        let mut reader = ReadCursor::new(&buffer);
        assert!(AirData::read_from_stream(&mut reader).is_err());
    }
}
