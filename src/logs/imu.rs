//! Compact IMU measurements log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Scale factor for delta velocity values, LSB per m/s².
const DELTA_VELOCITY_LSB: f32 = 1_048_576.0;
/// Standard scale factor for delta angle values, LSB per rad/s.
const DELTA_ANGLE_LSB_STD: f32 = 67_108_864.0;
/// High-range scale factor for delta angle values, LSB per rad/s.
const DELTA_ANGLE_LSB_HIGH: f32 = 12_304_174.0;
/// Scale factor for the temperature value, LSB per °C.
const TEMPERATURE_LSB: f32 = 256.0;

/// Fixed-point delta velocity / delta angle IMU log.
///
/// Values are transported as scaled integers to keep the payload small at
/// high output rates; the accessor methods convert to physical units. The
/// delta-angle scale switches automatically to the high range when any
/// gyroscope exceeds the standard range, signalled by
/// [`ImuShort::GYROS_USE_HIGH_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuShort {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// IMU status bitmask.
    pub status: u16,
    /// X, Y, Z delta velocity, 1048576 LSB per m/s².
    pub delta_velocity: [i32; 3],
    /// X, Y, Z delta angle; scale selected by the status word.
    pub delta_angle: [i32; 3],
    /// Average temperature, 256 LSB per °C.
    pub temperature: i16,
}

impl ImuShort {
    /// All accelerometer axes are within their operating range.
    pub const ACCELS_IN_RANGE: u16 = 1 << 9;
    /// All gyroscope axes are within their operating range.
    pub const GYROS_IN_RANGE: u16 = 1 << 10;
    /// Delta angles use the high-range scale factor.
    pub const GYROS_USE_HIGH_SCALE: u16 = 1 << 11;

    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let status = cursor.read_u16();

        let delta_velocity = [cursor.read_i32(), cursor.read_i32(), cursor.read_i32()];
        let delta_angle = [cursor.read_i32(), cursor.read_i32(), cursor.read_i32()];

        let temperature = cursor.read_i16();

        cursor.finish()?;

        Ok(Self { time_stamp, status, delta_velocity, delta_angle, temperature })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u16(self.status);

        cursor.write_i32(self.delta_velocity[0]);
        cursor.write_i32(self.delta_velocity[1]);
        cursor.write_i32(self.delta_velocity[2]);

        cursor.write_i32(self.delta_angle[0]);
        cursor.write_i32(self.delta_angle[1]);
        cursor.write_i32(self.delta_angle[2]);

        cursor.write_i16(self.temperature);

        cursor.finish()
    }

    /// Delta velocity for axis `idx` (0..3), in m/s².
    pub fn delta_velocity(&self, idx: usize) -> f32 {
        self.delta_velocity[idx] as f32 / DELTA_VELOCITY_LSB
    }

    /// Delta angle for axis `idx` (0..3), in rad/s.
    pub fn delta_angle(&self, idx: usize) -> f32 {
        let scale = if self.status & Self::GYROS_USE_HIGH_SCALE != 0 {
            DELTA_ANGLE_LSB_HIGH
        } else {
            DELTA_ANGLE_LSB_STD
        };

        self.delta_angle[idx] as f32 / scale
    }

    /// Average temperature, in °C.
    pub fn temperature(&self) -> f32 {
        f32::from(self.temperature) / TEMPERATURE_LSB
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let log = ImuShort {
            time_stamp: 10_000,
            status: ImuShort::ACCELS_IN_RANGE | ImuShort::GYROS_IN_RANGE,
            delta_velocity: [1_048_576, -2_097_152, 524_288],
            delta_angle: [67_108_864, 0, -33_554_432],
            temperature: 256 * 25,
        };

        let mut buffer = [0u8; 32];
        let mut writer = WriteCursor::new(&mut buffer);
        log.write_to_stream(&mut writer).unwrap();
        assert_eq!(writer.position(), 32);

        let mut reader = ReadCursor::new(&buffer);
        assert_eq!(ImuShort::read_from_stream(&mut reader).unwrap(), log);
    }

    #[test]
    fn physical_unit_accessors() {
        let log = ImuShort {
            delta_velocity: [1_048_576, 0, -524_288],
            delta_angle: [67_108_864, 0, 0],
            temperature: 256 * 25,
            ..Default::default()
        };

        assert_eq!(log.delta_velocity(0), 1.0);
        assert_eq!(log.delta_velocity(2), -0.5);
        assert_eq!(log.delta_angle(0), 1.0);
        assert_eq!(log.temperature(), 25.0);
    }

    #[test]
    fn high_range_scale_follows_the_status_bit() {
        let mut log = ImuShort { delta_angle: [12_304_174, 0, 0], ..Default::default() };

        let standard = log.delta_angle(0);
        log.status |= ImuShort::GYROS_USE_HIGH_SCALE;
        assert_eq!(log.delta_angle(0), 1.0);
        assert!(standard < 1.0);
    }
}
