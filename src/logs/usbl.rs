//! USBL underwater positioning log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Position of a USBL beacon.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Usbl {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// USBL system status bitmask.
    pub status: u16,
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
    /// Depth in meters below mean sea level, positive down.
    pub depth: f32,
    /// 1-sigma latitude accuracy, in m.
    pub latitude_accuracy: f32,
    /// 1-sigma longitude accuracy, in m.
    pub longitude_accuracy: f32,
    /// 1-sigma depth accuracy, in m.
    pub depth_accuracy: f32,
}

impl Usbl {
    /// The data is correctly time synchronized.
    pub const TIME_SYNC: u16 = 1 << 0;
    /// Latitude/longitude form a valid 2D position.
    pub const POSITION_VALID: u16 = 1 << 1;
    /// The depth information is valid.
    pub const DEPTH_VALID: u16 = 1 << 2;

    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let status = cursor.read_u16();

        let latitude = cursor.read_f64();
        let longitude = cursor.read_f64();

        let depth = cursor.read_f32();

        let latitude_accuracy = cursor.read_f32();
        let longitude_accuracy = cursor.read_f32();
        let depth_accuracy = cursor.read_f32();

        cursor.finish()?;

        Ok(Self {
            time_stamp,
            status,
            latitude,
            longitude,
            depth,
            latitude_accuracy,
            longitude_accuracy,
            depth_accuracy,
        })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u16(self.status);

        cursor.write_f64(self.latitude);
        cursor.write_f64(self.longitude);

        cursor.write_f32(self.depth);

        cursor.write_f32(self.latitude_accuracy);
        cursor.write_f32(self.longitude_accuracy);
        cursor.write_f32(self.depth_accuracy);

        cursor.finish()
    }

    pub fn is_position_valid(&self) -> bool {
        self.status & Self::POSITION_VALID != 0
    }

    pub fn is_depth_valid(&self) -> bool {
        self.status & Self::DEPTH_VALID != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let log = Usbl {
            time_stamp: 55_000,
            status: Usbl::TIME_SYNC | Usbl::POSITION_VALID,
            latitude: 43.6193,
            longitude: 7.0722,
            depth: 1240.5,
            latitude_accuracy: 2.5,
            longitude_accuracy: 2.8,
            depth_accuracy: 4.0,
        };

        let mut buffer = [0u8; 38];
        let mut writer = WriteCursor::new(&mut buffer);
        log.write_to_stream(&mut writer).unwrap();
        assert_eq!(writer.position(), 38);

        let mut reader = ReadCursor::new(&buffer);
        let decoded = Usbl::read_from_stream(&mut reader).unwrap();
        assert_eq!(decoded, log);
        assert!(decoded.is_position_valid());
        assert!(!decoded.is_depth_valid());
    }
}
