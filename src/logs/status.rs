//! General device status log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Aggregated device health and communication status.
///
/// The `uptime` field was added in a later revision; it decodes to zero from
/// older payloads.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// General status bitmask.
    pub general_status: u16,
    /// Second communication status bitmask.
    pub com_status2: u16,
    /// Communication status bitmask.
    pub com_status: u32,
    /// Aiding equipment status bitmask.
    pub aiding_status: u32,
    /// Reserved for future use.
    pub reserved2: u32,
    /// Reserved for future use.
    pub reserved3: u16,
    /// Time since the unit powered up, in s (0 when unavailable).
    pub uptime: u32,
}

impl DeviceStatus {
    /// The main power supply is within range.
    pub const MAIN_POWER_OK: u16 = 1 << 0;
    /// The IMU power supply is within range.
    pub const IMU_POWER_OK: u16 = 1 << 1;
    /// The GNSS power supply is within range.
    pub const GPS_POWER_OK: u16 = 1 << 2;
    /// The saved settings were loaded successfully.
    pub const SETTINGS_OK: u16 = 1 << 3;
    /// The internal temperature is within the operating range.
    pub const TEMPERATURE_OK: u16 = 1 << 4;
    /// The internal datalogger is operating normally.
    pub const DATALOGGER_OK: u16 = 1 << 5;
    /// The processing load is sustainable.
    pub const CPU_OK: u16 = 1 << 6;

    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let general_status = cursor.read_u16();
        let com_status2 = cursor.read_u16();
        let com_status = cursor.read_u32();
        let aiding_status = cursor.read_u32();
        let reserved2 = cursor.read_u32();
        let reserved3 = cursor.read_u16();

        // Uptime only exists in newer payloads.
        let uptime = if cursor.remaining() >= 4 { cursor.read_u32() } else { 0 };

        cursor.finish()?;

        Ok(Self {
            time_stamp,
            general_status,
            com_status2,
            com_status,
            aiding_status,
            reserved2,
            reserved3,
            uptime,
        })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u16(self.general_status);
        cursor.write_u16(self.com_status2);
        cursor.write_u32(self.com_status);
        cursor.write_u32(self.aiding_status);
        cursor.write_u32(self.reserved2);
        cursor.write_u16(self.reserved3);
        cursor.write_u32(self.uptime);

        cursor.finish()
    }

    pub fn is_power_ok(&self) -> bool {
        let mask =
            Self::MAIN_POWER_OK | Self::IMU_POWER_OK | Self::GPS_POWER_OK;
        self.general_status & mask == mask
    }

    pub fn is_cpu_ok(&self) -> bool {
        self.general_status & Self::CPU_OK != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let log = DeviceStatus {
            time_stamp: 1_000_000,
            general_status: DeviceStatus::MAIN_POWER_OK
                | DeviceStatus::IMU_POWER_OK
                | DeviceStatus::GPS_POWER_OK
                | DeviceStatus::CPU_OK,
            com_status2: 0x0003,
            com_status: 0x0000_0FFF,
            aiding_status: 0x0000_0011,
            reserved2: 0,
            reserved3: 0,
            uptime: 3_600,
        };

        let mut buffer = [0u8; 26];
        let mut writer = WriteCursor::new(&mut buffer);
        log.write_to_stream(&mut writer).unwrap();
        assert_eq!(writer.position(), 26);

        let mut reader = ReadCursor::new(&buffer);
        let decoded = DeviceStatus::read_from_stream(&mut reader).unwrap();
        assert_eq!(decoded, log);
        assert!(decoded.is_power_ok());
        assert!(decoded.is_cpu_ok());
    }

    #[test]
    fn legacy_payload_defaults_uptime_to_zero() {
        let log = DeviceStatus { uptime: 7_200, ..Default::default() };
        let mut buffer = [0u8; 26];
        let mut writer = WriteCursor::new(&mut buffer);
        log.write_to_stream(&mut writer).unwrap();

        let mut reader = ReadCursor::new(&buffer[..22]);
        let decoded = DeviceStatus::read_from_stream(&mut reader).unwrap();
        assert_eq!(decoded.uptime, 0);
    }
}
