//! Automotive dynamics log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Track, slip and curvature information for automotive applications.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Automotive {
    /// Status bitmask.
    pub status: u8,
    /// Track angle, in rad.
    pub track_angle: f32,
    /// Slip angle, in rad.
    pub slip_angle: f32,
    /// Curvature radius, in m, always positive.
    pub curvature_radius: f32,
}

impl Automotive {
    /// The track angle is valid.
    pub const TRACK_VALID: u8 = 1 << 0;
    /// The slip angle is valid.
    pub const SLIP_VALID: u8 = 1 << 1;
    /// The curvature radius is valid.
    pub const CURVATURE_VALID: u8 = 1 << 2;

    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let status = cursor.read_u8();
        let track_angle = cursor.read_f32();
        let slip_angle = cursor.read_f32();
        let curvature_radius = cursor.read_f32();

        cursor.finish()?;

        Ok(Self { status, track_angle, slip_angle, curvature_radius })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u8(self.status);
        cursor.write_f32(self.track_angle);
        cursor.write_f32(self.slip_angle);
        cursor.write_f32(self.curvature_radius);

        cursor.finish()
    }

    pub fn is_track_valid(&self) -> bool {
        self.status & Self::TRACK_VALID != 0
    }

    pub fn is_slip_valid(&self) -> bool {
        self.status & Self::SLIP_VALID != 0
    }

    pub fn is_curvature_valid(&self) -> bool {
        self.status & Self::CURVATURE_VALID != 0
    }
}
