//! Wire protocol engine: framing, checksums, stream cursors, reassembly.
//!
//! This module is the transport-agnostic core of the crate. It knows nothing
//! about serial ports or sockets — bytes go in, validated frames and
//! reassembled payloads come out:
//!
//! - [`cursor`]: little-endian read/write cursors with the check-once fault
//!   discipline every log codec builds on.
//! - [`crc`]: the 16-bit frame checksum.
//! - [`frame`]: SYNC-delimited frame scanning, validation and generation.
//! - [`pager`]: multi-page payload reassembly.
//!
//! Everything here is synchronous and allocation-light; the async facade
//! lives in [`crate::replay`] and [`crate::stream`].

pub mod crc;
pub mod cursor;
pub mod frame;
pub mod pager;

pub use crc::crc16;
pub use cursor::{ReadCursor, WriteCursor};
pub use frame::{
    ETX, Frame, FrameParser, MAX_EXTENDED_PAYLOAD_SIZE, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE,
    PageInfo, SYNC_1, SYNC_2, write_extended_frame, write_standard_frame,
};
pub use pager::{JoinProgress, Pager};
