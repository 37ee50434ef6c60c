//! Wire frame parsing and generation.
//!
//! Every message travels in one SYNC-delimited frame:
//!
//! ```text
//! ┌──────┬──────┬────────┬─────────┬──────────┬─────────────────┬─────────┬──────┐
//! │ 0xFF │ 0x5A │ id u8  │ class u8│ len u16  │ [ext header 5B] │ payload │ crc  │ 0x33
//! └──────┴──────┴────────┴─────────┴──────────┴─────────────────┴─────────┴──────┘
//! ```
//!
//! Bit 7 of the class byte marks an *extended* frame whose payload is preceded
//! by a transfer id (u8), page index (u16) and page count (u16); `len` spans
//! those five bytes for compatibility with receivers that skip unknown
//! classes. The CRC covers everything from the id byte through the payload.
//!
//! [`FrameParser`] consumes an arbitrary byte stream: push raw transport bytes
//! in, poll frames out. It scans for the SYNC pair, tolerates garbage between
//! frames, skips corrupt frames past their SYNC pair (reporting the error
//! once), and keeps a trailing lone `0xFF` around in case it is the first half
//! of a SYNC pair split across reads. Bytes consumed by a returned or rejected
//! frame are discarded lazily on the next poll, which lets the returned
//! [`Frame`] borrow its payload straight from the work buffer.

use crate::protocol::crc::crc16;
use crate::protocol::cursor::{ReadCursor, WriteCursor};
use crate::{NavlinkError, Result};
use tracing::{trace, warn};

/// First synchronization byte of every frame.
pub const SYNC_1: u8 = 0xFF;
/// Second synchronization byte of every frame.
pub const SYNC_2: u8 = 0x5A;
/// End-of-frame byte.
pub const ETX: u8 = 0x33;

/// Maximum total frame size, in bytes.
pub const MAX_FRAME_SIZE: usize = 4096;
/// Maximum payload size of a standard frame, in bytes.
pub const MAX_PAYLOAD_SIZE: usize = 4086;
/// Maximum payload size of an extended frame, in bytes.
pub const MAX_EXTENDED_PAYLOAD_SIZE: usize = 4081;

/// sync (2) + id (1) + class (1) + len (2)
const HEADER_SIZE: usize = 6;
/// transfer id (1) + page index (2) + page count (2)
const EXT_HEADER_SIZE: usize = 5;
/// crc (2) + etx (1)
const FOOTER_SIZE: usize = 3;

/// Bit 7 of the class byte flags an extended frame.
const EXTENDED_CLASS_FLAG: u8 = 0x80;
/// Reserved upper bits of the transfer id.
const TRANSFER_ID_RESERVED: u8 = 0xF0;

/// Page metadata carried by an extended frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Identifies which large transfer this page belongs to (0..=15).
    pub transfer_id: u8,
    /// 0-based page index.
    pub page_index: u16,
    /// Total number of pages in the transfer.
    pub nr_pages: u16,
}

/// One validated frame, borrowing its payload from the parser's work buffer.
///
/// The borrow is valid until the next [`FrameParser::poll`] or
/// [`FrameParser::push`] call.
#[derive(Debug)]
pub struct Frame<'a> {
    /// Message class byte, extended flag stripped.
    pub class: u8,
    /// Message id byte.
    pub id: u8,
    /// Extended-frame page metadata, `None` for standard frames.
    pub pages: Option<PageInfo>,
    /// Payload bytes.
    pub payload: &'a [u8],
}

/// Outcome of parsing at one candidate offset.
enum Parsed {
    Frame {
        end: usize,
        class: u8,
        id: u8,
        pages: Option<PageInfo>,
        payload_start: usize,
        payload_len: usize,
    },
    /// Not enough bytes yet to finish this frame.
    Incomplete,
    /// The bytes at this offset are not a valid frame.
    Invalid(NavlinkError),
}

/// Incremental frame scanner over a byte stream.
#[derive(Debug, Default)]
pub struct FrameParser {
    buf: Vec<u8>,
    /// Bytes to drop from the front of `buf` before the next scan.
    discard: usize,
}

impl FrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw transport bytes to the work buffer.
    pub fn push(&mut self, bytes: &[u8]) {
        self.apply_discard();
        self.buf.extend_from_slice(bytes);
    }

    /// Bytes currently buffered and not yet consumed by a frame.
    pub fn buffered(&self) -> usize {
        self.buf.len() - self.discard
    }

    /// Drop everything buffered, e.g. after a transport reconnect.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.discard = 0;
    }

    fn apply_discard(&mut self) {
        if self.discard != 0 {
            self.buf.drain(..self.discard);
            self.discard = 0;
        }
    }

    /// Scan for the next complete frame.
    ///
    /// Returns `Ok(None)` when no complete frame is buffered (more bytes
    /// needed). Returns `Err` once per corrupt frame — the parser has already
    /// skipped past it, so polling again continues with the rest of the
    /// stream.
    pub fn poll(&mut self) -> Result<Option<Frame<'_>>> {
        self.apply_discard();

        if let Some(offset) = self.find_sync() {
            match self.parse_at(offset) {
                Parsed::Frame { end, class, id, pages, payload_start, payload_len } => {
                    // Consumed on the next poll so the payload can be borrowed.
                    self.discard = end;

                    trace!(class, id, payload_len, "frame received");

                    let payload = &self.buf[payload_start..payload_start + payload_len];
                    return Ok(Some(Frame { class, id, pages, payload }));
                }
                Parsed::Incomplete => {
                    // A valid frame may be forming here; drop only the
                    // garbage in front of it.
                    self.discard = offset;
                    return Ok(None);
                }
                Parsed::Invalid(error) => {
                    warn!(offset, %error, "corrupt frame skipped");

                    // Skip the SYNC pair and resynchronize behind it on the
                    // next poll.
                    self.discard = offset + 2;
                    return Err(error);
                }
            }
        }

        // No SYNC pair anywhere. A trailing 0xFF may be the first half of a
        // pair split across reads; keep it, drop everything else.
        if self.buf.last() == Some(&SYNC_1) {
            self.discard = self.buf.len() - 1;
        } else {
            self.discard = self.buf.len();
        }

        Ok(None)
    }

    fn find_sync(&self) -> Option<usize> {
        if self.buf.len() < 2 {
            return None;
        }

        (0..self.buf.len() - 1).find(|&i| self.buf[i] == SYNC_1 && self.buf[i + 1] == SYNC_2)
    }

    fn parse_at(&self, offset: usize) -> Parsed {
        let mut cursor = ReadCursor::new(&self.buf[offset..]);
        cursor.skip(2);

        let id = cursor.read_u8();
        let mut class = cursor.read_u8();
        let declared_len = cursor.read_u16() as usize;

        if cursor.is_poisoned() {
            return Parsed::Incomplete;
        }

        if declared_len > MAX_PAYLOAD_SIZE {
            return Parsed::Invalid(NavlinkError::frame(format!(
                "declared payload size {declared_len} exceeds {MAX_PAYLOAD_SIZE}"
            )));
        }

        if self.buf.len() - offset < HEADER_SIZE + declared_len + FOOTER_SIZE {
            return Parsed::Incomplete;
        }

        let (pages, payload_len) = if class & EXTENDED_CLASS_FLAG != 0 {
            class &= !EXTENDED_CLASS_FLAG;

            if declared_len < EXT_HEADER_SIZE {
                return Parsed::Invalid(NavlinkError::frame(format!(
                    "extended frame too short for page header ({declared_len} bytes)"
                )));
            }

            let mut transfer_id = cursor.read_u8();
            let page_index = cursor.read_u16();
            let nr_pages = cursor.read_u16();

            if transfer_id & TRANSFER_ID_RESERVED != 0 {
                warn!(transfer_id, "reserved bits set in extended header");
                transfer_id &= !TRANSFER_ID_RESERVED;
            }

            if page_index >= nr_pages {
                return Parsed::Invalid(NavlinkError::frame(format!(
                    "invalid page information: {page_index}/{nr_pages}"
                )));
            }

            (
                Some(PageInfo { transfer_id, page_index, nr_pages }),
                declared_len - EXT_HEADER_SIZE,
            )
        } else {
            (None, declared_len)
        };

        let payload_start = offset + HEADER_SIZE + declared_len - payload_len;

        let footer_start = offset + HEADER_SIZE + declared_len;
        let received_crc =
            u16::from_le_bytes([self.buf[footer_start], self.buf[footer_start + 1]]);
        let last_byte = self.buf[footer_start + 2];

        if last_byte != ETX {
            return Parsed::Invalid(NavlinkError::frame(format!(
                "invalid end-of-frame byte {last_byte:#04x}"
            )));
        }

        // The CRC spans from the header (excluding the SYNC pair) up to the
        // CRC bytes.
        let computed_crc = crc16(&self.buf[offset + 2..footer_start]);

        if received_crc != computed_crc {
            return Parsed::Invalid(NavlinkError::Crc {
                received: received_crc,
                computed: computed_crc,
            });
        }

        Parsed::Frame {
            end: footer_start + FOOTER_SIZE,
            class,
            id,
            pages,
            payload_start,
            payload_len,
        }
    }
}

/// Encode a standard frame and append it to `out`.
pub fn write_standard_frame(out: &mut Vec<u8>, class: u8, id: u8, payload: &[u8]) -> Result<()> {
    debug_assert_eq!(class & EXTENDED_CLASS_FLAG, 0);

    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(NavlinkError::frame(format!(
            "payload size {} exceeds {MAX_PAYLOAD_SIZE}",
            payload.len()
        )));
    }

    let mut scratch = [0u8; MAX_FRAME_SIZE];
    let mut cursor = WriteCursor::new(&mut scratch);

    cursor.write_u8(SYNC_1);
    cursor.write_u8(SYNC_2);
    cursor.write_u8(id);
    cursor.write_u8(class);
    cursor.write_u16(payload.len() as u16);
    cursor.write_bytes(payload);

    let crc = crc16(&cursor.written()[2..]);
    cursor.write_u16(crc);
    cursor.write_u8(ETX);
    cursor.finish()?;

    out.extend_from_slice(cursor.written());
    Ok(())
}

/// Encode an extended frame carrying one page of a large transfer.
pub fn write_extended_frame(
    out: &mut Vec<u8>,
    class: u8,
    id: u8,
    pages: PageInfo,
    payload: &[u8],
) -> Result<()> {
    debug_assert_eq!(class & EXTENDED_CLASS_FLAG, 0);
    debug_assert_eq!(pages.transfer_id & TRANSFER_ID_RESERVED, 0);
    debug_assert!(pages.page_index < pages.nr_pages);

    if payload.len() > MAX_EXTENDED_PAYLOAD_SIZE {
        return Err(NavlinkError::frame(format!(
            "payload size {} exceeds {MAX_EXTENDED_PAYLOAD_SIZE}",
            payload.len()
        )));
    }

    let mut scratch = [0u8; MAX_FRAME_SIZE];
    let mut cursor = WriteCursor::new(&mut scratch);

    cursor.write_u8(SYNC_1);
    cursor.write_u8(SYNC_2);
    cursor.write_u8(id);
    cursor.write_u8(class | EXTENDED_CLASS_FLAG);

    // The declared size spans the extended header bytes.
    cursor.write_u16((payload.len() + EXT_HEADER_SIZE) as u16);
    cursor.write_u8(pages.transfer_id);
    cursor.write_u16(pages.page_index);
    cursor.write_u16(pages.nr_pages);
    cursor.write_bytes(payload);

    let crc = crc16(&cursor.written()[2..]);
    cursor.write_u16(crc);
    cursor.write_u8(ETX);
    cursor.finish()?;

    out.extend_from_slice(cursor.written());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn standard(class: u8, id: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        write_standard_frame(&mut out, class, id, payload).unwrap();
        out
    }

    #[test]
    fn standard_frame_round_trip() {
        let mut parser = FrameParser::new();
        parser.push(&standard(0x00, 0x04, b"magnetometer"));

        let frame = parser.poll().unwrap().unwrap();
        assert_eq!(frame.class, 0x00);
        assert_eq!(frame.id, 0x04);
        assert!(frame.pages.is_none());
        assert_eq!(frame.payload, b"magnetometer");

        assert!(parser.poll().unwrap().is_none());
        assert_eq!(parser.buffered(), 0);
    }

    #[test]
    fn extended_frame_round_trip() {
        let pages = PageInfo { transfer_id: 3, page_index: 1, nr_pages: 4 };
        let mut out = Vec::new();
        write_extended_frame(&mut out, 0x00, 0x35, pages, b"chunk").unwrap();

        let mut parser = FrameParser::new();
        parser.push(&out);

        let frame = parser.poll().unwrap().unwrap();
        assert_eq!(frame.class, 0x00);
        assert_eq!(frame.id, 0x35);
        assert_eq!(frame.pages, Some(pages));
        assert_eq!(frame.payload, b"chunk");
    }

    #[test]
    fn empty_payload_frame() {
        let mut parser = FrameParser::new();
        parser.push(&standard(0x00, 0x07, b""));

        let frame = parser.poll().unwrap().unwrap();
        assert_eq!(frame.id, 0x07);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn garbage_between_frames_is_skipped() {
        let mut bytes = vec![0x13, 0x37, SYNC_1, 0x00];
        bytes.extend_from_slice(&standard(0x00, 0x01, b"first"));
        bytes.extend_from_slice(&[0x00, 0xAB]);
        bytes.extend_from_slice(&standard(0x00, 0x02, b"second"));

        let mut parser = FrameParser::new();
        parser.push(&bytes);

        assert_eq!(parser.poll().unwrap().unwrap().payload, b"first");
        assert_eq!(parser.poll().unwrap().unwrap().payload, b"second");
        assert!(parser.poll().unwrap().is_none());
    }

    #[test]
    fn split_delivery_reassembles() {
        let bytes = standard(0x00, 0x08, b"split across reads");
        let mut parser = FrameParser::new();

        for chunk in bytes.chunks(3) {
            // Every intermediate poll must report not-ready, never an error.
            assert!(parser.poll().unwrap().is_none());
            parser.push(chunk);
        }

        let frame = parser.poll().unwrap().unwrap();
        assert_eq!(frame.payload, b"split across reads");
    }

    #[test]
    fn corrupt_crc_is_reported_once_then_stream_recovers() {
        let mut bad = standard(0x00, 0x01, b"payload");
        let crc_offset = bad.len() - 3;
        bad[crc_offset] ^= 0xFF;

        let mut parser = FrameParser::new();
        parser.push(&bad);
        parser.push(&standard(0x00, 0x02, b"good"));

        assert!(matches!(parser.poll(), Err(NavlinkError::Crc { .. })));

        let frame = parser.poll().unwrap().unwrap();
        assert_eq!(frame.id, 0x02);
        assert_eq!(frame.payload, b"good");
    }

    #[test]
    fn missing_etx_is_invalid() {
        let mut bad = standard(0x00, 0x01, b"x");
        let last = bad.len() - 1;
        bad[last] = 0x00;

        let mut parser = FrameParser::new();
        parser.push(&bad);

        assert!(matches!(parser.poll(), Err(NavlinkError::Frame { .. })));
    }

    #[test]
    fn invalid_page_information_is_rejected() {
        // page_index == nr_pages is never valid.
        let pages = PageInfo { transfer_id: 0, page_index: 1, nr_pages: 2 };
        let mut out = Vec::new();
        write_extended_frame(&mut out, 0x00, 0x35, pages, b"data").unwrap();

        // Patch the page index to equal the page count, then fix the CRC.
        out[7] = 2;
        let crc_offset = out.len() - 3;
        let crc = crc16(&out[2..crc_offset]);
        out[crc_offset..crc_offset + 2].copy_from_slice(&crc.to_le_bytes());

        let mut parser = FrameParser::new();
        parser.push(&out);

        assert!(matches!(parser.poll(), Err(NavlinkError::Frame { .. })));
    }

    #[test]
    fn trailing_sync1_is_retained_for_next_push() {
        let mut parser = FrameParser::new();
        parser.push(&[0x42, 0x42, SYNC_1]);
        assert!(parser.poll().unwrap().is_none());
        assert_eq!(parser.buffered(), 1);

        let frame_bytes = standard(0x00, 0x09, b"late");
        // The 0xFF already buffered is garbage, not this frame's SYNC.
        parser.push(&frame_bytes);
        let frame = parser.poll().unwrap().unwrap();
        assert_eq!(frame.payload, b"late");
    }

    #[test]
    fn oversized_payload_is_refused_on_write() {
        let payload = vec![0u8; MAX_PAYLOAD_SIZE + 1];
        let mut out = Vec::new();
        assert!(write_standard_frame(&mut out, 0x00, 0x01, &payload).is_err());
        assert!(out.is_empty());
    }

    proptest! {
        #[test]
        fn arbitrary_noise_never_panics_and_never_yields_frames_without_sync(
            noise in prop::collection::vec(any::<u8>(), 0..512)
        ) {
            let mut parser = FrameParser::new();
            parser.push(&noise);

            // Drain until quiescent; corrupt "frames" may error, never panic.
            for _ in 0..64 {
                match parser.poll() {
                    Ok(None) => break,
                    Ok(Some(_)) | Err(_) => {}
                }
            }
        }

        #[test]
        fn frames_survive_arbitrary_chunking(
            payload in prop::collection::vec(any::<u8>(), 0..256),
            chunk_size in 1usize..64
        ) {
            let bytes = standard(0x00, 0x21, &payload);
            let mut parser = FrameParser::new();
            let mut received = None;

            for chunk in bytes.chunks(chunk_size) {
                parser.push(chunk);
                if let Some(frame) = parser.poll().unwrap() {
                    received = Some(frame.payload.to_vec());
                }
            }

            prop_assert_eq!(received.as_deref(), Some(&payload[..]));
        }

        #[test]
        fn leading_garbage_is_tolerated(
            // Garbage free of SYNC_1: a random pair that happens to look like
            // the start of a longer frame would (correctly) keep the parser
            // waiting for bytes that never come.
            garbage in prop::collection::vec(0u8..=0xFE, 0..64),
            payload in prop::collection::vec(any::<u8>(), 0..64)
        ) {
            let mut bytes = garbage.clone();
            bytes.extend_from_slice(&standard(0x00, 0x11, &payload));

            let mut parser = FrameParser::new();
            parser.push(&bytes);

            let mut found = false;
            for _ in 0..32 {
                match parser.poll() {
                    Ok(Some(frame)) => {
                        if frame.id == 0x11 && frame.payload == &payload[..] {
                            found = true;
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(_) => {}
                }
            }

            prop_assert!(found);
        }
    }
}
