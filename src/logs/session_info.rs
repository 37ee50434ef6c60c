//! Session information page log.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::{NavlinkError, Result};
use serde::{Deserialize, Serialize};

/// Maximum data bytes carried by one session information page.
pub const MAX_PAGE_DATA: usize = 256;

/// One page of the periodically broadcast session information document.
///
/// The full document (device information and active settings) is much larger
/// than a frame, so the device streams it as numbered pages. Pages are fed to
/// a [`SessionInfoContext`](crate::session::SessionInfoContext) which joins
/// them back into the complete text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionInfoPage {
    /// 0-based page index.
    pub page_index: u16,
    /// Total number of pages in the document.
    pub nr_pages: u16,
    /// Page data bytes.
    pub data: Vec<u8>,
}

impl SessionInfoPage {
    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let page_index = cursor.read_u16();
        let nr_pages = cursor.read_u16();
        let size = cursor.read_u16() as usize;

        cursor.finish()?;

        if page_index >= nr_pages {
            return Err(NavlinkError::payload(
                "session_info",
                format!("invalid page index {page_index}/{nr_pages}"),
            ));
        }

        if size > MAX_PAGE_DATA {
            return Err(NavlinkError::payload(
                "session_info",
                format!("invalid page size {size}"),
            ));
        }

        let data = cursor.read_bytes(size).to_vec();
        cursor.finish()?;

        Ok(Self { page_index, nr_pages, data })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        debug_assert!(self.data.len() <= MAX_PAGE_DATA);

        cursor.write_u16(self.page_index);
        cursor.write_u16(self.nr_pages);
        cursor.write_u16(self.data.len() as u16);
        cursor.write_bytes(&self.data);

        cursor.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let page = SessionInfoPage {
            page_index: 2,
            nr_pages: 7,
            data: b"{\"serialNumber\":".to_vec(),
        };

        let mut buffer = [0u8; 64];
        let mut writer = WriteCursor::new(&mut buffer);
        page.write_to_stream(&mut writer).unwrap();
        let length = writer.position();

        let mut reader = ReadCursor::new(&buffer[..length]);
        assert_eq!(SessionInfoPage::read_from_stream(&mut reader).unwrap(), page);
    }

    #[test]
    fn page_index_must_be_below_page_count() {
        let mut buffer = [0u8; 8];
        let mut writer = WriteCursor::new(&mut buffer);
        writer.write_u16(3);
        writer.write_u16(3);
        writer.write_u16(0);
        writer.finish().unwrap();

        let mut reader = ReadCursor::new(&buffer[..6]);
        assert!(matches!(
            SessionInfoPage::read_from_stream(&mut reader),
            Err(NavlinkError::Payload { .. })
        ));
    }

    #[test]
    fn declared_size_beyond_capacity_is_rejected() {
        let mut buffer = [0u8; 8];
        let mut writer = WriteCursor::new(&mut buffer);
        writer.write_u16(0);
        writer.write_u16(1);
        writer.write_u16((MAX_PAGE_DATA + 1) as u16);
        writer.finish().unwrap();

        let mut reader = ReadCursor::new(&buffer[..6]);
        assert!(matches!(
            SessionInfoPage::read_from_stream(&mut reader),
            Err(NavlinkError::Payload { .. })
        ));
    }

    #[test]
    fn declared_size_exceeding_payload_is_rejected() {
        let mut buffer = [0u8; 10];
        let mut writer = WriteCursor::new(&mut buffer);
        writer.write_u16(0);
        writer.write_u16(1);
        writer.write_u16(32);
        writer.finish().unwrap();

        // Only 4 data bytes follow although 32 were declared.
        let mut reader = ReadCursor::new(&buffer);
        assert!(matches!(
            SessionInfoPage::read_from_stream(&mut reader),
            Err(NavlinkError::Cursor { .. })
        ));
    }
}
