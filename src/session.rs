//! Session information reassembly and parsing.
//!
//! The device periodically broadcasts its session information — a JSON
//! document with the device identity and the full active settings tree — as
//! a stream of [`SessionInfoPage`](crate::logs::SessionInfoPage) logs. This
//! module owns the reassembly buffer and exposes the completed document.
//!
//! One byte of the buffer is reserved so the assembled text always leaves
//! room for a terminator, matching the wire contract offered to C consumers
//! reading the buffer as a string.
//!
//! A context is constructed once and reused for every broadcast cycle; the
//! views returned by [`SessionInfoContext::document`] stay valid until the
//! next [`SessionInfoContext::process`] call.

use crate::protocol::{JoinProgress, Pager};
use crate::{NavlinkError, Result};
use serde::{Deserialize, Serialize};

/// Session information buffer size, in bytes.
pub const SESSION_INFO_BUFFER_SIZE: usize = 32768;

/// Reassembles the periodically broadcast session information document.
pub struct SessionInfoContext {
    buffer: Box<[u8; SESSION_INFO_BUFFER_SIZE]>,
    pager: Pager,
}

impl Default for SessionInfoContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionInfoContext {
    /// Create a context with an empty document.
    pub fn new() -> Self {
        Self { buffer: Box::new([0u8; SESSION_INFO_BUFFER_SIZE]), pager: Pager::new() }
    }

    /// Drop any partial document and start over.
    pub fn reset(&mut self) {
        self.buffer.fill(0);
        self.pager.reset();
    }

    /// Feed one session information page.
    ///
    /// Returns [`JoinProgress::Complete`] when the document is fully
    /// reassembled; it then stays readable until the next `process` call.
    pub fn process(
        &mut self,
        page_index: u16,
        nr_pages: u16,
        data: &[u8],
    ) -> Result<JoinProgress> {
        // The last byte stays reserved for the terminator.
        let capacity = SESSION_INFO_BUFFER_SIZE - 1;
        let result = self.pager.join(&mut self.buffer[..capacity], page_index, nr_pages, data);

        self.buffer[self.pager.size()] = 0;

        result
    }

    /// The reassembled document text, `None` while incomplete.
    pub fn document(&self) -> Result<Option<&str>> {
        if !self.pager.is_complete() {
            return Ok(None);
        }

        let text = std::str::from_utf8(&self.buffer[..self.pager.size()])
            .map_err(|_| NavlinkError::SessionEncoding)?;

        Ok(Some(text))
    }

    /// Parse the reassembled document, `None` while incomplete.
    pub fn parse_document(&self) -> Result<Option<SessionDocument>> {
        match self.document()? {
            Some(text) => SessionDocument::parse(text).map(Some),
            None => Ok(None),
        }
    }
}

/// Device identity carried by the session information document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceInfo {
    /// Product code, e.g. `"NL-700A"`.
    pub product_code: String,
    /// Device serial number.
    pub serial_number: String,
    /// Hardware revision string.
    pub hw_revision: String,
    /// Firmware version string.
    pub fmw_version: String,
}

/// Parsed session information document.
///
/// The settings tree is device- and firmware-specific, so it is kept as raw
/// JSON for the caller to interpret.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionDocument {
    /// Device identity.
    pub info: DeviceInfo,
    /// Active settings tree, as sent by the device.
    pub settings: serde_json::Value,
}

impl SessionDocument {
    /// Parse a session information document from its JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| NavlinkError::SessionFormat { source })
    }
}
