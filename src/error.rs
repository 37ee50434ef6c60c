//! Error types for the navlink protocol stack.
//!
//! All fallible operations in this crate return [`Result`], built on a single
//! [`NavlinkError`] enum. The error surface mirrors the protocol's taxonomy:
//!
//! - **Frame errors** (`Frame`, `Crc`): one wire frame was corrupt. The byte
//!   stream itself stays usable — the frame parser resynchronizes on the next
//!   SYNC pair.
//! - **Payload errors** (`Cursor`, `Payload`): a frame arrived intact but its
//!   payload does not decode into the claimed message type. The message must
//!   be discarded; no partially-filled structure is ever produced.
//! - **Resource errors** (`BufferOverflow`): a reassembled payload would
//!   exceed its context's fixed buffer. Reassembly is aborted and reset.
//! - **File errors** (`File`): capture replay I/O failures.
//!
//! "Not ready" conditions (an incomplete multi-page message, no full frame in
//! the work buffer) are *not* errors; they are expressed as
//! [`JoinProgress::Pending`](crate::protocol::JoinProgress::Pending) or
//! `Ok(None)` polls.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for protocol operations.
pub type Result<T, E = NavlinkError> = std::result::Result<T, E>;

/// Main error type for the navlink protocol stack.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NavlinkError {
    #[error("stream cursor fault during {op}: needed {needed} bytes, {available} available")]
    Cursor { op: &'static str, needed: usize, available: usize },

    #[error("invalid frame: {details}")]
    Frame { details: String },

    #[error("frame CRC mismatch: received {received:#06x}, computed {computed:#06x}")]
    Crc { received: u16, computed: u16 },

    #[error("malformed {log} payload: {details}")]
    Payload { log: &'static str, details: String },

    #[error("reassembly overflow: {needed} bytes exceed the {capacity} byte buffer")]
    BufferOverflow { needed: usize, capacity: usize },

    #[error("unknown message: class {class:#04x}, id {id}")]
    UnknownMessage { class: u8, id: u8 },

    #[error("session document is not valid UTF-8")]
    SessionEncoding,

    #[error("session document is not valid JSON")]
    SessionFormat {
        #[source]
        source: serde_json::Error,
    },

    #[error("capture file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NavlinkError {
    /// Helper constructor for frame-level errors.
    pub fn frame(details: impl Into<String>) -> Self {
        NavlinkError::Frame { details: details.into() }
    }

    /// Helper constructor for malformed payload errors.
    pub fn payload(log: &'static str, details: impl Into<String>) -> Self {
        NavlinkError::Payload { log, details: details.into() }
    }

    /// Helper constructor for capture file errors with path context.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NavlinkError::File { path: path.into(), source }
    }

    /// Returns whether this error invalidates only the current message.
    ///
    /// Recoverable errors mean the byte stream stays consistent: the frame
    /// parser resynchronizes and later messages decode normally. Callers
    /// should drop the offending message and keep polling. Non-recoverable
    /// errors (file I/O) require outside intervention.
    pub fn is_recoverable(&self) -> bool {
        match self {
            NavlinkError::Cursor { .. } => true,
            NavlinkError::Frame { .. } => true,
            NavlinkError::Crc { .. } => true,
            NavlinkError::Payload { .. } => true,
            NavlinkError::BufferOverflow { .. } => true,
            NavlinkError::UnknownMessage { .. } => true,
            NavlinkError::SessionEncoding => true,
            NavlinkError::SessionFormat { .. } => true,
            NavlinkError::File { .. } => false,
        }
    }
}
