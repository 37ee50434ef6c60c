//! Type-safe Rust protocol stack for inertial navigation telemetry.
//!
//! Navlink frames, checksums and reassembles the binary messages an INS
//! device family emits over serial, UDP or recorded captures, and decodes
//! them into a typed log catalog.
//!
//! # Features
//!
//! - **Robust framing**: SYNC scanning, CRC validation and resynchronization
//!   over arbitrary byte chunking
//! - **Typed catalog**: one plain struct per log, with status-bit accessors
//!   and version-tolerant decoding of older payloads
//! - **Multi-page reassembly**: session information documents and vibration
//!   FFT spectra are joined back together transparently
//! - **Capture replay**: recorded byte streams replay through the exact same
//!   pipeline, on any platform
//!
//! # Quick start
//!
//! Feed transport bytes into a [`Decoder`] and poll messages out:
//!
//! ```rust
//! use navlink::{Decoder, Message};
//!
//! fn on_bytes(decoder: &mut Decoder, bytes: &[u8]) -> navlink::Result<()> {
//!     decoder.push_bytes(bytes);
//!
//!     while let Some(message) = decoder.poll()? {
//!         match message {
//!             Message::Log { id, .. } => println!("log: {}", id.name()),
//!             Message::SessionInfo(document) => println!("session: {document}"),
//!             Message::Spectrum(spectrum) => println!("fft bins: {}", spectrum.bins.len()),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Or replay a capture file as an async stream:
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use navlink::{MessageStream, Replay};
//!
//! #[tokio::main]
//! async fn main() -> navlink::Result<()> {
//!     let replay = Replay::open("session.cap")?;
//!     let mut stream = MessageStream::spawn(replay);
//!
//!     while let Some(message) = stream.next().await {
//!         println!("{:?}", message?);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;

// Wire protocol engine
pub mod protocol;

// Log message catalog
pub mod logs;

// Multi-page payload contexts
pub mod session;
pub mod spectrum;

// Receive pipeline
pub mod decoder;

// Async replay and streaming facade
pub mod replay;
pub mod source;
pub mod stream;

// Core exports
pub use decoder::{Decoder, Message};
pub use error::{NavlinkError, Result};
pub use logs::{AnyLog, MessageClass, MessageId};
pub use protocol::{FrameParser, JoinProgress, Pager, ReadCursor, WriteCursor};
pub use replay::Replay;
pub use session::{SessionDocument, SessionInfoContext};
pub use source::MessageSource;
pub use spectrum::{FftContext, FftSpectrum};
pub use stream::MessageStream;
