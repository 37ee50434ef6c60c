//! The receive pipeline: bytes in, decoded messages out.
//!
//! [`Decoder`] owns a [`FrameParser`] plus the two multi-page contexts and
//! wires them together the way a host application consumes the device:
//!
//! 1. raw transport bytes are pushed in ([`Decoder::push_bytes`]);
//! 2. each validated log frame is decoded through the catalog;
//! 3. page-bearing logs (session information, FFT spectra) are routed into
//!    their reassembly contexts and surface as one [`Message`] exactly when
//!    the last page arrives;
//! 4. every other log surfaces immediately as [`Message::Log`].
//!
//! Errors are per-message: a corrupt frame or payload is reported once and
//! the decoder stays usable, resynchronizing on the next SYNC pair. The
//! [`Decoder::drain`] convenience applies the standard policy of logging
//! recoverable errors and carrying on.

use crate::logs::{message_name, AnyLog, MessageClass, MessageId};
use crate::protocol::{FrameParser, JoinProgress};
use crate::session::SessionInfoContext;
use crate::spectrum::{FftContext, FftSpectrum};
use crate::Result;
use tracing::{debug, warn};

/// One decoded unit delivered to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A single-frame log.
    Log {
        /// The wire message id (several ids may share one payload type,
        /// e.g. the event markers).
        id: MessageId,
        /// The decoded payload.
        log: AnyLog,
    },
    /// A fully reassembled session information document.
    SessionInfo(String),
    /// A fully reassembled FFT spectrum.
    Spectrum(FftSpectrum),
}

/// Synchronous decode pipeline over a raw device byte stream.
#[derive(Default)]
pub struct Decoder {
    parser: FrameParser,
    session: SessionInfoContext,
    fft: FftContext,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw transport bytes.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.parser.push(bytes);
    }

    /// Drop all buffered bytes and partial reassemblies, e.g. after a
    /// transport reconnect.
    pub fn reset(&mut self) {
        self.parser.clear();
        self.session.reset();
        self.fft.reset();
    }

    /// Read-only access to the session information context.
    pub fn session(&self) -> &SessionInfoContext {
        &self.session
    }

    /// Decode until one message is produced or the buffered bytes run out.
    ///
    /// `Ok(None)` means more bytes are needed. An `Err` invalidates only the
    /// offending frame; keep polling to continue with the rest of the stream.
    pub fn poll(&mut self) -> Result<Option<Message>> {
        loop {
            let Some(frame) = self.parser.poll()? else {
                return Ok(None);
            };

            let is_log = MessageClass::from_wire(frame.class).is_some_and(MessageClass::is_log);
            if !is_log {
                debug!(class = frame.class, id = frame.id, "non-log frame skipped");
                continue;
            }

            let Some(id) = MessageId::from_wire(frame.id) else {
                debug!(id = frame.id, "unknown log id skipped");
                continue;
            };

            let log = AnyLog::parse(MessageClass::Log, id, frame.payload)?;

            match log {
                AnyLog::SessionInfo(page) => {
                    let progress =
                        self.session.process(page.page_index, page.nr_pages, &page.data)?;

                    if progress == JoinProgress::Complete {
                        if let Some(text) = self.session.document()? {
                            return Ok(Some(Message::SessionInfo(text.to_owned())));
                        }
                    }
                }
                AnyLog::VibMonFft(page) => {
                    let progress = self.fft.process(page.page_index, page.nr_pages, &page.data)?;

                    if progress == JoinProgress::Complete {
                        if let Some(spectrum) = self.fft.spectrum()? {
                            return Ok(Some(Message::Spectrum(spectrum)));
                        }
                    }
                }
                log => return Ok(Some(Message::Log { id, log })),
            }
        }
    }

    /// Push `bytes` and deliver every decodable message to `handler`.
    ///
    /// Recoverable errors are logged and skipped; the return value is the
    /// number of messages delivered.
    pub fn drain<F>(&mut self, bytes: &[u8], mut handler: F) -> usize
    where
        F: FnMut(Message),
    {
        self.push_bytes(bytes);

        let mut delivered = 0;

        loop {
            match self.poll() {
                Ok(Some(message)) => {
                    delivered += 1;
                    handler(message);
                }
                Ok(None) => break,
                Err(error) if error.is_recoverable() => {
                    warn!(%error, "message dropped");
                }
                Err(error) => {
                    warn!(%error, "decoding aborted");
                    break;
                }
            }
        }

        delivered
    }
}

impl Message {
    /// Diagnostic name of this message.
    pub fn name(&self) -> &'static str {
        match self {
            Message::Log { id, .. } => id.name(),
            Message::SessionInfo(_) => message_name(MessageId::SessionInfo as u8),
            Message::Spectrum(_) => message_name(MessageId::VibMonFft as u8),
        }
    }
}
