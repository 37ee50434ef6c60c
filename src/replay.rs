//! Capture file replay.
//!
//! A capture is a verbatim recording of the raw byte stream a device emitted
//! — frames, garbage and all. [`Replay`] feeds it through a [`Decoder`] so
//! recorded sessions exercise exactly the code paths live transports do,
//! on any platform.
//!
//! Replay is synchronous at heart ([`Replay::next`]); the
//! [`MessageSource`] implementation adds optional wall-clock pacing for
//! consumers that want playback to feel live.

use crate::decoder::{Decoder, Message};
use crate::source::MessageSource;
use crate::{NavlinkError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Bytes fed into the decoder per read step.
const CHUNK_SIZE: usize = 4096;

/// Replays a recorded device byte stream.
pub struct Replay {
    decoder: Decoder,
    data: Vec<u8>,
    position: usize,
    path: PathBuf,
    pacing: Option<Duration>,
    ticker: Option<Interval>,
}

impl std::fmt::Debug for Replay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replay")
            .field("path", &self.path)
            .field("bytes", &self.data.len())
            .field("position", &self.position)
            .field("pacing", &self.pacing)
            .finish()
    }
}

impl Replay {
    /// Open a capture file.
    ///
    /// The whole capture is loaded into memory up front; captures are
    /// recordings of bounded sessions and random access keeps replay simple.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(&path)
            .map_err(|source| NavlinkError::file(path.as_ref(), source))?;

        info!(path = %path.as_ref().display(), bytes = data.len(), "opened capture");

        Ok(Self::from_bytes_with_path(data, path.as_ref().to_path_buf()))
    }

    /// Replay from an in-memory byte stream (for tests and embedding).
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::from_bytes_with_path(data, PathBuf::from("<memory>"))
    }

    fn from_bytes_with_path(data: Vec<u8>, path: PathBuf) -> Self {
        Self { decoder: Decoder::new(), data, position: 0, path, pacing: None, ticker: None }
    }

    /// Space messages `period` apart when consumed as a [`MessageSource`].
    pub fn with_pacing(mut self, period: Duration) -> Self {
        self.pacing = Some(period);
        self.ticker = None;
        self
    }

    /// The capture path, `<memory>` for in-memory replays.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consumed and total capture bytes.
    pub fn progress(&self) -> (usize, usize) {
        (self.position, self.data.len())
    }

    /// Decode the next message, reading further into the capture as needed.
    ///
    /// `Ok(None)` marks the end of the capture. Errors are per-message;
    /// calling `next` again continues with the rest of the capture.
    pub fn next(&mut self) -> Result<Option<Message>> {
        loop {
            if let Some(message) = self.decoder.poll()? {
                return Ok(Some(message));
            }

            if self.position >= self.data.len() {
                debug!(path = %self.path.display(), "end of capture");
                return Ok(None);
            }

            let end = (self.position + CHUNK_SIZE).min(self.data.len());
            self.decoder.push_bytes(&self.data[self.position..end]);
            self.position = end;
        }
    }
}

#[async_trait]
impl MessageSource for Replay {
    async fn next_message(&mut self) -> Result<Option<Message>> {
        if let Some(period) = self.pacing {
            let ticker = self.ticker.get_or_insert_with(|| {
                let mut ticker = interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                ticker
            });

            ticker.tick().await;
        }

        self.next()
    }
}
