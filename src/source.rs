//! Asynchronous message sources.

use crate::decoder::Message;
use crate::Result;
use async_trait::async_trait;

/// An asynchronous producer of decoded messages.
///
/// Implemented by [`Replay`](crate::replay::Replay) for capture files; live
/// transports plug in the same way. `Ok(None)` marks the end of the source.
#[async_trait]
pub trait MessageSource: Send {
    /// Produce the next decoded message.
    ///
    /// Recoverable decode errors should be surfaced (not swallowed) so the
    /// consumer can count them; the source must remain usable afterwards.
    async fn next_message(&mut self) -> Result<Option<Message>>;
}
