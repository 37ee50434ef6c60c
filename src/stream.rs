//! Streaming facade over a [`MessageSource`].
//!
//! [`MessageStream::spawn`] drives any source on a background task and hands
//! back a [`futures::Stream`] of decoded messages, which composes with the
//! usual `StreamExt` combinators. The channel is bounded so a slow consumer
//! applies backpressure to the driver instead of buffering without limit.

use crate::decoder::Message;
use crate::source::MessageSource;
use crate::Result;
use futures::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

/// Messages buffered between the driver task and the consumer.
const CHANNEL_CAPACITY: usize = 64;

pin_project! {
    /// A stream of decoded messages produced by a background driver task.
    ///
    /// The driver stops when the source ends, hits a non-recoverable error,
    /// or the stream is dropped.
    pub struct MessageStream {
        #[pin]
        inner: ReceiverStream<Result<Message>>,
    }
}

impl MessageStream {
    /// Spawn a driver task over `source` and return the consuming stream.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<S>(mut source: S) -> Self
    where
        S: MessageSource + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        tokio::spawn(async move {
            loop {
                match source.next_message().await {
                    Ok(Some(message)) => {
                        if tx.send(Ok(message)).await.is_err() {
                            debug!("message stream dropped, driver stopping");
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("message source ended");
                        break;
                    }
                    Err(error) => {
                        let fatal = !error.is_recoverable();

                        if fatal {
                            warn!(%error, "message source failed");
                        }

                        if tx.send(Err(error)).await.is_err() || fatal {
                            break;
                        }
                    }
                }
            }
        });

        Self { inner: ReceiverStream::new(rx) }
    }
}

impl Stream for MessageStream {
    type Item = Result<Message>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().inner.poll_next(cx)
    }
}
