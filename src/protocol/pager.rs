//! Multi-page reassembly.
//!
//! Large payloads (session information documents, vibration FFT spectra) do
//! not fit in a single wire frame. The device splits them into sequentially
//! numbered pages and the [`Pager`] joins them back into one contiguous
//! buffer, detecting lost pages and message restarts along the way.
//!
//! The wire guarantees in-order delivery per message, so the pager never
//! buffers out-of-order pages: any page that is not the one expected resets
//! the reassembly, and the sender's retransmission starts the message over
//! from page 0. Partial progress is unrecoverable by design.
//!
//! The pager does not own the destination buffer. The enclosing context
//! (see [`crate::session::SessionInfoContext`] and
//! [`crate::spectrum::FftContext`]) owns the storage and lends it to every
//! [`Pager::join`] call, so buffer lifetime is the context's concern and the
//! pager is nothing but the reassembly counters.
//!
//! A pager is not thread-safe; `&mut self` enforces exclusive access.

use crate::{NavlinkError, Result};
use tracing::warn;

/// Outcome of a successful [`Pager::join`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinProgress {
    /// All pages received; the destination buffer holds the whole payload.
    Complete,
    /// More pages are expected. Not an error.
    Pending,
}

/// Joins sequentially numbered pages into a caller-provided buffer.
#[derive(Debug, Clone, Default)]
pub struct Pager {
    nr_pages: u16,
    page_index: u16,
    size: usize,
}

impl Pager {
    /// Create an empty pager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all reassembly progress and return to the empty state.
    pub fn reset(&mut self) {
        self.size = 0;
        self.page_index = 0;
        self.nr_pages = 0;
    }

    /// Join one page into `dest`.
    ///
    /// `page_index` is 0-based; `nr_pages` is the total page count declared by
    /// the sender and is (re)learned from page 0. Callers must only submit
    /// pages with `page_index < nr_pages` (the frame layer rejects anything
    /// else before it gets here).
    ///
    /// Returns [`JoinProgress::Complete`] exactly when the final page commits,
    /// [`JoinProgress::Pending`] otherwise. An unexpected page index resets
    /// the pager and the incoming page only survives if it restarts the
    /// message (index 0). If the joined size would exceed `dest.len()` the
    /// pager resets and reports [`NavlinkError::BufferOverflow`]; a message
    /// that large must be retransmitted in full.
    pub fn join(
        &mut self,
        dest: &mut [u8],
        page_index: u16,
        nr_pages: u16,
        page: &[u8],
    ) -> Result<JoinProgress> {
        debug_assert!(page_index < nr_pages);

        if self.page_index != page_index {
            // A restart right after a completed message is the normal
            // steady-state; anything else lost data mid-flight.
            if page_index != 0 || self.page_index != self.nr_pages {
                warn!(
                    expected = self.page_index,
                    received = page_index,
                    "unexpected page index, pager reset"
                );
            }

            self.reset();
        }

        if page_index == 0 {
            self.nr_pages = nr_pages;
        }

        if self.page_index == page_index {
            let new_size = self.size + page.len();

            if new_size > dest.len() {
                self.reset();

                return Err(NavlinkError::BufferOverflow {
                    needed: new_size,
                    capacity: dest.len(),
                });
            }

            dest[self.size..new_size].copy_from_slice(page);

            self.size = new_size;
            self.page_index += 1;

            if self.page_index == self.nr_pages {
                return Ok(JoinProgress::Complete);
            }
        }

        Ok(JoinProgress::Pending)
    }

    /// Whether a whole multi-page message has been received.
    pub fn is_complete(&self) -> bool {
        self.nr_pages > 0 && self.page_index == self.nr_pages
    }

    /// Bytes assembled so far.
    ///
    /// Only meaningful as a payload length once [`Pager::is_complete`] holds.
    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn joins_three_pages_in_order() {
        let mut pager = Pager::new();
        let mut buffer = [0u8; 10];

        assert_eq!(pager.join(&mut buffer, 0, 3, b"AAAA").unwrap(), JoinProgress::Pending);
        assert!(!pager.is_complete());
        assert_eq!(pager.join(&mut buffer, 1, 3, b"BBBB").unwrap(), JoinProgress::Pending);
        assert_eq!(pager.join(&mut buffer, 2, 3, b"CC").unwrap(), JoinProgress::Complete);

        assert!(pager.is_complete());
        assert_eq!(pager.size(), 10);
        assert_eq!(&buffer[..pager.size()], b"AAAABBBBCC");
    }

    #[test]
    fn single_page_message_completes_immediately() {
        let mut pager = Pager::new();
        let mut buffer = [0u8; 16];

        assert_eq!(pager.join(&mut buffer, 0, 1, b"solo").unwrap(), JoinProgress::Complete);
        assert_eq!(pager.size(), 4);
    }

    #[test]
    fn retransmitted_first_page_restarts_cleanly() {
        let mut pager = Pager::new();
        let mut buffer = [0u8; 4];

        assert_eq!(pager.join(&mut buffer, 0, 2, b"XXXX").unwrap(), JoinProgress::Pending);
        // The sender started over; the stale progress is dropped.
        assert_eq!(pager.join(&mut buffer, 0, 2, b"YYYY").unwrap(), JoinProgress::Pending);

        assert!(!pager.is_complete());
        assert_eq!(pager.size(), 4);
        assert_eq!(&buffer[..4], b"YYYY");
    }

    #[test]
    fn out_of_sequence_page_resets_to_empty() {
        let mut pager = Pager::new();
        let mut buffer = [0u8; 16];

        // Page 2 while expecting page 0: nothing must be committed.
        assert_eq!(pager.join(&mut buffer, 2, 3, b"CCCC").unwrap(), JoinProgress::Pending);
        assert!(!pager.is_complete());
        assert_eq!(pager.size(), 0);

        // A fresh message starts over as if nothing happened.
        assert_eq!(pager.join(&mut buffer, 0, 1, b"DD").unwrap(), JoinProgress::Complete);
        assert_eq!(&buffer[..2], b"DD");
    }

    #[test]
    fn gap_in_page_sequence_drops_partial_progress() {
        let mut pager = Pager::new();
        let mut buffer = [0u8; 16];

        pager.join(&mut buffer, 0, 3, b"AA").unwrap();
        // Page 1 was lost; page 2 arrives.
        assert_eq!(pager.join(&mut buffer, 2, 3, b"CC").unwrap(), JoinProgress::Pending);

        assert!(!pager.is_complete());
        assert_eq!(pager.size(), 0);
    }

    #[test]
    fn overflow_fails_hard_and_resets() {
        let mut pager = Pager::new();
        let mut buffer = [0u8; 6];

        pager.join(&mut buffer, 0, 2, b"AAAA").unwrap();
        let error = pager.join(&mut buffer, 1, 2, b"BBBB").unwrap_err();

        match error {
            NavlinkError::BufferOverflow { needed, capacity } => {
                assert_eq!(needed, 8);
                assert_eq!(capacity, 6);
            }
            other => panic!("expected overflow, got {other:?}"),
        }

        // The pager is back to empty and a fresh message succeeds.
        assert!(!pager.is_complete());
        assert_eq!(pager.size(), 0);
        assert_eq!(pager.join(&mut buffer, 0, 1, b"ok").unwrap(), JoinProgress::Complete);
        assert_eq!(&buffer[..2], b"ok");
    }

    #[test]
    fn back_to_back_messages_reuse_the_pager() {
        let mut pager = Pager::new();
        let mut buffer = [0u8; 8];

        pager.join(&mut buffer, 0, 2, b"11").unwrap();
        assert_eq!(pager.join(&mut buffer, 1, 2, b"22").unwrap(), JoinProgress::Complete);

        // Next message begins at page 0 without an explicit reset.
        assert_eq!(pager.join(&mut buffer, 0, 2, b"33").unwrap(), JoinProgress::Pending);
        assert_eq!(pager.join(&mut buffer, 1, 2, b"44").unwrap(), JoinProgress::Complete);
        assert_eq!(&buffer[..4], b"3344");
    }

    proptest! {
        #[test]
        fn in_order_sequences_complete_exactly_on_the_last_page(
            pages in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 1..12)
        ) {
            let total: usize = pages.iter().map(Vec::len).sum();
            let mut buffer = vec![0u8; total.max(1)];
            let mut pager = Pager::new();
            let nr_pages = pages.len() as u16;

            for (index, page) in pages.iter().enumerate() {
                let progress = pager
                    .join(&mut buffer, index as u16, nr_pages, page)
                    .unwrap();

                if index + 1 == pages.len() {
                    prop_assert_eq!(progress, JoinProgress::Complete);
                } else {
                    prop_assert_eq!(progress, JoinProgress::Pending);
                    prop_assert!(!pager.is_complete());
                }
            }

            prop_assert!(pager.is_complete());
            prop_assert_eq!(pager.size(), total);

            let expected: Vec<u8> = pages.concat();
            prop_assert_eq!(&buffer[..total], &expected[..]);
        }

        #[test]
        fn size_never_exceeds_capacity(
            pages in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..10),
            capacity in 0usize..128
        ) {
            let mut buffer = vec![0u8; capacity];
            let mut pager = Pager::new();
            let nr_pages = pages.len() as u16;

            for (index, page) in pages.iter().enumerate() {
                let _ = pager.join(&mut buffer, index as u16, nr_pages, page);
                prop_assert!(pager.size() <= capacity);
            }
        }
    }
}
