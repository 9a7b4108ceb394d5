//! # Subscriber entry and its teardown gate.
//!
//! An [`Entry`] is what the registry stores per key: the subscriber's token, the
//! sending half of its delivery channel and an atomic [`EntryState`].
//!
//! ## State machine
//! ```text
//!   Active ──(CAS, fan-out saw token fired)──► Closing ──(registry removal)──► Removed
//!     │                                                                          ▲
//!     └──────────────(unsubscribe / replaced by a new subscribe)─────────────────┘
//! ```
//!
//! ## Rules
//! - `Active → Closing` is a single compare-and-set: exactly one caller wins and
//!   schedules teardown, no matter how many fan-out passes observe the token.
//! - Non-`Active` entries are skipped by fan-out (no delivery, no re-scheduling).
//! - The sender lives only in the entry; removing the entry from the map drops it,
//!   which closes the channel. There is no second owner that could close it again.

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::message::Message;

/// Process-wide entry id counter.
static ENTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle state of one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum EntryState {
    Active = 0,
    Closing = 1,
    Removed = 2,
}

impl EntryState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => EntryState::Active,
            1 => EntryState::Closing,
            _ => EntryState::Removed,
        }
    }
}

/// One registered subscription.
pub(crate) struct Entry {
    id: u64,
    cancel: CancellationToken,
    state: AtomicU8,
    tx: mpsc::Sender<Message>,
}

impl Entry {
    /// Creates an `Active` entry with a fresh id.
    pub(crate) fn new(cancel: CancellationToken, tx: mpsc::Sender<Message>) -> Self {
        Self {
            id: ENTRY_ID.fetch_add(1, Ordering::Relaxed),
            cancel,
            state: AtomicU8::new(EntryState::Active as u8),
            tx,
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub(crate) fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    #[inline]
    pub(crate) fn sender(&self) -> &mpsc::Sender<Message> {
        &self.tx
    }

    #[inline]
    pub(crate) fn state(&self) -> EntryState {
        EntryState::from_u8(self.state.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.state() == EntryState::Active
    }

    /// `Active → Closing`. Returns true only for the caller that made the transition.
    pub(crate) fn begin_closing(&self) -> bool {
        self.state
            .compare_exchange(
                EntryState::Active as u8,
                EntryState::Closing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Final state; set by the registry right before the entry is dropped.
    pub(crate) fn mark_removed(&self) {
        self.state.store(EntryState::Removed as u8, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn entry() -> (Entry, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(1);
        (Entry::new(CancellationToken::new(), tx), rx)
    }

    #[test]
    fn ids_are_unique() {
        let (a, _ra) = entry();
        let (b, _rb) = entry();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn closing_transition_happens_once() {
        let (e, _rx) = entry();
        assert!(e.is_active());
        assert!(e.begin_closing());
        assert!(!e.begin_closing());
        assert_eq!(e.state(), EntryState::Closing);

        e.mark_removed();
        assert_eq!(e.state(), EntryState::Removed);
        assert!(!e.begin_closing());
    }

    #[test]
    fn concurrent_closers_have_one_winner() {
        let (e, _rx) = entry();
        let e = Arc::new(e);
        let winners = Arc::new(AtomicUsize::new(0));

        let threads: Vec<_> = (0..16)
            .map(|_| {
                let e = Arc::clone(&e);
                let winners = Arc::clone(&winners);
                std::thread::spawn(move || {
                    if e.begin_closing() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_entry_closes_channel() {
        let (e, mut rx) = entry();
        drop(e);
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }
}
