//! # Subscriber registry.
//!
//! Owns the mapping `key → Entry` and is the only place entries are created or
//! destroyed.
//!
//! ## Architecture
//! ```text
//! Broadcast::subscribe(token, key) ──► Registry::subscribe ──(write lock)──► insert Entry
//!                                                                 └─► replaced Entry dropped (channel closed)
//! Dispatcher fan-out ──────────────► Registry::read ─────(read lock, one full pass)
//! Dispatcher teardown task ────────► Registry::unsubscribe(key, id) ──(write lock)──► remove if id matches
//! ```
//!
//! ## Rules
//! - Structural mutations take the write lock; fan-out holds the read lock for a
//!   whole pass, so subscribe/unsubscribe wait for the pass to finish.
//! - Removing an entry drops its sender: the channel closes exactly once.
//! - `unsubscribe` only removes the entry it was scheduled for; a key that has been
//!   re-subscribed in the meantime keeps its new entry.
//! - Events are emitted after the lock is released.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, mpsc};
use tokio_util::sync::CancellationToken;

use crate::core::entry::Entry;
use crate::events::{Event, EventKind};
use crate::observers::ObserverSet;
use crate::subscription::Subscription;

pub(crate) type Entries = HashMap<String, Entry>;

/// Registry of live subscriptions.
pub(crate) struct Registry {
    entries: RwLock<Entries>,
    capacity: usize,
    observers: Arc<ObserverSet>,
}

impl Registry {
    /// Creates an empty registry whose delivery channels hold `capacity` messages.
    pub(crate) fn new(capacity: usize, observers: Arc<ObserverSet>) -> Arc<Self> {
        Arc::new(Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            observers,
        })
    }

    /// Registers a new active entry under `key`, replacing any previous one.
    pub(crate) async fn subscribe(&self, cancel: CancellationToken, key: &str) -> Subscription {
        let (tx, rx) = mpsc::channel(self.capacity);
        let entry = Entry::new(cancel, tx);
        let id = entry.id();

        let replaced = {
            let mut entries = self.entries.write().await;
            entries.insert(key.to_string(), entry)
        };

        self.observers.emit(
            Event::new(EventKind::Subscribed)
                .with_key(key)
                .with_entry(id),
        );
        if let Some(old) = replaced {
            old.mark_removed();
            let old_id = old.id();
            drop(old);
            self.observers.emit(
                Event::new(EventKind::Replaced)
                    .with_key(key)
                    .with_entry(old_id),
            );
        }

        Subscription::new(Arc::from(key), id, rx)
    }

    /// Removes the entry under `key` if it is still entry `id`, closing its channel.
    ///
    /// Teardown is scheduled from fan-out and waits for the write lock; the key
    /// may have been re-subscribed in the meantime, in which case the newer
    /// entry stays. Returns false if nothing was removed.
    pub(crate) async fn unsubscribe(&self, key: &str, id: u64) -> bool {
        let taken = {
            let mut entries = self.entries.write().await;
            match entries.get(key) {
                Some(entry) if entry.id() == id => entries.remove(key),
                _ => None,
            }
        };
        match taken {
            Some(entry) => {
                self.finish_removal(key, entry);
                true
            }
            None => false,
        }
    }

    /// Shared read guard over all entries, held for one fan-out pass.
    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().await
    }

    /// Returns a sorted list of registered keys.
    pub(crate) async fn keys(&self) -> Vec<String> {
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    pub(crate) async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub(crate) async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    /// Observer set shared with the dispatcher.
    pub(crate) fn observers(&self) -> &Arc<ObserverSet> {
        &self.observers
    }

    fn finish_removal(&self, key: &str, entry: Entry) {
        entry.mark_removed();
        let id = entry.id();
        drop(entry);
        self.observers.emit(
            Event::new(EventKind::Unsubscribed)
                .with_key(key)
                .with_entry(id),
        );
    }
}
