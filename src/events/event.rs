//! # Runtime events emitted by the registry and the dispatch loop.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: dispatch loop started/stopped
//! - **Subscription events**: subscribed, replaced, teardown scheduled, unsubscribed
//! - **Loss events**: inbound drop, per-subscriber drop, observer overflow/panic
//!
//! The [`Event`] struct carries the metadata: timestamp, subscriber key, reason and
//! (for drops) the message that was lost.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Observers receive events through their own queue, so use `seq` to restore the
//! emission order across observers.
//!
//! ## Example
//! ```rust
//! use klinecast::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::DeliveryDropped)
//!     .with_key("a")
//!     .with_reason("timeout");
//!
//! assert_eq!(ev.kind, EventKind::DeliveryDropped);
//! assert_eq!(ev.key.as_deref(), Some("a"));
//! assert_eq!(ev.reason.as_deref(), Some("timeout"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::message::Message;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Dispatch loop ===
    /// Dispatch loop entered its run loop.
    DispatcherStarted,

    /// Dispatch loop exited (cancellation observed or inbound queue closed).
    ///
    /// Sets:
    /// - `reason`: `"cancelled"` or `"inbound_closed"`
    DispatcherStopped,

    // === Subscriptions ===
    /// A new entry was registered.
    ///
    /// Sets:
    /// - `key`: subscriber key
    /// - `entry`: entry id
    Subscribed,

    /// A subscribe call overwrote a live entry under the same key.
    ///
    /// The replaced entry's channel is closed. Emitted after `Subscribed`.
    ///
    /// Sets:
    /// - `key`: subscriber key
    /// - `entry`: id of the replaced entry
    Replaced,

    /// Fan-out observed a cancelled (or abandoned) entry and scheduled its teardown.
    ///
    /// Sets:
    /// - `key`: subscriber key
    /// - `entry`: entry id
    /// - `reason`: `"cancelled"` or `"receiver_dropped"`
    TeardownScheduled,

    /// An entry was removed from the registry and its channel closed.
    ///
    /// Sets:
    /// - `key`: subscriber key
    /// - `entry`: entry id
    Unsubscribed,

    // === Loss ===
    /// `send` gave up: the inbound queue did not accept the message in time.
    ///
    /// Sets:
    /// - `message`: the dropped message
    /// - `reason`: `"timeout"` or `"closed"`
    MessageDropped,

    /// One subscriber did not accept one message in time.
    ///
    /// Sets:
    /// - `key`: subscriber key
    /// - `entry`: entry id
    /// - `message`: the dropped message
    /// - `reason`: `"timeout"`
    DeliveryDropped,

    /// Observer queue was full or closed; the event was dropped for that observer.
    ///
    /// Sets:
    /// - `observer`: observer name
    /// - `reason`: `"full"` or `"closed"`
    ObserverOverflow,

    /// Observer panicked while processing an event.
    ///
    /// Sets:
    /// - `observer`: observer name
    /// - `reason`: panic info/message
    ObserverPanicked,
}

impl EventKind {
    /// Returns a short stable label (kebab-case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::DispatcherStarted => "dispatcher-started",
            EventKind::DispatcherStopped => "dispatcher-stopped",
            EventKind::Subscribed => "subscribed",
            EventKind::Replaced => "replaced",
            EventKind::TeardownScheduled => "teardown-scheduled",
            EventKind::Unsubscribed => "unsubscribed",
            EventKind::MessageDropped => "message-dropped",
            EventKind::DeliveryDropped => "delivery-dropped",
            EventKind::ObserverOverflow => "observer-overflow",
            EventKind::ObserverPanicked => "observer-panicked",
        }
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Subscriber key, if applicable.
    pub key: Option<Arc<str>>,
    /// Registry entry id, if applicable.
    pub entry: Option<u64>,
    /// Message that was dropped, if applicable.
    pub message: Option<Message>,
    /// Human-readable reason (drop cause, panic info, etc.).
    pub reason: Option<Arc<str>>,
    /// Observer name (overflow/panic events only).
    pub observer: Option<&'static str>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            key: None,
            entry: None,
            message: None,
            reason: None,
            observer: None,
        }
    }

    /// Attaches a subscriber key.
    #[inline]
    pub fn with_key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attaches a registry entry id.
    #[inline]
    pub fn with_entry(mut self, id: u64) -> Self {
        self.entry = Some(id);
        self
    }

    /// Attaches the message concerned.
    #[inline]
    pub fn with_message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates an observer overflow event.
    #[inline]
    pub fn observer_overflow(observer: &'static str, reason: &'static str) -> Self {
        let mut ev = Event::new(EventKind::ObserverOverflow).with_reason(reason);
        ev.observer = Some(observer);
        ev
    }

    /// Creates an observer panic event.
    #[inline]
    pub fn observer_panicked(observer: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::ObserverPanicked).with_reason(info);
        ev.observer = Some(observer);
        ev
    }

    /// True if this event records a message lost for a subscriber or an observer.
    #[inline]
    pub fn is_loss(&self) -> bool {
        matches!(
            self.kind,
            EventKind::MessageDropped
                | EventKind::DeliveryDropped
                | EventKind::ObserverOverflow
        )
    }
}
