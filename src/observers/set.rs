//! # Non-blocking event fan-out to multiple observers.
//!
//! Provides [`ObserverSet`] — distributes events to multiple observers
//! concurrently without blocking the emitter.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► observer1.on_event()
//!     │    (bounded)         └──────► panic → ObserverPanicked (to the others)
//!     ├──► [queue 2] ──► worker 2 ──► observer2.on_event()
//!     │    (bounded)
//!     └──► [queue N] ──► worker N ──► observerN.on_event()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **No cross-observer ordering**: observer A may process event N while B processes N+5
//! - **Overflow**: event dropped for that observer only, `ObserverOverflow` emitted
//!   to the others and logged with `tracing::warn!`
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Isolation**: slow/panicking observer doesn't affect others
//! - **Per-observer FIFO**: each observer sees events in order
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if an observer uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::sync::{Arc, Weak};

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Event, EventKind};
use crate::observers::Observe;

/// Per-observer channel metadata.
struct ObserverChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

type Channels = Vec<ObserverChannel>;

/// Fan-out coordinator for event observers.
///
/// Construct it inside a tokio runtime when at least one observer is given
/// (workers are spawned immediately). An empty set spawns nothing and every
/// `emit` is a no-op.
pub struct ObserverSet {
    channels: Arc<Channels>,
    workers: Vec<JoinHandle<()>>,
}

impl ObserverSet {
    /// Creates a new set and spawns one worker task per observer.
    ///
    /// ### Per-observer setup
    /// - Bounded mpsc queue (capacity from [`Observe::queue_capacity`], min 1)
    /// - Dedicated worker task (runs until the set is dropped or shut down)
    /// - Panic isolation via `catch_unwind`
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observe>>) -> Self {
        let mut channels = Vec::with_capacity(observers.len());
        let mut receivers = Vec::with_capacity(observers.len());

        for obs in observers {
            let (tx, rx) = mpsc::channel::<Arc<Event>>(obs.queue_capacity().max(1));
            channels.push(ObserverChannel {
                name: obs.name(),
                sender: tx,
            });
            receivers.push((obs, rx));
        }

        let channels = Arc::new(channels);
        let workers = receivers
            .into_iter()
            .map(|(obs, rx)| tokio::spawn(worker(obs, rx, Arc::downgrade(&channels))))
            .collect();

        Self { channels, workers }
    }

    /// An empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            channels: Arc::new(Vec::new()),
            workers: Vec::new(),
        }
    }

    /// Emits an event to all observers.
    ///
    /// Wraps the event in an `Arc` once; each observer gets a refcount.
    pub fn emit(&self, event: Event) {
        if self.channels.is_empty() {
            return;
        }
        fan_out(&self.channels, Arc::new(event));
    }

    /// True if there are no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Gracefully shuts down all observer workers.
    ///
    /// 1. Drops all channel senders (workers drain their queue, then see it closed)
    /// 2. Awaits all worker tasks to finish
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }
}

impl Default for ObserverSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Delivers `event` to every channel with `try_send`.
///
/// Overflow is reported to the remaining observers once; overflow events
/// themselves are never re-reported.
fn fan_out(channels: &Channels, event: Arc<Event>) {
    let is_overflow_evt = matches!(event.kind, EventKind::ObserverOverflow);
    let mut overflowed: Vec<(&'static str, &'static str)> = Vec::new();

    for channel in channels {
        let reason = match channel.sender.try_send(Arc::clone(&event)) {
            Ok(()) => continue,
            Err(mpsc::error::TrySendError::Full(_)) => "full",
            Err(mpsc::error::TrySendError::Closed(_)) => "closed",
        };
        tracing::warn!(
            observer = channel.name,
            reason,
            event = event.kind.as_label(),
            "observer dropped event"
        );
        if !is_overflow_evt {
            overflowed.push((channel.name, reason));
        }
    }

    for (name, reason) in overflowed {
        let report = Arc::new(Event::observer_overflow(name, reason));
        for channel in channels.iter().filter(|c| c.name != name) {
            let _ = channel.sender.try_send(Arc::clone(&report));
        }
    }
}

async fn worker(
    obs: Arc<dyn Observe>,
    mut rx: mpsc::Receiver<Arc<Event>>,
    peers: Weak<Channels>,
) {
    while let Some(ev) = rx.recv().await {
        let fut = obs.on_event(ev.as_ref());

        if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            let info = {
                let any = &*panic_err;
                if let Some(msg) = any.downcast_ref::<&'static str>() {
                    (*msg).to_string()
                } else if let Some(msg) = any.downcast_ref::<String>() {
                    msg.clone()
                } else {
                    "unknown panic".to_string()
                }
            };
            tracing::warn!(observer = obs.name(), info = %info, "observer panicked");

            if let Some(peers) = peers.upgrade() {
                let report = Arc::new(Event::observer_panicked(obs.name(), info));
                for channel in peers.iter().filter(|c| c.name != obs.name()) {
                    let _ = channel.sender.try_send(Arc::clone(&report));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        kinds: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Observe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.kinds.lock().unwrap().push(ev.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Panicker;

    #[async_trait]
    impl Observe for Panicker {
        async fn on_event(&self, _ev: &Event) {
            panic!("observer blew up");
        }

        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    struct Stuck;

    #[async_trait]
    impl Observe for Stuck {
        async fn on_event(&self, _ev: &Event) {
            std::future::pending::<()>().await;
        }

        fn name(&self) -> &'static str {
            "stuck"
        }

        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn empty_set_is_noop() {
        let set = ObserverSet::empty();
        assert!(set.is_empty());
        set.emit(Event::new(EventKind::Subscribed));
        set.shutdown().await;
    }

    #[tokio::test]
    async fn delivers_in_order_and_drains_on_shutdown() {
        let rec = Arc::new(Recorder::default());
        let set = ObserverSet::new(vec![rec.clone()]);
        assert_eq!(set.len(), 1);

        set.emit(Event::new(EventKind::Subscribed));
        set.emit(Event::new(EventKind::Unsubscribed));
        set.shutdown().await;

        assert_eq!(
            *rec.kinds.lock().unwrap(),
            vec![EventKind::Subscribed, EventKind::Unsubscribed]
        );
    }

    #[tokio::test]
    async fn panic_is_isolated_and_reported() {
        let rec = Arc::new(Recorder::default());
        let set = ObserverSet::new(vec![Arc::new(Panicker), rec.clone()]);

        set.emit(Event::new(EventKind::Subscribed));

        let seen = tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                if rec
                    .kinds
                    .lock()
                    .unwrap()
                    .contains(&EventKind::ObserverPanicked)
                {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(seen.is_ok(), "panic report never reached the recorder");
        assert!(rec.kinds.lock().unwrap().contains(&EventKind::Subscribed));
    }

    #[tokio::test]
    async fn overflow_is_reported_to_other_observers() {
        let rec = Arc::new(Recorder::default());
        let set = ObserverSet::new(vec![Arc::new(Stuck), rec.clone()]);

        // first event parks the stuck worker, second fills its queue, third overflows
        for _ in 0..3 {
            set.emit(Event::new(EventKind::DeliveryDropped));
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let kinds = rec.kinds.lock().unwrap().clone();
        assert!(kinds.contains(&EventKind::ObserverOverflow), "{kinds:?}");
    }
}
