//! # Dispatcher: the single inbound queue and the fan-out loop.
//!
//! ## Architecture
//! ```text
//! producers ── send(m) ──► [inbound queue] ──► run() loop ──► fan_out(m)
//!   (many)   (bounded wait)    (bounded)         (one task)       │ registry read lock, one pass
//!                                                                 ├─► entry A: attempt(send, deliver_timeout, A.token)
//!                                                                 ├─► entry B: ...
//!                                                                 └─► entry N: ...
//! ```
//!
//! ## Per-entry outcome of one fan-out attempt
//! - entry not `Active`           → skipped
//! - token fired                  → CAS `Active → Closing`, winner spawns `Registry::unsubscribe`
//! - channel accepted             → delivered
//! - receiver dropped by the host → reaped like a cancellation
//! - deadline elapsed             → dropped for this entry only (`DeliveryDropped`)
//!
//! ## Rules
//! - Teardown never runs inside the pass: it is spawned and waits for the write
//!   lock, which it gets once the pass releases the read lock.
//! - No retries. Drops are final and invisible to the producer.
//! - Per-subscriber order is dequeue order; there is one loop.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::attempt::{Outcome, attempt};
use crate::core::config::Config;
use crate::core::entry::Entry;
use crate::core::registry::Registry;
use crate::error::RuntimeError;
use crate::events::{Event, EventKind};
use crate::message::Message;

/// Owns the inbound queue and drives fan-out.
pub(crate) struct Dispatcher {
    cfg: Config,
    registry: Arc<Registry>,
    tx: mpsc::Sender<Message>,
    /// Taken by the first `run`; `None` afterwards.
    rx: Mutex<Option<mpsc::Receiver<Message>>>,
}

impl Dispatcher {
    pub(crate) fn new(cfg: Config, registry: Arc<Registry>) -> Self {
        let (tx, rx) = mpsc::channel(cfg.inbound_capacity_clamped());
        Self {
            cfg,
            registry,
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Enqueues `message`, or drops it if the queue has no room within `send_timeout`.
    pub(crate) async fn send(&self, message: Message) {
        let reason = match attempt(self.tx.reserve(), Some(self.cfg.send_timeout), None).await {
            Outcome::Ready(Ok(permit)) => {
                permit.send(message);
                return;
            }
            Outcome::Ready(Err(_closed)) => "closed",
            Outcome::TimedOut | Outcome::Cancelled => "timeout",
        };

        self.registry.observers().emit(
            Event::new(EventKind::MessageDropped)
                .with_message(message)
                .with_reason(reason),
        );
    }

    /// Runs the dispatch loop until `token` fires.
    ///
    /// Returns [`RuntimeError::AlreadyStarted`] if the loop has been started before.
    pub(crate) async fn run(&self, token: CancellationToken) -> Result<(), RuntimeError> {
        let taken = {
            let mut slot = self.rx.lock().unwrap_or_else(PoisonError::into_inner);
            slot.take()
        };
        let mut rx = taken.ok_or(RuntimeError::AlreadyStarted)?;

        let observers = self.registry.observers();
        observers.emit(Event::new(EventKind::DispatcherStarted));

        let res = loop {
            match attempt(rx.recv(), self.cfg.idle_limit(), Some(&token)).await {
                Outcome::Ready(Some(message)) => self.fan_out(message).await,
                Outcome::Ready(None) => break Err(RuntimeError::InboundClosed),
                Outcome::Cancelled => break Ok(()),
                Outcome::TimedOut => continue,
            }
        };

        let reason = match &res {
            Ok(()) => "cancelled",
            Err(e) => e.as_label(),
        };
        observers.emit(Event::new(EventKind::DispatcherStopped).with_reason(reason));
        res
    }

    /// Delivers one message to every active entry, under the registry read lock.
    async fn fan_out(&self, message: Message) {
        let entries = self.registry.read().await;

        for (key, entry) in entries.iter() {
            if !entry.is_active() {
                continue;
            }

            let outcome = attempt(
                entry.sender().send(message.clone()),
                Some(self.cfg.deliver_timeout),
                Some(entry.cancel_token()),
            )
            .await;

            match outcome {
                Outcome::Ready(Ok(())) => {}
                Outcome::Cancelled => self.schedule_teardown(key, entry, "cancelled"),
                Outcome::Ready(Err(_closed)) => {
                    self.schedule_teardown(key, entry, "receiver_dropped")
                }
                Outcome::TimedOut => self.registry.observers().emit(
                    Event::new(EventKind::DeliveryDropped)
                        .with_key(key.as_str())
                        .with_entry(entry.id())
                        .with_message(message.clone())
                        .with_reason("timeout"),
                ),
            }
        }
    }

    /// Spawns removal of `entry` unless another pass already did.
    fn schedule_teardown(&self, key: &str, entry: &Entry, reason: &'static str) {
        if !entry.begin_closing() {
            return;
        }
        let id = entry.id();
        self.registry.observers().emit(
            Event::new(EventKind::TeardownScheduled)
                .with_key(key)
                .with_entry(id)
                .with_reason(reason),
        );

        let registry = Arc::clone(&self.registry);
        let key = key.to_string();
        tokio::spawn(async move {
            registry.unsubscribe(&key, id).await;
        });
    }
}
