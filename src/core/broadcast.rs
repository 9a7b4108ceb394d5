//! # Broadcast: the public fan-out facade.
//!
//! The [`Broadcast`] owns a registry of subscriptions, a dispatcher with its
//! inbound queue, and the observer set both of them report to.
//!
//! ## Key responsibilities
//! - accept messages from any number of producers (`send` / `publish`)
//! - register subscriptions (`subscribe`) and hand back a [`Subscription`]
//! - run the single dispatch loop (`run` / `spawn`) until its token fires
//!
//! ## High-level architecture
//! ```text
//! Broadcast
//!   ├─ Registry    HashMap<key, Entry> behind RwLock
//!   ├─ Dispatcher  inbound mpsc + loop + fan-out
//!   └─ ObserverSet Event fan-out to LogWriter / custom observers
//!
//! producer ─ publish() ─► Dispatcher::send ─► [inbound] ─► run loop ─► fan_out
//!                                                                     └─► Entry.tx ─► Subscription
//! consumer ─ subscribe(token, key) ─► Registry::subscribe ─► Subscription
//!            token.cancel() ─► (next fan-out) Closing ─► spawned Registry::unsubscribe ─► channel closed
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use klinecast::{Broadcast, Config};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default().with_deliver_timeout(Duration::from_millis(10));
//!     let broadcast = Broadcast::new(cfg);
//!
//!     let stop = CancellationToken::new();
//!     let loop_handle = broadcast.spawn(stop.clone());
//!
//!     let client = CancellationToken::new();
//!     let mut sub = broadcast.subscribe(client.clone(), "client-1").await;
//!
//!     broadcast.publish("BTCUSDT", "1", 1_700_000_000, true).await;
//!     let m = sub.recv().await.expect("delivered");
//!     assert_eq!(m.symbol(), "BTCUSDT");
//!
//!     client.cancel();
//!     stop.cancel();
//!     loop_handle.await??;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::builder::BroadcastBuilder;
use crate::core::config::Config;
use crate::core::dispatcher::Dispatcher;
use crate::core::registry::Registry;
use crate::error::RuntimeError;
use crate::message::Message;
use crate::subscription::Subscription;

/// Lossy in-process fan-out of [`Message`]s to keyed subscriptions.
pub struct Broadcast {
    cfg: Config,
    registry: Arc<Registry>,
    dispatcher: Dispatcher,
}

impl Broadcast {
    /// Creates a broadcast without observers.
    ///
    /// Capacities in `cfg` are clamped to at least 1.
    #[must_use]
    pub fn new(cfg: Config) -> Arc<Self> {
        Self::builder(cfg).build()
    }

    /// Returns a builder for a broadcast with observers.
    #[must_use]
    pub fn builder(cfg: Config) -> BroadcastBuilder {
        BroadcastBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, registry: Arc<Registry>) -> Self {
        let dispatcher = Dispatcher::new(cfg.clone(), Arc::clone(&registry));
        Self {
            cfg,
            registry,
            dispatcher,
        }
    }

    /// Registers a subscription under `key` and returns its receive handle.
    ///
    /// Firing `token` is how the subscription ends: the next fan-out pass that
    /// sees it schedules teardown, which closes the handle. A later call with the
    /// same key replaces (and closes) the current subscription.
    pub async fn subscribe(&self, token: CancellationToken, key: impl AsRef<str>) -> Subscription {
        self.registry.subscribe(token, key.as_ref()).await
    }

    /// Enqueues a message for fan-out.
    ///
    /// Waits at most [`Config::send_timeout`] for room in the inbound queue, then
    /// drops the message. Never reports failure to the caller.
    pub async fn send(&self, message: Message) {
        self.dispatcher.send(message).await;
    }

    /// Builds a [`Message`] from its fields and [`send`](Self::send)s it.
    pub async fn publish(
        &self,
        symbol: impl Into<Arc<str>>,
        timeframe: impl Into<Arc<str>>,
        start_time: i64,
        confirm: bool,
    ) {
        self.send(Message::new(symbol, timeframe, start_time, confirm))
            .await;
    }

    /// Runs the dispatch loop until `token` fires.
    ///
    /// Must be called exactly once per instance; later calls return
    /// [`RuntimeError::AlreadyStarted`] immediately.
    pub async fn run(&self, token: CancellationToken) -> Result<(), RuntimeError> {
        self.dispatcher.run(token).await
    }

    /// Spawns [`run`](Self::run) on the current tokio runtime.
    pub fn spawn(self: &Arc<Self>, token: CancellationToken) -> JoinHandle<Result<(), RuntimeError>> {
        let me = Arc::clone(self);
        tokio::spawn(async move { me.run(token).await })
    }

    /// Returns the sorted keys of all registered subscriptions.
    ///
    /// Includes entries whose teardown is scheduled but not finished yet.
    pub async fn keys(&self) -> Vec<String> {
        self.registry.keys().await
    }

    /// Number of registered subscriptions.
    pub async fn len(&self) -> usize {
        self.registry.len().await
    }

    /// True if no subscription is registered.
    pub async fn is_empty(&self) -> bool {
        self.registry.len().await == 0
    }

    /// True if a subscription is registered under `key`.
    pub async fn contains(&self, key: &str) -> bool {
        self.registry.contains(key).await
    }

    /// Configuration this instance was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }
}
