//! # klinecast
//!
//! **klinecast** is a small in-process fan-out primitive for kline (candlestick)
//! updates: one producer side publishes [`Message`]s, a changing set of keyed
//! subscribers each receive every message published after they subscribed.
//!
//! Delivery is best-effort and lossy under load, by contract: publishing never
//! blocks for long, a slow subscriber loses messages instead of stalling the
//! others, and subscriptions end when the subscriber's own
//! [`CancellationToken`](tokio_util::sync::CancellationToken) fires.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   producer tasks (any number)
//!        │ publish()/send()          bounded wait (Config::send_timeout), else drop
//!        ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Broadcast                                                       │
//! │  - Dispatcher (inbound queue + single dispatch loop)             │
//! │  - Registry   (key → Entry, RwLock<HashMap>)                     │
//! │  - ObserverSet (optional event hooks: LogWriter, metrics, ...)   │
//! └───────┬──────────────────┬──────────────────┬────────────────────┘
//!         │ fan-out pass     │ (registry read lock held for the pass)
//!         ▼                  ▼                  ▼
//!    ┌──────────┐       ┌──────────┐       ┌──────────┐
//!    │ Entry a  │       │ Entry b  │       │ Entry n  │   bounded wait per entry
//!    │ token,tx │       │ token,tx │       │ token,tx │   (Config::deliver_timeout)
//!    └────┬─────┘       └────┬─────┘       └────┬─────┘
//!         ▼                  ▼                  ▼
//!    Subscription       Subscription       Subscription   (recv / try_recv / Stream)
//! ```
//!
//! ### Subscription lifecycle
//! ```text
//! subscribe(token, key) ──► Entry{Active} ──► messages ...
//!
//! token.cancel()
//!   └─► next fan-out pass sees it
//!         ├─► CAS Active → Closing (exactly one winner)
//!         ├─► spawn Registry::unsubscribe(key, id) (does not block the pass)
//!         └─► unsubscribe: write lock → remove → channel closed → recv() == None
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types                               |
//! |-------------------|----------------------------------------------------------|-----------------------------------------|
//! | **Fan-out**       | Publish, subscribe, run the dispatch loop.               | [`Broadcast`], [`Subscription`]         |
//! | **Payload**       | Kline update value type.                                 | [`Message`]                             |
//! | **Observers**     | Hook into subscription/drop events (logging, metrics).   | [`Observe`], [`ObserverSet`], [`LogWriter`] |
//! | **Configuration** | Bounded waits and channel capacities.                    | [`Config`]                              |
//! | **Errors**        | Lifecycle misuse and config validation.                  | [`RuntimeError`], [`ConfigError`]       |
//!
//! ## Optional features
//! - `serde`: derives `Serialize`/`Deserialize` on [`Message`].
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use klinecast::{Broadcast, Config, LogWriter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let broadcast = Broadcast::builder(Config::default().with_deliver_timeout(Duration::from_millis(10)))
//!         .with_observer(Arc::new(LogWriter::new()))
//!         .build();
//!
//!     let stop = CancellationToken::new();
//!     let dispatch = broadcast.spawn(stop.clone());
//!
//!     let mut a = broadcast.subscribe(CancellationToken::new(), "a").await;
//!     let mut b = broadcast.subscribe(CancellationToken::new(), "b").await;
//!
//!     broadcast.publish("BTCUSDT", "1", 1_700_000_000, true).await;
//!     assert_eq!(a.recv().await.unwrap().start_time, 1_700_000_000);
//!     assert_eq!(b.recv().await.unwrap().start_time, 1_700_000_000);
//!
//!     stop.cancel();
//!     dispatch.await??;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod message;
mod observers;
mod subscription;

// ---- Public re-exports ----

pub use self::core::{Broadcast, BroadcastBuilder, Config};
pub use error::{ConfigError, RuntimeError, TryRecvError};
pub use events::{Event, EventKind};
pub use message::Message;
pub use observers::{LogWriter, Observe, ObserverSet};
pub use subscription::Subscription;
