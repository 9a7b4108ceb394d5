//! # Observer trait: optional hooks into the broadcast lifecycle.
//!
//! [`Observe`] is the extension point for logging, metrics or audit of the
//! broadcast. Nothing in the core depends on an observer being present; the
//! registry and the dispatch loop only emit [`Event`]s into the
//! [`ObserverSet`](crate::ObserverSet), which fans them out without waiting.
//!
//! Each observer gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-observer bounded queue** (capacity via [`Observe::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported as `EventKind::ObserverPanicked`)
//!
//! ## Architecture
//! ```text
//! Registry / Dispatcher ──► ObserverSet::emit ──► [bounded queue] ──► worker ──► observer.on_event()
//!                                                                   └─► panic caught → ObserverPanicked
//! ```
//!
//! ## Rules
//! - A slow observer only affects its own queue.
//! - Queue overflow drops the event **for this observer only**.
//! - Events are processed sequentially (FIFO) per observer.
//! - Observers never block subscribe, unsubscribe or fan-out.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use async_trait::async_trait;
//! use klinecast::{Event, EventKind, Observe};
//!
//! #[derive(Default)]
//! struct DropCounter(AtomicU64);
//!
//! #[async_trait]
//! impl Observe for DropCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::DeliveryDropped) {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "drop-counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event observer for broadcast observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing affects only this observer's queue.
#[async_trait]
pub trait Observe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, never from the registry or the
    /// dispatch loop. Events are delivered in FIFO order per observer.
    async fn on_event(&self, event: &Event);

    /// Returns the observer name used in logs and overflow/panic events.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this observer.
    ///
    /// The runtime clamps capacity to a minimum of 1.
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
