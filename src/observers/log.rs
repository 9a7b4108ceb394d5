//! # LogWriter — structured event logger
//!
//! A minimal observer that forwards incoming [`Event`]s to `tracing`. The crate
//! never installs a global subscriber; pick one in the host (see `demos/ticker.rs`).
//!
//! Levels:
//! - `debug`: per-message drops (noisy under load by nature)
//! - `info`: subscription and dispatcher lifecycle
//! - `warn`: observer overflow/panic
//!
//! ## Example output (`tracing_subscriber::fmt`)
//! ```text
//! INFO klinecast: subscribed key="a" entry=3
//! DEBUG klinecast: delivery dropped key="a" message=BTCUSDT@1 start=1700000000 confirm=true reason="timeout"
//! INFO klinecast: teardown scheduled key="a" entry=3 reason="cancelled"
//! INFO klinecast: unsubscribed key="a" entry=3
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::observers::Observe;

const TARGET: &str = "klinecast";

/// Event writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Observe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let key = e.key.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::DispatcherStarted => {
                tracing::info!(target: TARGET, seq = e.seq, "dispatcher started");
            }
            EventKind::DispatcherStopped => {
                tracing::info!(target: TARGET, seq = e.seq, reason, "dispatcher stopped");
            }
            EventKind::Subscribed => {
                tracing::info!(target: TARGET, key, entry = e.entry, "subscribed");
            }
            EventKind::Replaced => {
                tracing::info!(target: TARGET, key, entry = e.entry, "replaced");
            }
            EventKind::TeardownScheduled => {
                tracing::info!(target: TARGET, key, entry = e.entry, reason, "teardown scheduled");
            }
            EventKind::Unsubscribed => {
                tracing::info!(target: TARGET, key, entry = e.entry, "unsubscribed");
            }
            EventKind::MessageDropped => {
                tracing::debug!(
                    target: TARGET,
                    message = e.message.as_ref().map(tracing::field::display),
                    reason,
                    "message dropped"
                );
            }
            EventKind::DeliveryDropped => {
                tracing::debug!(
                    target: TARGET,
                    key,
                    message = e.message.as_ref().map(tracing::field::display),
                    reason,
                    "delivery dropped"
                );
            }
            EventKind::ObserverOverflow => {
                tracing::warn!(
                    target: TARGET,
                    observer = e.observer.unwrap_or("unknown"),
                    reason,
                    "observer overflow"
                );
            }
            EventKind::ObserverPanicked => {
                tracing::warn!(
                    target: TARGET,
                    observer = e.observer.unwrap_or("unknown"),
                    info = reason,
                    "observer panicked"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
