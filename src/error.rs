//! Error types used by the klinecast runtime and its subscriptions.
//!
//! Publishing and subscribing never fail: the fan-out contract is best-effort and
//! lossy, so dropped messages are reported to observers, not to callers. The enums
//! here cover the few places where a caller can actually do something:
//!
//! - [`RuntimeError`] — misuse of the dispatch loop lifecycle.
//! - [`ConfigError`] — settings rejected by [`Config::validate`](crate::Config::validate).
//! - [`TryRecvError`] — non-blocking receive on a [`Subscription`](crate::Subscription).
//!
//! Each type provides `as_label` for logs/metrics.

use thiserror::Error;

/// # Errors produced by the dispatch loop.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// [`Broadcast::run`](crate::Broadcast::run) was called on an instance whose loop
    /// has already been started. There are no restart semantics.
    #[error("dispatch loop already started")]
    AlreadyStarted,

    /// The inbound queue closed underneath the running loop.
    ///
    /// The `Broadcast` holds the only sender, so this means it was torn down
    /// while the loop was still running.
    #[error("inbound queue closed")]
    InboundClosed,
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use klinecast::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::AlreadyStarted.as_label(), "runtime_already_started");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::AlreadyStarted => "runtime_already_started",
            RuntimeError::InboundClosed => "runtime_inbound_closed",
        }
    }
}

/// # Errors reported by configuration validation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A channel capacity was set to zero.
    ///
    /// The accessors clamp to 1, so this only surfaces through `validate()`.
    #[error("{field} must be at least 1")]
    ZeroCapacity {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ZeroCapacity { .. } => "config_zero_capacity",
        }
    }
}

/// # Errors returned by [`Subscription::try_recv`](crate::Subscription::try_recv).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecvError {
    /// No message is buffered right now.
    #[error("no message available")]
    Empty,

    /// The subscription was torn down (cancelled, replaced or the broadcast dropped)
    /// and every buffered message has been consumed.
    #[error("subscription closed")]
    Disconnected,
}

impl TryRecvError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TryRecvError::Empty => "recv_empty",
            TryRecvError::Disconnected => "recv_disconnected",
        }
    }

    /// True if the subscription will never yield another message.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, TryRecvError::Disconnected)
    }
}
