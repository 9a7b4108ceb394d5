//! # Broadcast runtime configuration.
//!
//! Provides [`Config`] centralized settings for a [`Broadcast`](crate::Broadcast).
//!
//! Every bounded wait used by the runtime lives here so drop-under-load behavior
//! can be tuned (and made deterministic in tests) without touching code.
//!
//! ## Sentinel values
//! - `idle_interval = 0s` → no periodic wake; the loop blocks on {message, cancellation}
//! - capacities of `0` are clamped to 1 by the accessors (and rejected by [`Config::validate`])

use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for a broadcast instance.
///
/// ## Field semantics
/// - `send_timeout`: how long `send` waits for room in the inbound queue before dropping
/// - `deliver_timeout`: how long one fan-out attempt waits on a single subscriber
/// - `idle_interval`: periodic dispatch-loop wake (`0s` = disabled)
/// - `inbound_capacity`: inbound queue size (min 1)
/// - `delivery_capacity`: per-subscriber channel size (min 1)
///
/// ## Notes
/// All fields are public. Prefer the accessors to avoid sprinkling sentinel
/// checks across the codebase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum wait for the inbound queue to accept a message.
    ///
    /// When it elapses the message is dropped and `MessageDropped` is emitted.
    pub send_timeout: Duration,

    /// Maximum wait for one subscriber to accept one message.
    ///
    /// When it elapses the message is dropped for that subscriber only; the
    /// subscriber is not removed for being slow.
    pub deliver_timeout: Duration,

    /// Idle wake interval of the dispatch loop.
    ///
    /// - `Duration::ZERO` = disabled (cancellation-aware blocking dequeue)
    /// - `> 0` = the loop re-checks cancellation at least this often
    pub idle_interval: Duration,

    /// Capacity of the inbound queue between producers and the dispatch loop.
    pub inbound_capacity: usize,

    /// Capacity of each subscriber's delivery channel.
    ///
    /// Messages that do not fit within `deliver_timeout` are dropped for that subscriber.
    pub delivery_capacity: usize,
}

impl Config {
    /// Returns the idle wake interval as an `Option`.
    ///
    /// - `None` → no periodic wake
    /// - `Some(d)` → wake every `d`
    #[inline]
    pub fn idle_limit(&self) -> Option<Duration> {
        if self.idle_interval == Duration::ZERO {
            None
        } else {
            Some(self.idle_interval)
        }
    }

    /// Returns the inbound capacity clamped to a minimum of 1.
    #[inline]
    pub fn inbound_capacity_clamped(&self) -> usize {
        self.inbound_capacity.max(1)
    }

    /// Returns the per-subscriber capacity clamped to a minimum of 1.
    #[inline]
    pub fn delivery_capacity_clamped(&self) -> usize {
        self.delivery_capacity.max(1)
    }

    /// Sets [`Config::send_timeout`].
    #[must_use]
    pub fn with_send_timeout(mut self, d: Duration) -> Self {
        self.send_timeout = d;
        self
    }

    /// Sets [`Config::deliver_timeout`].
    #[must_use]
    pub fn with_deliver_timeout(mut self, d: Duration) -> Self {
        self.deliver_timeout = d;
        self
    }

    /// Sets [`Config::idle_interval`].
    #[must_use]
    pub fn with_idle_interval(mut self, d: Duration) -> Self {
        self.idle_interval = d;
        self
    }

    /// Sets [`Config::inbound_capacity`].
    #[must_use]
    pub fn with_inbound_capacity(mut self, n: usize) -> Self {
        self.inbound_capacity = n;
        self
    }

    /// Sets [`Config::delivery_capacity`].
    #[must_use]
    pub fn with_delivery_capacity(mut self, n: usize) -> Self {
        self.delivery_capacity = n;
        self
    }

    /// Checks settings that the accessors would otherwise silently clamp.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inbound_capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                field: "inbound_capacity",
            });
        }
        if self.delivery_capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                field: "delivery_capacity",
            });
        }
        Ok(())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `send_timeout = 1ms`
    /// - `deliver_timeout = 1ms`
    /// - `idle_interval = 0s` (disabled)
    /// - `inbound_capacity = 1`
    /// - `delivery_capacity = 1`
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_millis(1),
            deliver_timeout: Duration::from_millis(1),
            idle_interval: Duration::ZERO,
            inbound_capacity: 1,
            delivery_capacity: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_idle_interval_disables_wake() {
        let cfg = Config::default();
        assert_eq!(cfg.idle_limit(), None);

        let cfg = cfg.with_idle_interval(Duration::from_millis(5));
        assert_eq!(cfg.idle_limit(), Some(Duration::from_millis(5)));
    }

    #[test]
    fn capacities_are_clamped() {
        let cfg = Config::default()
            .with_inbound_capacity(0)
            .with_delivery_capacity(0);
        assert_eq!(cfg.inbound_capacity_clamped(), 1);
        assert_eq!(cfg.delivery_capacity_clamped(), 1);
    }

    #[test]
    fn validate_rejects_zero_capacity() {
        assert!(Config::default().validate().is_ok());

        let err = Config::default()
            .with_delivery_capacity(0)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ZeroCapacity {
                field: "delivery_capacity"
            }
        );
    }
}
