//! # Bounded, cancellable attempts.
//!
//! Every suspension point of the broadcast goes through [`attempt`]: run an
//! operation, give up after a limit, give up earlier if a token fires.
//!
//! ```text
//! enqueue   attempt(tx.send(m),          Some(send_timeout),    None)
//! dequeue   attempt(rx.recv(),           idle_limit(),          Some(loop token))
//! deliver   attempt(entry.tx.send(m),    Some(deliver_timeout), Some(entry token))
//! ```
//!
//! ## Rules
//! - Branches are polled in a fixed order: cancellation, operation, deadline.
//!   A token that has already fired wins over a ready operation, and a ready
//!   operation wins over an expired deadline (so a zero limit means "try once").
//! - `limit = None` waits without a deadline; `cancel = None` is never cancelled.
//! - Dropping the operation on `Cancelled`/`TimedOut` must be harmless: callers
//!   only pass cancel-safe futures (`mpsc` send/recv).

use std::future::{Future, pending};
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

/// Result of one [`attempt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome<T> {
    /// The operation completed.
    Ready(T),
    /// The token fired first.
    Cancelled,
    /// The limit elapsed first.
    TimedOut,
}

/// Runs `op` until it completes, `limit` elapses or `cancel` fires.
pub(crate) async fn attempt<F>(
    op: F,
    limit: Option<Duration>,
    cancel: Option<&CancellationToken>,
) -> Outcome<F::Output>
where
    F: Future,
{
    let cancelled = async {
        match cancel {
            Some(token) => token.cancelled().await,
            None => pending::<()>().await,
        }
    };
    let deadline = async {
        match limit {
            Some(d) => time::sleep(d).await,
            None => pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancelled => Outcome::Cancelled,
        v = op => Outcome::Ready(v),
        _ = deadline => Outcome::TimedOut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ready_operation_wins() {
        let out = attempt(async { 7 }, Some(Duration::ZERO), None).await;
        assert_eq!(out, Outcome::Ready(7));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_limit() {
        let out = attempt(pending::<()>(), Some(Duration::from_millis(5)), None).await;
        assert_eq!(out, Outcome::TimedOut);
    }

    #[tokio::test]
    async fn fired_token_beats_ready_operation() {
        let token = CancellationToken::new();
        token.cancel();
        let out = attempt(async { 1 }, None, Some(&token)).await;
        assert_eq!(out, Outcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_unbounded_wait() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });
        let out = attempt(pending::<()>(), None, Some(&token)).await;
        assert_eq!(out, Outcome::Cancelled);
    }
}
