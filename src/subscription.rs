//! # Receive-only subscription handle.
//!
//! A [`Subscription`] is what [`Broadcast::subscribe`](crate::Broadcast::subscribe)
//! hands back: the receiving half of one subscriber's delivery channel. It yields
//! messages until the broadcast closes the channel (cancellation teardown, or a
//! later subscribe under the same key) and buffered messages are drained.
//!
//! It also implements [`futures::Stream`], so it plugs directly into a streaming
//! transport:
//! ```rust,no_run
//! use futures::StreamExt;
//! # async fn demo(mut sub: klinecast::Subscription) {
//! while let Some(m) = sub.next().await {
//!     println!("{m}");
//! }
//! # }
//! ```

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::error::TryRecvError;
use crate::message::Message;

/// Receive-only handle to one subscription.
#[derive(Debug)]
pub struct Subscription {
    key: Arc<str>,
    id: u64,
    rx: mpsc::Receiver<Message>,
}

impl Subscription {
    pub(crate) fn new(key: Arc<str>, id: u64, rx: mpsc::Receiver<Message>) -> Self {
        Self { key, id, rx }
    }

    /// The key this subscription was registered under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Registry entry id; distinguishes successive subscriptions under one key.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Receives the next message.
    ///
    /// Returns `None` once the subscription is closed and drained.
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Receives a buffered message without waiting.
    pub fn try_recv(&mut self) -> Result<Message, TryRecvError> {
        self.rx.try_recv().map_err(|e| match e {
            mpsc::error::TryRecvError::Empty => TryRecvError::Empty,
            mpsc::error::TryRecvError::Disconnected => TryRecvError::Disconnected,
        })
    }

    /// True once the broadcast has closed this subscription.
    ///
    /// Buffered messages may still be pending; `recv` returns them before `None`.
    pub fn is_closed(&self) -> bool {
        self.rx.is_closed()
    }
}

impl Stream for Subscription {
    type Item = Message;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        this.rx.poll_recv(cx)
    }
}
