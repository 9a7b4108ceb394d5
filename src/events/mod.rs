//! Runtime events: the data model observers receive.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Emitters**: `Registry` (subscribe/unsubscribe), `Dispatcher` (loop lifecycle,
//!   drops, teardown scheduling), `ObserverSet` workers (panics).
//! - **Consumers**: user observers via [`ObserverSet`](crate::ObserverSet).

mod event;

pub use event::{Event, EventKind};
