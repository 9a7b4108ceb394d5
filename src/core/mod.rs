//! Runtime core: registry, dispatch loop and the public facade.
//!
//! The public API from this module is [`Broadcast`] (with its builder) and
//! [`Config`]. Everything else is internal.
//!
//! Internal modules:
//! - [`attempt`]: one bounded, cancellable wait used by every suspension point;
//! - [`entry`]: per-subscription state and the teardown gate;
//! - [`registry`]: key → entry map behind a read/write lock;
//! - [`dispatcher`]: inbound queue, dispatch loop, fan-out and teardown scheduling.

mod attempt;
mod broadcast;
mod builder;
mod config;
mod dispatcher;
mod entry;
mod registry;

pub use broadcast::Broadcast;
pub use builder::BroadcastBuilder;
pub use config::Config;
