//! # Observers for broadcast events.
//!
//! This module provides the [`Observe`] trait, the [`ObserverSet`] fan-out and the
//! built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Registry ───┐
//!             ├──► ObserverSet::emit(Event) ──► per-observer queue ──► Observe::on_event(&Event)
//! Dispatcher ─┘                                                           │
//!                                                         ┌───────────────┼──────────┐
//!                                                         ▼               ▼          ▼
//!                                                     LogWriter        Metrics     Custom
//! ```

mod log;
mod observe;
mod set;

pub use log::LogWriter;
pub use observe::Observe;
pub use set::ObserverSet;
