use std::sync::Arc;

use super::{broadcast::Broadcast, config::Config, registry::Registry};
use crate::error::ConfigError;
use crate::observers::{Observe, ObserverSet};

/// Builder for constructing a [`Broadcast`] with optional observers.
pub struct BroadcastBuilder {
    cfg: Config,
    observers: Vec<Arc<dyn Observe>>,
}

impl BroadcastBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            observers: Vec::new(),
        }
    }

    /// Sets event observers (logging, metrics, ...).
    ///
    /// Observers receive subscription and drop events through dedicated workers
    /// with bounded queues; they never slow down publishing or fan-out.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe>>) -> Self {
        self.observers = observers;
        self
    }

    /// Adds one observer.
    pub fn with_observer(mut self, observer: Arc<dyn Observe>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Builds the broadcast, clamping invalid capacities.
    ///
    /// Spawns observer workers, so it must run inside a tokio runtime when
    /// observers were added.
    pub fn build(self) -> Arc<Broadcast> {
        let observers = Arc::new(ObserverSet::new(self.observers));
        let registry = Registry::new(self.cfg.delivery_capacity_clamped(), observers);
        Arc::new(Broadcast::new_internal(self.cfg, registry))
    }

    /// Like [`build`](Self::build) but rejects the configuration instead of clamping it.
    pub fn try_build(self) -> Result<Arc<Broadcast>, ConfigError> {
        self.cfg.validate()?;
        Ok(self.build())
    }
}
