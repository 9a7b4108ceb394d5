#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use klinecast::{Broadcast, Event, EventKind, Observe};

pub const WINDOW: Duration = Duration::from_secs(2);

/// Polls until `key` is no longer registered. Returns false if `WINDOW` elapses first.
pub async fn wait_gone(broadcast: &Broadcast, key: &str) -> bool {
    tokio::time::timeout(WINDOW, async {
        while broadcast.contains(key).await {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .is_ok()
}

/// Polls until `rec` has seen at least `n` events of `kind` for `key`.
pub async fn wait_count(rec: &Recorder, kind: EventKind, key: &str, n: usize) -> bool {
    tokio::time::timeout(WINDOW, async {
        while rec.count(kind, key) < n {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .is_ok()
}

/// Observer that keeps every event it sees.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self, kind: EventKind, key: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind && e.key.as_deref() == Some(key))
            .count()
    }

    pub fn count_kind(&self, kind: EventKind) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    pub fn reasons(&self, kind: EventKind) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .filter_map(|e| e.reason.as_deref().map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl Observe for Recorder {
    async fn on_event(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}
