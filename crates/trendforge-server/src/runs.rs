//! In-memory registry of background pipeline runs.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use trendforge_pipeline::{PipelineResult, RunState};
use uuid::Uuid;

/// Oldest runs are forgotten once this many are tracked.
const MAX_TRACKED_RUNS: usize = 256;

struct RunEntry {
    state: watch::Receiver<RunState>,
    result: Option<PipelineResult>,
}

#[derive(Default)]
struct Inner {
    runs: HashMap<Uuid, RunEntry>,
    order: VecDeque<Uuid>,
}

/// Point-in-time view of one run.
#[derive(Debug, Clone)]
pub struct RunSnapshot {
    pub state: RunState,
    pub result: Option<PipelineResult>,
}

#[derive(Clone, Default)]
pub struct RunRegistry {
    inner: Arc<RwLock<Inner>>,
    capacity: Option<usize>,
}

impl RunRegistry {
    #[cfg(test)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::default(),
            capacity: Some(capacity),
        }
    }

    /// Register a new run in [`RunState::Idle`] and return its id plus the
    /// sender the pipeline publishes progress to.
    pub async fn register(&self) -> (Uuid, watch::Sender<RunState>) {
        let (tx, rx) = watch::channel(RunState::Idle);
        let id = Uuid::new_v4();
        let capacity = self.capacity.unwrap_or(MAX_TRACKED_RUNS);

        let mut inner = self.inner.write().await;
        inner.runs.insert(
            id,
            RunEntry {
                state: rx,
                result: None,
            },
        );
        inner.order.push_back(id);
        while inner.order.len() > capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.runs.remove(&evicted);
                tracing::debug!(run_id = %evicted, "evicted tracked run");
            }
        }
        (id, tx)
    }

    /// Attach the result of a completed run.
    pub async fn complete(&self, id: Uuid, result: PipelineResult) {
        if let Some(entry) = self.inner.write().await.runs.get_mut(&id) {
            entry.result = Some(result);
        }
    }

    pub async fn snapshot(&self, id: Uuid) -> Option<RunSnapshot> {
        let inner = self.inner.read().await;
        inner.runs.get(&id).map(|entry| RunSnapshot {
            state: entry.state.borrow().clone(),
            result: entry.result.clone(),
        })
    }
}
