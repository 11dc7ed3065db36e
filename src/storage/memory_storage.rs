use crate::{
    error::Result,
    storage::{
        snapshot::{SnapshotSink, SnapshotTransaction},
        Snapshot, Storage, Transaction,
    },
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// In-process storage, mainly for tests and embedding
#[derive(Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<Snapshot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed state
    pub async fn snapshot(&self) -> Snapshot {
        let state = self.state.lock().await;
        (*state).clone()
    }
}

struct MemorySink(OwnedMutexGuard<Snapshot>);

#[async_trait]
impl SnapshotSink for MemorySink {
    async fn persist(mut self, snapshot: Snapshot) -> Result<()> {
        *self.0 = snapshot;
        tracing::debug!("committed in-memory snapshot");
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        true
    }

    async fn begin(&self) -> Result<Box<dyn Transaction>> {
        let guard = self.state.clone().lock_owned().await;
        let working = (*guard).clone();
        Ok(Box::new(SnapshotTransaction::new(working, MemorySink(guard))))
    }
}
