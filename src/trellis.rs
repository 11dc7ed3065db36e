use crate::{
    config::{StorageBackend, TrellisConfig},
    domain::{Board, BoardId},
    error::Result,
    ordering::{CardOrderer, ColumnOrderer},
    storage::{memory_storage::MemoryStorage, Storage},
};
use std::sync::Arc;

/// Entry point tying a storage backend to the column and card orderers
#[derive(Clone)]
pub struct Trellis {
    storage: Arc<dyn Storage>,
    config: TrellisConfig,
}

impl Trellis {
    pub fn new(storage: Arc<dyn Storage>, config: TrellisConfig) -> Self {
        Self { storage, config }
    }

    /// A Trellis backed by in-process memory with default settings
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), TrellisConfig::default())
    }

    /// Builds the backend named in `config` and initializes it
    pub async fn open(config: TrellisConfig) -> Result<Self> {
        let storage: Arc<dyn Storage> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
            #[cfg(feature = "file-storage")]
            StorageBackend::File => Arc::new(crate::storage::file_storage::FileStorage::at(
                config.storage.path.clone(),
            )),
            #[cfg(not(feature = "file-storage"))]
            StorageBackend::File => {
                return Err(crate::error::TrellisError::ConfigError(
                    "file storage support is not compiled in".to_string(),
                ))
            }
        };

        storage.initialize().await?;
        tracing::debug!(backend = ?config.storage.backend, "opened trellis storage");
        Ok(Self::new(storage, config))
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn config(&self) -> &TrellisConfig {
        &self.config
    }

    pub fn columns(&self) -> ColumnOrderer {
        ColumnOrderer::new(self.storage.clone(), self.config.columns.clone())
    }

    pub fn cards(&self) -> CardOrderer {
        CardOrderer::new(self.storage.clone())
    }

    /// Creates an empty board
    pub async fn create_board(&self, name: &str) -> Result<Board> {
        let board = Board::new(name.to_string());

        let mut tx = self.storage.begin().await?;
        tx.save_board(&board).await?;
        tx.commit().await?;

        Ok(board)
    }

    pub async fn get_board(&self, id: &BoardId) -> Result<Board> {
        let mut tx = self.storage.begin().await?;
        tx.load_board(id).await
    }
}
