use crate::{
    error::{Result, TrellisError},
    storage::{
        snapshot::{SnapshotSink, SnapshotTransaction},
        Snapshot, Storage, Transaction,
    },
};
use async_trait::async_trait;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{
    fs,
    sync::{Mutex, OwnedMutexGuard},
};

/// File-based storage keeping the whole store in one JSON snapshot
pub struct FileStorage {
    root_path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileStorage {
    pub const DEFAULT_DIR: &'static str = ".trellis";
    const STORE_FILE: &'static str = "store.json";
    const STORE_TMP_FILE: &'static str = "store.json.tmp";

    /// Creates a new FileStorage rooted at `<project_root>/.trellis`
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self::at(project_root.as_ref().join(Self::DEFAULT_DIR))
    }

    /// Creates a new FileStorage using `data_dir` as-is
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_path: data_dir.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn store_file(&self) -> PathBuf {
        self.root_path.join(Self::STORE_FILE)
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    async fn read_snapshot(&self) -> Result<Snapshot> {
        let store_file = self.store_file();

        if !store_file.exists() {
            return Err(TrellisError::NotInitialized);
        }

        let contents = fs::read_to_string(&store_file).await?;
        let snapshot: Snapshot = serde_json::from_str(&contents)?;

        Ok(snapshot)
    }
}

/// Writes the snapshot next to the store and renames it into place, so
/// readers see either the old or the new store, never a partial one.
async fn write_snapshot(root: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    let tmp = root.join(FileStorage::STORE_TMP_FILE);

    fs::write(&tmp, json).await?;
    fs::rename(&tmp, root.join(FileStorage::STORE_FILE)).await?;
    Ok(())
}

struct FileSink {
    root: PathBuf,
    _guard: OwnedMutexGuard<()>,
}

#[async_trait]
impl SnapshotSink for FileSink {
    async fn persist(self, snapshot: Snapshot) -> Result<()> {
        write_snapshot(&self.root, &snapshot).await?;
        tracing::debug!(root = %self.root.display(), "committed store snapshot");
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        let _guard = self.lock.lock().await;
        if !self.store_file().exists() {
            write_snapshot(&self.root_path, &Snapshot::default()).await?;
        }

        let gitignore_path = self.root_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "# Interrupted commits\n*.tmp\n").await?;
        }

        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.store_file().exists()
    }

    async fn begin(&self) -> Result<Box<dyn Transaction>> {
        let guard = self.lock.clone().lock_owned().await;
        let working = self.read_snapshot().await?;

        Ok(Box::new(SnapshotTransaction::new(
            working,
            FileSink {
                root: self.root_path.clone(),
                _guard: guard,
            },
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Board, Card, CardData, Column};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_storage_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(!storage.is_initialized().await);

        storage.initialize().await.unwrap();

        assert!(storage.is_initialized().await);
        assert!(storage.store_file().exists());
    }

    #[tokio::test]
    async fn test_begin_requires_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(matches!(
            storage.begin().await,
            Err(TrellisError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_committed_state_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let board = Board::new("Team".to_string());
        let mut column = Column::new(board.id, "Todo".to_string(), 0);
        let card = Card::new(column.id, CardData::new("Ship it"), "alice".to_string());
        column.card_order.insert_at_head(card.id);

        let mut tx = storage.begin().await.unwrap();
        tx.save_board(&board).await.unwrap();
        tx.save_column(&column).await.unwrap();
        tx.save_card(&card).await.unwrap();
        tx.commit().await.unwrap();

        let reopened = FileStorage::new(temp_dir.path());
        let mut tx = reopened.begin().await.unwrap();
        let loaded = tx.load_column(&column.id).await.unwrap();
        assert_eq!(loaded.card_order.as_slice(), &[card.id]);
        assert_eq!(tx.list_cards(&column.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_not_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let board = Board::new("Team".to_string());
        {
            let mut tx = storage.begin().await.unwrap();
            tx.save_board(&board).await.unwrap();
        }

        let mut tx = storage.begin().await.unwrap();
        assert!(matches!(
            tx.load_board(&board.id).await,
            Err(TrellisError::BoardNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_initialize_keeps_existing_store() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let board = Board::new("Team".to_string());
        let mut tx = storage.begin().await.unwrap();
        tx.save_board(&board).await.unwrap();
        tx.commit().await.unwrap();

        storage.initialize().await.unwrap();

        let mut tx = storage.begin().await.unwrap();
        assert!(tx.load_board(&board.id).await.is_ok());
    }
}
