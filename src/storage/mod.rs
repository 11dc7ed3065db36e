use crate::{
    domain::{Board, BoardId, Card, CardId, Column, ColumnId},
    error::Result,
};
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;
mod snapshot;

pub use snapshot::Snapshot;

/// Storage backend for boards, columns and cards
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Checks if the storage has been initialized
    async fn is_initialized(&self) -> bool;

    /// Opens a transaction.
    ///
    /// The transaction holds the backend's exclusive lock until it is
    /// committed or dropped, so one operation's reads and writes never
    /// interleave with another's.
    async fn begin(&self) -> Result<Box<dyn Transaction>>;
}

/// A unit of work against a storage backend.
///
/// Saves are staged and become visible to other transactions only after
/// `commit`. Dropping a transaction without committing rolls it back.
#[async_trait]
pub trait Transaction: Send {
    /// Loads a board by ID
    async fn load_board(&mut self, id: &BoardId) -> Result<Board>;

    /// Loads a column by ID, whatever its status
    async fn load_column(&mut self, id: &ColumnId) -> Result<Column>;

    /// Lists every column of a board, active and deleted, by position
    async fn list_columns(&mut self, board: &BoardId) -> Result<Vec<Column>>;

    /// Loads a card by ID, whatever its status
    async fn load_card(&mut self, id: &CardId) -> Result<Card>;

    /// Lists every card owned by a column, oldest first
    async fn list_cards(&mut self, column: &ColumnId) -> Result<Vec<Card>>;

    /// Stages a board write
    async fn save_board(&mut self, board: &Board) -> Result<()>;

    /// Stages a column write, including its card order
    async fn save_column(&mut self, column: &Column) -> Result<()>;

    /// Stages a card write
    async fn save_card(&mut self, card: &Card) -> Result<()>;

    /// Applies every staged write as one unit
    async fn commit(self: Box<Self>) -> Result<()>;
}
