use crate::domain::{BoardId, CardId, ColumnId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrellisError>;

/// Kind of entity a lifecycle error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Board,
    Column,
    Card,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Board => write!(f, "board"),
            Self::Column => write!(f, "column"),
            Self::Card => write!(f, "card"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("Board not found: {0}")]
    BoardNotFound(BoardId),

    #[error("Column not found: {0}")]
    ColumnNotFound(ColumnId),

    #[error("Card not found: {0}")]
    CardNotFound(CardId),

    #[error("Board {board} already has an active column titled '{title}'")]
    DuplicateTitle { board: BoardId, title: String },

    #[error("{kind} {id} is already deleted")]
    AlreadyDeleted { kind: EntityKind, id: String },

    #[error("{kind} {id} is already active")]
    AlreadyActive { kind: EntityKind, id: String },

    #[error("Column {column} does not belong to board {board}")]
    UnauthorizedColumnAccess { board: BoardId, column: ColumnId },

    #[error("Card {0} is deleted")]
    CardDeleted(CardId),

    #[error("Card {card} does not belong to column {column}")]
    CardNotInColumn { card: CardId, column: ColumnId },

    #[error("Storage not initialized")]
    NotInitialized,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TrellisError {
    pub(crate) fn column_deleted(id: ColumnId) -> Self {
        Self::AlreadyDeleted {
            kind: EntityKind::Column,
            id: id.to_string(),
        }
    }

    pub(crate) fn column_active(id: ColumnId) -> Self {
        Self::AlreadyActive {
            kind: EntityKind::Column,
            id: id.to_string(),
        }
    }
}
