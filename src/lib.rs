//! # Trellis Core
//!
//! Ordering engine and domain models for board/column/card organizers.
//!
//! Columns keep dense zero-based positions within their board, and each
//! column owns the explicit order of its cards. Every reorder or move runs
//! inside one storage transaction, so an operation is applied as a whole or
//! not at all.

pub mod config;
pub mod domain;
pub mod error;
pub mod ordering;
pub mod storage;
mod trellis;

// Re-export commonly used types
pub use config::TrellisConfig;
pub use domain::{
    Board, BoardId, Card, CardData, CardId, CardOrder, CardStatus, Column, ColumnId, ColumnStatus,
};
pub use error::{EntityKind, Result, TrellisError};
pub use ordering::{CardOrderer, ColumnOrderer, ColumnView};
pub use storage::Storage;
pub use trellis::Trellis;
