use crate::domain::{BoardId, CardOrder, ColumnId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnStatus {
    Active,
    Deleted,
}

impl fmt::Display for ColumnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Deleted => write!(f, "Deleted"),
        }
    }
}

/// A column on a board, holding the order of its cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub title: String,
    /// Rank among the active columns of the board. A deleted column keeps
    /// the slot it held so a restore can put it back there.
    pub position: usize,
    pub status: ColumnStatus,
    #[serde(default)]
    pub card_order: CardOrder,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Column {
    pub fn new(board_id: BoardId, title: String, position: usize) -> Self {
        let now = Utc::now();
        Self {
            id: ColumnId::new(),
            board_id,
            title,
            position,
            status: ColumnStatus::Active,
            card_order: CardOrder::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ColumnStatus::Active
    }

    pub fn set_position(&mut self, position: usize) {
        if self.position != position {
            self.position = position;
            self.updated_at = Utc::now();
        }
    }

    pub fn soft_delete(&mut self) {
        self.status = ColumnStatus::Deleted;
        self.updated_at = Utc::now();
    }

    pub fn restore(&mut self) {
        self.status = ColumnStatus::Active;
        self.updated_at = Utc::now();
    }

    /// Compares titles the way duplicate detection does
    pub fn has_title(&self, title: &str, case_insensitive: bool) -> bool {
        if case_insensitive {
            self.title.to_lowercase() == title.to_lowercase()
        } else {
            self.title == title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_creation() {
        let board = BoardId::new();
        let column = Column::new(board, "Todo".to_string(), 2);

        assert_eq!(column.board_id, board);
        assert_eq!(column.position, 2);
        assert!(column.is_active());
        assert!(column.card_order.is_empty());
    }

    #[test]
    fn test_soft_delete_and_restore_keep_position() {
        let mut column = Column::new(BoardId::new(), "Todo".to_string(), 1);

        column.soft_delete();
        assert_eq!(column.status, ColumnStatus::Deleted);
        assert_eq!(column.position, 1);

        column.restore();
        assert!(column.is_active());
        assert_eq!(column.position, 1);
    }

    #[test]
    fn test_title_comparison() {
        let column = Column::new(BoardId::new(), "Done".to_string(), 0);

        assert!(column.has_title("Done", false));
        assert!(!column.has_title("done", false));
        assert!(column.has_title("DONE", true));
    }

    #[test]
    fn test_backwards_compatibility_deserialization() {
        let json = format!(
            r#"{{
            "id": "{}",
            "board_id": "{}",
            "title": "Old Column",
            "position": 0,
            "status": "active",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }}"#,
            ColumnId::new(),
            BoardId::new()
        );

        let column: Column = serde_json::from_str(&json).unwrap();
        assert!(column.card_order.is_empty());
    }
}
