use crate::domain::BoardId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level container owning columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Board {
    pub fn new(name: String) -> Self {
        Self {
            id: BoardId::new(),
            name,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_creation() {
        let board = Board::new("Roadmap".to_string());
        assert_eq!(board.name, "Roadmap");
        assert_ne!(board.id, Board::new("Roadmap".to_string()).id);
    }
}
