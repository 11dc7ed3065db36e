use crate::domain::{CardId, ColumnId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a card. `Deleted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Active,
    Deleted,
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Deleted => write!(f, "Deleted"),
        }
    }
}

/// Editable content of a card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl CardData {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// A work item owned by exactly one column at a time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub column_id: ColumnId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: CardStatus,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(column_id: ColumnId, data: CardData, created_by: String) -> Self {
        let now = Utc::now();
        Self {
            id: CardId::new(),
            column_id,
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            status: CardStatus::Active,
            created_by,
            deleted_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CardStatus::Active
    }

    /// Replaces the editable content
    pub fn apply(&mut self, data: CardData) {
        self.title = data.title;
        self.description = data.description;
        self.due_date = data.due_date;
        self.updated_at = Utc::now();
    }

    pub fn move_to(&mut self, column_id: ColumnId) {
        self.column_id = column_id;
        self.updated_at = Utc::now();
    }

    pub fn soft_delete(&mut self, requester: String) {
        self.status = CardStatus::Deleted;
        self.deleted_by = Some(requester);
        self.updated_at = Utc::now();
    }
}
