use crate::{
    domain::{Board, BoardId, Card, CardId, Column, ColumnId},
    error::{Result, TrellisError},
    storage::Transaction,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete persisted state of a store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub boards: BTreeMap<BoardId, Board>,
    #[serde(default)]
    pub columns: BTreeMap<ColumnId, Column>,
    #[serde(default)]
    pub cards: BTreeMap<CardId, Card>,
}

/// Destination of a committed snapshot
#[async_trait]
pub(crate) trait SnapshotSink: Send + 'static {
    async fn persist(self, snapshot: Snapshot) -> Result<()>;
}

/// Transaction over a private working copy of a snapshot.
///
/// The sink holds the backend's lock for as long as the transaction lives.
/// Writes only reach the sink on `commit`; dropping the transaction discards
/// them.
pub(crate) struct SnapshotTransaction<S> {
    working: Snapshot,
    sink: S,
    dirty: bool,
}

impl<S: SnapshotSink> SnapshotTransaction<S> {
    pub(crate) fn new(working: Snapshot, sink: S) -> Self {
        Self {
            working,
            sink,
            dirty: false,
        }
    }
}

#[async_trait]
impl<S: SnapshotSink> Transaction for SnapshotTransaction<S> {
    async fn load_board(&mut self, id: &BoardId) -> Result<Board> {
        self.working
            .boards
            .get(id)
            .cloned()
            .ok_or(TrellisError::BoardNotFound(*id))
    }

    async fn load_column(&mut self, id: &ColumnId) -> Result<Column> {
        self.working
            .columns
            .get(id)
            .cloned()
            .ok_or(TrellisError::ColumnNotFound(*id))
    }

    async fn list_columns(&mut self, board: &BoardId) -> Result<Vec<Column>> {
        let mut columns: Vec<Column> = self
            .working
            .columns
            .values()
            .filter(|c| c.board_id == *board)
            .cloned()
            .collect();
        columns.sort_by_key(|c| (c.position, c.created_at));
        Ok(columns)
    }

    async fn load_card(&mut self, id: &CardId) -> Result<Card> {
        self.working
            .cards
            .get(id)
            .cloned()
            .ok_or(TrellisError::CardNotFound(*id))
    }

    async fn list_cards(&mut self, column: &ColumnId) -> Result<Vec<Card>> {
        let mut cards: Vec<Card> = self
            .working
            .cards
            .values()
            .filter(|c| c.column_id == *column)
            .cloned()
            .collect();
        cards.sort_by_key(|c| c.created_at);
        Ok(cards)
    }

    async fn save_board(&mut self, board: &Board) -> Result<()> {
        self.working.boards.insert(board.id, board.clone());
        self.dirty = true;
        Ok(())
    }

    async fn save_column(&mut self, column: &Column) -> Result<()> {
        self.working.columns.insert(column.id, column.clone());
        self.dirty = true;
        Ok(())
    }

    async fn save_card(&mut self, card: &Card) -> Result<()> {
        self.working.cards.insert(card.id, card.clone());
        self.dirty = true;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let this = *self;
        if !this.dirty {
            tracing::trace!("commit with no staged writes");
            return Ok(());
        }
        this.sink.persist(this.working).await
    }
}
