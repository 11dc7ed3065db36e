use crate::{
    domain::{Card, CardData, CardId, Column, ColumnId},
    error::{Result, TrellisError},
    storage::{Storage, Transaction},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, instrument, warn};

/// The active cards of a column in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnView {
    pub column: Column,
    pub cards: Vec<Card>,
}

impl ColumnView {
    pub fn card_ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|c| c.id).collect()
    }
}

/// Maintains the card order of each column.
///
/// Cards are positioned by naming the card they should follow. Deleting a
/// card removes it from its column's order straight away; reads still
/// reconcile the order against the active cards so that stale ids never
/// surface and unrecorded cards are not lost.
#[derive(Clone)]
pub struct CardOrderer {
    storage: Arc<dyn Storage>,
}

impl CardOrderer {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Creates a card and places it after `target_prev`, or first in the
    /// column when `None`.
    #[instrument(level = "debug", skip(self, data), err)]
    pub async fn create_card(
        &self,
        column_id: &ColumnId,
        data: CardData,
        target_prev: Option<CardId>,
        requester: &str,
    ) -> Result<Card> {
        let mut tx = self.storage.begin().await?;
        let mut column = load_active_column(tx.as_mut(), column_id).await?;
        check_anchor(tx.as_mut(), &column, target_prev).await?;
        repair_order(tx.as_mut(), &mut column).await?;

        let card = Card::new(column.id, data, requester.to_string());
        place(&mut column, target_prev.as_ref(), card.id)?;

        tx.save_card(&card).await?;
        tx.save_column(&column).await?;
        tx.commit().await?;

        debug!(card_id = %card.id, "created card");
        Ok(card)
    }

    /// Moves a card after `target_prev` in `new_column_id`, which may be its
    /// current column.
    ///
    /// The card leaves its source column's order and enters the destination
    /// order in the same commit.
    #[instrument(level = "debug", skip(self), err)]
    pub async fn update_card_position(
        &self,
        card_id: &CardId,
        target_prev: Option<CardId>,
        new_column_id: &ColumnId,
    ) -> Result<Card> {
        let mut tx = self.storage.begin().await?;
        let mut card = load_active_card(tx.as_mut(), card_id).await?;
        let mut destination = load_active_column(tx.as_mut(), new_column_id).await?;

        let mut source = if card.column_id == destination.id {
            None
        } else {
            let source = tx.load_column(&card.column_id).await?;
            if source.board_id != destination.board_id {
                return Err(TrellisError::UnauthorizedColumnAccess {
                    board: source.board_id,
                    column: destination.id,
                });
            }
            Some(source)
        };

        if target_prev == Some(*card_id) {
            if source.is_some() {
                return Err(TrellisError::CardNotInColumn {
                    card: *card_id,
                    column: destination.id,
                });
            }
            debug!("card anchored to itself, leaving it in place");
            return Ok(card);
        }

        check_anchor(tx.as_mut(), &destination, target_prev).await?;
        repair_order(tx.as_mut(), &mut destination).await?;

        if let Some(source) = source.as_mut() {
            source.card_order.remove(card_id);
            tx.save_column(source).await?;
            card.move_to(destination.id);
            tx.save_card(&card).await?;
        }
        place(&mut destination, target_prev.as_ref(), card.id)?;
        tx.save_column(&destination).await?;
        tx.commit().await?;

        debug!(column_id = %destination.id, moved_columns = source.is_some(), "repositioned card");
        Ok(card)
    }

    /// Replaces the content of a card that lives in `column_id`
    #[instrument(level = "debug", skip(self, data), err)]
    pub async fn update_card(
        &self,
        column_id: &ColumnId,
        card_id: &CardId,
        data: CardData,
    ) -> Result<Card> {
        let mut tx = self.storage.begin().await?;
        let mut card = load_card_in(tx.as_mut(), column_id, card_id).await?;

        card.apply(data);
        tx.save_card(&card).await?;
        tx.commit().await?;

        Ok(card)
    }

    /// Fetches an active card that lives in `column_id`
    pub async fn get_card(&self, column_id: &ColumnId, card_id: &CardId) -> Result<Card> {
        let mut tx = self.storage.begin().await?;
        load_card_in(tx.as_mut(), column_id, card_id).await
    }

    /// Soft-deletes a card and drops it from its column's order
    #[instrument(level = "debug", skip(self), err)]
    pub async fn delete_card(&self, card_id: &CardId, requester: &str) -> Result<Card> {
        let mut tx = self.storage.begin().await?;
        let mut card = load_active_card(tx.as_mut(), card_id).await?;
        let mut column = tx.load_column(&card.column_id).await?;

        card.soft_delete(requester.to_string());
        column.card_order.remove(card_id);

        tx.save_card(&card).await?;
        tx.save_column(&column).await?;
        tx.commit().await?;

        debug!("deleted card");
        Ok(card)
    }

    /// Active cards of a column ordered by its card order.
    ///
    /// Ids of deleted or relocated cards are skipped; active cards missing
    /// from the order are listed after the ordered ones, oldest first.
    pub async fn get_column_view(&self, column_id: &ColumnId) -> Result<ColumnView> {
        let mut tx = self.storage.begin().await?;
        let mut column = tx.load_column(column_id).await?;

        let active: Vec<Card> = tx
            .list_cards(column_id)
            .await?
            .into_iter()
            .filter(Card::is_active)
            .collect();
        let dropped = column.card_order.reconcile(active.iter().map(|c| &c.id));
        if dropped > 0 {
            warn!(%column_id, dropped, "card order referenced inactive cards");
        }

        let mut by_id: HashMap<CardId, Card> = active.into_iter().map(|c| (c.id, c)).collect();
        let cards = column
            .card_order
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();

        Ok(ColumnView { column, cards })
    }
}

async fn load_active_column(tx: &mut dyn Transaction, column_id: &ColumnId) -> Result<Column> {
    let column = tx.load_column(column_id).await?;
    if !column.is_active() {
        return Err(TrellisError::column_deleted(*column_id));
    }
    Ok(column)
}

async fn load_active_card(tx: &mut dyn Transaction, card_id: &CardId) -> Result<Card> {
    let card = tx.load_card(card_id).await?;
    if !card.is_active() {
        return Err(TrellisError::CardDeleted(*card_id));
    }
    Ok(card)
}

async fn load_card_in(
    tx: &mut dyn Transaction,
    column_id: &ColumnId,
    card_id: &CardId,
) -> Result<Card> {
    let card = load_active_card(tx, card_id).await?;
    if card.column_id != *column_id {
        return Err(TrellisError::CardNotInColumn {
            card: *card_id,
            column: *column_id,
        });
    }
    Ok(card)
}

/// An anchor must be an active card of the column it is used in
async fn check_anchor(
    tx: &mut dyn Transaction,
    column: &Column,
    target_prev: Option<CardId>,
) -> Result<()> {
    let Some(anchor) = target_prev else {
        return Ok(());
    };
    let card = load_active_card(tx, &anchor).await?;
    if card.column_id != column.id {
        return Err(TrellisError::CardNotInColumn {
            card: anchor,
            column: column.id,
        });
    }
    Ok(())
}

/// Reconciles a column's stored order with its active cards before a write
async fn repair_order(tx: &mut dyn Transaction, column: &mut Column) -> Result<()> {
    let cards = tx.list_cards(&column.id).await?;
    let dropped = column
        .card_order
        .reconcile(cards.iter().filter(|c| c.is_active()).map(|c| &c.id));
    if dropped > 0 {
        warn!(column_id = %column.id, dropped, "repaired card order");
    }
    Ok(())
}

fn place(column: &mut Column, anchor: Option<&CardId>, card_id: CardId) -> Result<()> {
    if column.card_order.insert_after(anchor, card_id) {
        return Ok(());
    }
    Err(TrellisError::CardNotInColumn {
        card: anchor.copied().unwrap_or(card_id),
        column: column.id,
    })
}
