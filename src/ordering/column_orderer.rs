use crate::{
    config::ColumnConfig,
    domain::{BoardId, Column, ColumnId},
    error::{Result, TrellisError},
    ordering::positions,
    storage::{Storage, Transaction},
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Keeps the active columns of each board at positions `0..N-1`.
///
/// Inserting opens a slot by shifting later columns up; moving swaps the
/// mover with whichever column holds the target slot. Soft-deleting closes
/// the gap and restoring reopens it, so the active positions stay dense
/// after every operation. Each operation commits all touched columns in a
/// single transaction.
#[derive(Clone)]
pub struct ColumnOrderer {
    storage: Arc<dyn Storage>,
    config: ColumnConfig,
}

impl ColumnOrderer {
    pub fn new(storage: Arc<dyn Storage>, config: ColumnConfig) -> Self {
        Self { storage, config }
    }

    /// Creates a column at `requested_position`, or at the end when `None`.
    ///
    /// Positions past the end are clamped to the end.
    #[instrument(level = "debug", skip(self), err)]
    pub async fn insert(
        &self,
        board_id: &BoardId,
        title: &str,
        requested_position: Option<usize>,
    ) -> Result<Column> {
        let mut tx = self.storage.begin().await?;
        tx.load_board(board_id).await?;

        let mut columns = tx.list_columns(board_id).await?;
        self.ensure_title_free(board_id, &columns, title)?;

        let slot = positions::insert_slot(requested_position, positions::active_count(&columns));
        let shifted = positions::shift_up_from(&mut columns, slot);
        let column = Column::new(*board_id, title.to_string(), slot);

        save_columns(tx.as_mut(), &columns, &shifted).await?;
        tx.save_column(&column).await?;
        tx.commit().await?;

        debug!(column_id = %column.id, slot, shifted = shifted.len(), "inserted column");
        Ok(column)
    }

    /// Marks a column deleted and closes the gap it leaves
    #[instrument(level = "debug", skip(self), err)]
    pub async fn soft_delete(&self, board_id: &BoardId, column_id: &ColumnId) -> Result<Column> {
        let mut tx = self.storage.begin().await?;
        let column = load_owned(tx.as_mut(), board_id, column_id).await?;
        if !column.is_active() {
            return Err(TrellisError::column_deleted(*column_id));
        }

        let mut columns = tx.list_columns(board_id).await?;
        let idx = index_of(&columns, column_id)?;
        columns[idx].soft_delete();
        let slot = columns[idx].position;
        let shifted = positions::shift_down_after(&mut columns, slot);

        save_columns(tx.as_mut(), &columns, &shifted).await?;
        tx.save_column(&columns[idx]).await?;
        tx.commit().await?;

        debug!(slot, shifted = shifted.len(), "soft-deleted column");
        Ok(columns.swap_remove(idx))
    }

    /// Reactivates a deleted column at the slot it held, clamped to the end
    #[instrument(level = "debug", skip(self), err)]
    pub async fn restore(&self, board_id: &BoardId, column_id: &ColumnId) -> Result<Column> {
        let mut tx = self.storage.begin().await?;
        let column = load_owned(tx.as_mut(), board_id, column_id).await?;
        if column.is_active() {
            return Err(TrellisError::column_active(*column_id));
        }

        let mut columns = tx.list_columns(board_id).await?;
        self.ensure_title_free(board_id, &columns, &column.title)?;

        let idx = index_of(&columns, column_id)?;
        let slot = positions::insert_slot(
            Some(columns[idx].position),
            positions::active_count(&columns),
        );
        let shifted = positions::shift_up_from(&mut columns, slot);
        columns[idx].set_position(slot);
        columns[idx].restore();

        save_columns(tx.as_mut(), &columns, &shifted).await?;
        tx.save_column(&columns[idx]).await?;
        tx.commit().await?;

        debug!(slot, shifted = shifted.len(), "restored column");
        Ok(columns.swap_remove(idx))
    }

    /// Swaps a column with the active column at `new_position`.
    ///
    /// When no column holds `new_position` the board is left unchanged and
    /// the column is returned as it was.
    #[instrument(level = "debug", skip(self), err)]
    pub async fn move_column(
        &self,
        board_id: &BoardId,
        column_id: &ColumnId,
        new_position: usize,
    ) -> Result<Column> {
        let mut tx = self.storage.begin().await?;
        let column = load_owned(tx.as_mut(), board_id, column_id).await?;
        if !column.is_active() {
            return Err(TrellisError::column_deleted(*column_id));
        }

        let mut columns = tx.list_columns(board_id).await?;
        let idx = index_of(&columns, column_id)?;

        match positions::swap_into(&mut columns, *column_id, new_position) {
            Some((mover, displaced)) => {
                save_columns(tx.as_mut(), &columns, &[mover, displaced]).await?;
                tx.commit().await?;
                debug!(%displaced, new_position, "swapped columns");
            }
            None => debug!(new_position, "no column at target position"),
        }

        Ok(columns.swap_remove(idx))
    }

    /// Active columns of a board in position order
    pub async fn list(&self, board_id: &BoardId) -> Result<Vec<Column>> {
        let mut tx = self.storage.begin().await?;
        tx.load_board(board_id).await?;

        let columns = tx.list_columns(board_id).await?;
        Ok(positions::ordered_active(&columns)
            .into_iter()
            .cloned()
            .collect())
    }

    fn ensure_title_free(&self, board_id: &BoardId, columns: &[Column], title: &str) -> Result<()> {
        let taken = columns
            .iter()
            .any(|c| c.is_active() && c.has_title(title, self.config.case_insensitive_titles));
        if taken {
            return Err(TrellisError::DuplicateTitle {
                board: *board_id,
                title: title.to_string(),
            });
        }
        Ok(())
    }
}

/// Loads a column after checking the board exists and owns it
async fn load_owned(
    tx: &mut dyn Transaction,
    board_id: &BoardId,
    column_id: &ColumnId,
) -> Result<Column> {
    tx.load_board(board_id).await?;
    let column = tx.load_column(column_id).await?;
    if column.board_id != *board_id {
        return Err(TrellisError::UnauthorizedColumnAccess {
            board: *board_id,
            column: *column_id,
        });
    }
    Ok(column)
}

fn index_of(columns: &[Column], id: &ColumnId) -> Result<usize> {
    columns
        .iter()
        .position(|c| c.id == *id)
        .ok_or(TrellisError::ColumnNotFound(*id))
}

async fn save_columns(tx: &mut dyn Transaction, columns: &[Column], ids: &[ColumnId]) -> Result<()> {
    for column in columns.iter().filter(|c| ids.contains(&c.id)) {
        tx.save_column(column).await?;
    }
    Ok(())
}
