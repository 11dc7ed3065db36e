//! Dense position arithmetic for the columns of a board.
//!
//! These functions work on the column set of a single board in memory and
//! report which columns they touched, so the caller can stage exactly
//! those records in one transaction. Only active columns take part in the
//! ordering; deleted columns are left alone.

use crate::domain::{Column, ColumnId};

/// Resolves the slot a new column goes into: `None` appends, anything past
/// the end is clamped to the end.
pub fn insert_slot(requested: Option<usize>, active_count: usize) -> usize {
    requested.map_or(active_count, |p| p.min(active_count))
}

pub fn active_count(columns: &[Column]) -> usize {
    columns.iter().filter(|c| c.is_active()).count()
}

/// Opens `slot` by moving every active column at or after it up by one.
pub fn shift_up_from(columns: &mut [Column], slot: usize) -> Vec<ColumnId> {
    let mut touched = Vec::new();
    for column in columns.iter_mut().filter(|c| c.is_active()) {
        if column.position >= slot {
            column.set_position(column.position + 1);
            touched.push(column.id);
        }
    }
    touched
}

/// Closes the gap left at `slot` by moving every active column after it
/// down by one.
pub fn shift_down_after(columns: &mut [Column], slot: usize) -> Vec<ColumnId> {
    let mut touched = Vec::new();
    for column in columns.iter_mut().filter(|c| c.is_active()) {
        if column.position > slot {
            column.set_position(column.position - 1);
            touched.push(column.id);
        }
    }
    touched
}

/// Exchanges the position of `mover` with the active column currently at
/// `target`.
///
/// Returns the ids of both columns when a swap happened, or `None` when
/// nothing occupies `target` (or `mover` already sits there).
pub fn swap_into(
    columns: &mut [Column],
    mover: ColumnId,
    target: usize,
) -> Option<(ColumnId, ColumnId)> {
    let mover_idx = columns.iter().position(|c| c.id == mover)?;
    let displaced_idx = columns
        .iter()
        .position(|c| c.is_active() && c.position == target && c.id != mover)?;

    let from = columns[mover_idx].position;
    columns[mover_idx].set_position(target);
    columns[displaced_idx].set_position(from);

    Some((columns[mover_idx].id, columns[displaced_idx].id))
}

/// Active columns ordered by position
pub fn ordered_active(columns: &[Column]) -> Vec<&Column> {
    let mut active: Vec<&Column> = columns.iter().filter(|c| c.is_active()).collect();
    active.sort_by_key(|c| c.position);
    active
}

/// Checks that active positions are exactly `0..count`
pub fn is_dense(columns: &[Column]) -> bool {
    ordered_active(columns)
        .iter()
        .enumerate()
        .all(|(rank, c)| c.position == rank)
}
