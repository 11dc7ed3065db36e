//! The ordered sequence of card ids a column owns.
//!
//! `CardOrder` is the authoritative order of cards within a column. Cards
//! are placed relative to a previous sibling ("insert after X") rather than
//! by integer slot, so a move only touches the sequences it leaves and
//! enters.

use crate::domain::CardId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardOrder(Vec<CardId>);

impl CardOrder {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.0.contains(id)
    }

    pub fn position_of(&self, id: &CardId) -> Option<usize> {
        self.0.iter().position(|c| c == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardId> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[CardId] {
        &self.0
    }

    /// Places `id` at the front of the sequence
    pub fn insert_at_head(&mut self, id: CardId) {
        self.remove(&id);
        self.0.insert(0, id);
    }

    /// Places `id` immediately after `anchor`, or at the head when `anchor`
    /// is `None`.
    ///
    /// Returns `false` without modifying the sequence when the anchor is not
    /// present. An id is never stored twice: any earlier occurrence of `id`
    /// is removed first.
    pub fn insert_after(&mut self, anchor: Option<&CardId>, id: CardId) -> bool {
        let Some(anchor) = anchor else {
            self.insert_at_head(id);
            return true;
        };
        if *anchor == id {
            return self.contains(&id);
        }
        if !self.contains(anchor) {
            return false;
        }

        self.remove(&id);
        match self.position_of(anchor) {
            Some(idx) => {
                self.0.insert(idx + 1, id);
                true
            }
            None => false,
        }
    }

    /// Removes `id`, returning whether it was present
    pub fn remove(&mut self, id: &CardId) -> bool {
        let before = self.0.len();
        self.0.retain(|c| c != id);
        self.0.len() != before
    }

    /// Read repair against the set of active card ids.
    ///
    /// Drops ids not in `active` (stale or duplicated entries) and appends
    /// active ids the sequence does not mention, in the order given. Returns
    /// the number of stale entries that were dropped.
    pub fn reconcile<'a, I>(&mut self, active: I) -> usize
    where
        I: IntoIterator<Item = &'a CardId>,
    {
        let active: Vec<CardId> = active.into_iter().copied().collect();
        let wanted: HashSet<CardId> = active.iter().copied().collect();
        let mut seen = HashSet::with_capacity(wanted.len());

        let before = self.0.len();
        self.0.retain(|id| wanted.contains(id) && seen.insert(*id));
        let dropped = before - self.0.len();

        for id in active {
            if seen.insert(id) {
                self.0.push(id);
            }
        }
        dropped
    }
}

impl From<Vec<CardId>> for CardOrder {
    fn from(ids: Vec<CardId>) -> Self {
        Self(ids)
    }
}

impl<'a> IntoIterator for &'a CardOrder {
    type Item = &'a CardId;
    type IntoIter = std::slice::Iter<'a, CardId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<CardId> {
        (0..n).map(|_| CardId::new()).collect()
    }

    #[test]
    fn test_insert_at_head_when_no_anchor() {
        let c = ids(2);
        let mut order = CardOrder::new();

        assert!(order.insert_after(None, c[0]));
        assert!(order.insert_after(None, c[1]));

        assert_eq!(order.as_slice(), &[c[1], c[0]]);
    }

    #[test]
    fn test_insert_after_anchor() {
        let c = ids(4);
        let mut order = CardOrder::from(vec![c[0], c[1], c[2]]);

        assert!(order.insert_after(Some(&c[0]), c[3]));
        assert_eq!(order.as_slice(), &[c[0], c[3], c[1], c[2]]);

        // Tail insertion
        let mut order = CardOrder::from(vec![c[0], c[1]]);
        assert!(order.insert_after(Some(&c[1]), c[2]));
        assert_eq!(order.as_slice(), &[c[0], c[1], c[2]]);
    }

    #[test]
    fn test_insert_after_missing_anchor_is_rejected() {
        let c = ids(3);
        let mut order = CardOrder::from(vec![c[0]]);

        assert!(!order.insert_after(Some(&c[1]), c[2]));
        assert_eq!(order.as_slice(), &[c[0]]);
    }

    #[test]
    fn test_insert_after_moves_existing_id() {
        let c = ids(3);
        let mut order = CardOrder::from(vec![c[0], c[1], c[2]]);

        assert!(order.insert_after(Some(&c[2]), c[0]));
        assert_eq!(order.as_slice(), &[c[1], c[2], c[0]]);
    }

    #[test]
    fn test_insert_after_itself_keeps_place() {
        let c = ids(3);
        let mut order = CardOrder::from(vec![c[0], c[1], c[2]]);

        assert!(order.insert_after(Some(&c[1]), c[1]));
        assert_eq!(order.as_slice(), &[c[0], c[1], c[2]]);
    }

    #[test]
    fn test_remove() {
        let c = ids(2);
        let mut order = CardOrder::from(vec![c[0], c[1]]);

        assert!(order.remove(&c[0]));
        assert!(!order.remove(&c[0]));
        assert_eq!(order.as_slice(), &[c[1]]);
    }

    #[test]
    fn test_reconcile_drops_stale_and_appends_orphans() {
        let c = ids(4);
        let mut order = CardOrder::from(vec![c[2], c[0], c[1], c[0]]);

        // c1 was deleted, c3 was never recorded
        let dropped = order.reconcile(&[c[0], c[2], c[3]]);

        assert_eq!(dropped, 2);
        assert_eq!(order.as_slice(), &[c[2], c[0], c[3]]);
    }
}
