//! Persisted per-category rotation positions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::Item;

/// Rotation position for each category.
///
/// Stored positions may be stale when a pool grew or shrank since the last
/// run; they are always reduced modulo the current pool length before use.
/// Categories absent from the map start at 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryIndex {
    positions: BTreeMap<String, usize>,
}

/// Result of one `select_next` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub item: &'a Item,
    /// Offset into the pool the item was taken from
    pub position: usize,
    /// No candidate cleared the filter; the item at the start position was reused
    pub forced_repeat: bool,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positions(positions: BTreeMap<String, usize>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &BTreeMap<String, usize> {
        &self.positions
    }

    /// Current position normalized to a pool of `pool_len` items.
    pub fn peek(&self, category: &str, pool_len: usize) -> usize {
        if pool_len == 0 {
            return 0;
        }
        self.positions.get(category).copied().unwrap_or(0) % pool_len
    }

    /// Move one step forward, wrapping at the pool end.
    pub fn advance(&mut self, category: &str, pool_len: usize) {
        if pool_len == 0 {
            return;
        }
        let next = (self.peek(category, pool_len) + 1) % pool_len;
        self.positions.insert(category.to_string(), next);
    }

    /// Take the next item from `pool` that `is_forbidden` does not reject.
    ///
    /// Probes at most `pool.len()` items starting at the current position.
    /// The stored position moves to just after the chosen item. When every
    /// item is forbidden the item at the starting position is returned as a
    /// forced repeat and the position moves one step, so a tiny pool never
    /// blocks the run.
    ///
    /// Returns `None` only when the pool is empty.
    pub fn select_next<'a, F>(
        &mut self,
        category: &str,
        pool: &'a [Item],
        is_forbidden: F,
    ) -> Option<Selection<'a>>
    where
        F: Fn(&Item) -> bool,
    {
        let len = pool.len();
        if len == 0 {
            return None;
        }

        let start = self.peek(category, len);
        let found = (0..len).map(|k| (start + k) % len).find(|&pos| !is_forbidden(&pool[pos]));

        let (position, forced_repeat) = match found {
            Some(pos) => (pos, false),
            None => (start, true),
        };

        self.positions.insert(category.to_string(), (position + 1) % len);

        Some(Selection {
            item: &pool[position],
            position,
            forced_repeat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(names: &[&str]) -> Vec<Item> {
        names.iter().map(|n| Item::new(*n, ["A"])).collect()
    }

    #[test]
    fn test_peek_defaults_to_zero() {
        let index = CategoryIndex::new();
        assert_eq!(index.peek("A", 3), 0);
        assert_eq!(index.peek("A", 0), 0);
    }

    #[test]
    fn test_peek_normalizes_stale_position() {
        let index = CategoryIndex::from_positions([("A".to_string(), 7)].into_iter().collect());
        assert_eq!(index.peek("A", 3), 1);
        assert_eq!(index.peek("A", 7), 0);
    }

    #[test]
    fn test_advance_wraps() {
        let mut index = CategoryIndex::new();
        index.advance("A", 2);
        assert_eq!(index.peek("A", 2), 1);
        index.advance("A", 2);
        assert_eq!(index.peek("A", 2), 0);
    }

    #[test]
    fn test_select_next_round_robin_visits_each_once() {
        let items = pool(&["x", "y", "z"]);
        let mut index = CategoryIndex::from_positions([("A".to_string(), 1)].into_iter().collect());

        let picked: Vec<&str> = (0..3)
            .map(|_| index.select_next("A", &items, |_| false).unwrap().item.name.as_str())
            .collect();

        assert_eq!(picked, vec!["y", "z", "x"]);
        assert_eq!(index.peek("A", 3), 1);
    }

    #[test]
    fn test_select_next_skips_forbidden() {
        let items = pool(&["x", "y", "z"]);
        let mut index = CategoryIndex::new();

        let sel = index.select_next("A", &items, |i| i.name == "x" || i.name == "y").unwrap();
        assert_eq!(sel.item.name, "z");
        assert_eq!(sel.position, 2);
        assert!(!sel.forced_repeat);
        assert_eq!(index.peek("A", 3), 0);
    }

    #[test]
    fn test_select_next_forced_repeat_when_all_forbidden() {
        let items = pool(&["x", "y"]);
        let mut index = CategoryIndex::from_positions([("A".to_string(), 1)].into_iter().collect());

        let sel = index.select_next("A", &items, |_| true).unwrap();
        assert_eq!(sel.item.name, "y");
        assert!(sel.forced_repeat);
        assert_eq!(index.peek("A", 2), 0);
    }

    #[test]
    fn test_select_next_single_item_pool() {
        let items = pool(&["only"]);
        let mut index = CategoryIndex::new();
        for _ in 0..5 {
            let sel = index.select_next("A", &items, |i| i.name == "only").unwrap();
            assert_eq!(sel.item.name, "only");
            assert!(sel.forced_repeat);
        }
    }

    #[test]
    fn test_select_next_empty_pool() {
        let mut index = CategoryIndex::new();
        assert!(index.select_next("A", &[], |_| false).is_none());
        assert!(index.positions().is_empty());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut index = CategoryIndex::new();
        index.advance("fish", 3);
        assert_eq!(serde_json::to_string(&index).unwrap(), r#"{"fish":1}"#);
    }
}
