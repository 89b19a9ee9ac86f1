//! Insertion-ordered entity table.
//!
//! Lookups go through a hash map; iteration follows insertion order so that
//! "first match" queries and exports are deterministic.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Clone, Debug)]
pub(crate) struct Table<K, V> {
    rows: HashMap<K, V>,
    order: Vec<K>,
}

impl<K: Clone + Eq + Hash, V> Table<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Insert or replace; a replaced row keeps its position.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let prev = self.rows.insert(key.clone(), value);
        if prev.is_none() {
            self.order.push(key);
        }
        prev
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.rows.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    #[inline]
    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.rows.get(key)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.rows.get_mut(key)
    }

    #[inline]
    pub(crate) fn contains(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.order.iter().filter_map(|k| self.rows.get(k))
    }

    /// Mutable access to every row (hash order; callers must not depend on it).
    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.rows.values_mut()
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
        self.order.clear();
    }
}

impl<K: Clone + Eq + Hash, V> Default for Table<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
