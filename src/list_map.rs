//! ListMap: an unsynchronized map stored as a flat list of pairs.
//!
//! Every lookup is a linear scan comparing keys with `PartialEq`, so all
//! operations are O(n). It exists as the simple baseline that
//! `ConcurrentTable` is measured and reasoned against. Mutation needs
//! `&mut self`; share it across threads only behind your own lock.

use core::fmt;

pub struct ListMap<K, V> {
    pairs: Vec<(K, V)>,
}

impl<K, V> ListMap<K, V>
where
    K: PartialEq,
{
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    fn find(&self, key: &K) -> Option<usize> {
        self.pairs.iter().position(|(k, _)| k == key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|i| &self.pairs[i].1)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.find(key)?;
        Some(&mut self.pairs[i].1)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Overwrite in place when `key` exists, otherwise append.
    pub fn set(&mut self, key: K, value: V) {
        match self.find(&key) {
            Some(i) => self.pairs[i].1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Remove `key` if present, keeping the order of the remaining pairs.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let i = self.find(key)?;
        Some(self.pairs.remove(i).1)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<&K> {
        self.pairs.iter().map(|(k, _)| k).collect()
    }

    /// Values in insertion order.
    pub fn values(&self) -> Vec<&V> {
        self.pairs.iter().map(|(_, v)| v).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.pairs.iter().map(|(k, v)| (k, v))
    }
}

impl<K: PartialEq, V> Default for ListMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for ListMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::new();
        for (k, v) in iter {
            m.set(k, v);
        }
        m
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ListMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.pairs.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}
