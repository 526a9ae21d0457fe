//! ConcurrentTable: a key/value table behind one coarse reader-writer lock.

use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::collections::hash_map::RandomState;

/// Returned by [`ConcurrentTable::try_insert`] when the key is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    DuplicateKey,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey => f.write_str("key already present in table"),
        }
    }
}

impl std::error::Error for InsertError {}

/// A concurrency-safe hash table.
///
/// Every read runs under the shared lock and every write under the
/// exclusive lock, so each operation takes effect atomically. Share it
/// across threads by reference (scoped threads) or through an `Arc`.
///
/// ```
/// use cohash::ConcurrentTable;
///
/// let t: ConcurrentTable<String, i32> = ConcurrentTable::new();
/// t.set("a".to_string(), 1);
/// assert_eq!(t.get("a"), Some(1));
/// t.delete("a");
/// assert_eq!(t.get("a"), None);
/// ```
pub struct ConcurrentTable<K, V, S = RandomState> {
    map: RwLock<HashMap<K, V, S>>,
    reentrancy: DebugReentrancy,
}

impl<K, V> ConcurrentTable<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V> Default for ConcurrentTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ConcurrentTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            map: RwLock::new(HashMap::with_hasher(hasher)),
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// `capacity` is a pre-allocation hint; growth past it is handled by
    /// the underlying map.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            map: RwLock::new(HashMap::with_capacity_and_hasher(capacity, hasher)),
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Insert or overwrite the entry for `key`.
    pub fn set(&self, key: K, value: V) {
        self.reentrancy.check();
        self.map.write().insert(key, value);
    }

    /// Like `set`, but hands back the value that was replaced.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.reentrancy.check();
        self.map.write().insert(key, value)
    }

    /// Insert only if `key` is absent; otherwise the table is left untouched.
    pub fn try_insert(&self, key: K, value: V) -> Result<(), InsertError> {
        self.reentrancy.check();
        let mut map = self.map.write();
        if map.contains_key(&key) {
            return Err(InsertError::DuplicateKey);
        }
        map.insert(key, value);
        Ok(())
    }

    /// Insert a batch of entries under a single exclusive acquisition.
    pub fn set_many<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.reentrancy.check();
        let mut map = self.map.write();
        map.extend(entries);
    }

    /// Current value for `key`, or `None` when absent.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.reentrancy.check();
        self.map.read().get(key).cloned()
    }

    /// `(value, found)`: absent keys read back as `V::default()` with
    /// `found == false`.
    pub fn get_or_default<Q>(&self, key: &Q) -> (V, bool)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone + Default,
    {
        match self.get(key) {
            Some(v) => (v, true),
            None => (V::default(), false),
        }
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.reentrancy.check();
        self.map.read().contains_key(key)
    }

    /// Apply `f` to the value for `key` in place under the exclusive lock.
    /// Returns whether the key was present. `f` must not touch this table.
    pub fn update<Q, F>(&self, key: &Q, f: F) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V),
    {
        let _visiting = self.reentrancy.visit();
        match self.map.write().get_mut(key) {
            Some(v) => {
                f(v);
                true
            }
            None => false,
        }
    }

    /// Remove the entry for `key`. Absent keys are a no-op.
    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.reentrancy.check();
        self.map.write().remove(key);
    }

    /// Drop every entry and release the storage.
    pub fn clear(&self) {
        self.reentrancy.check();
        let mut map = self.map.write();
        map.clear();
        map.shrink_to_fit();
    }

    /// Like `delete`, but hands back the removed value.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.reentrancy.check();
        self.map.write().remove(key)
    }
}

impl<K, V, S> ConcurrentTable<K, V, S> {
    pub fn len(&self) -> usize {
        self.reentrancy.check();
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reentrancy.check();
        self.map.read().is_empty()
    }

    /// Point-in-time copy of all keys. Order is unspecified.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.reentrancy.check();
        self.map.read().keys().cloned().collect()
    }

    /// Point-in-time copy of all values. Taken under its own lock
    /// acquisition, so it need not line up with a separate `keys()` call;
    /// use `entries()` for a paired snapshot.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.reentrancy.check();
        self.map.read().values().cloned().collect()
    }

    /// Point-in-time copy of all `(key, value)` pairs.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.reentrancy.check();
        self.map
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Call `visit` once per entry while holding the shared lock for the
    /// whole traversal. Writers are blocked until it returns.
    ///
    /// `visit` must not call back into this table. Debug builds panic on
    /// such a call; release builds may deadlock.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        let _visiting = self.reentrancy.visit();
        let map = self.map.read();
        for (k, v) in map.iter() {
            visit(k, v);
        }
    }
}

impl<K, V, S> fmt::Debug for ConcurrentTable<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reentrancy.check();
        f.debug_map().entries(self.map.read().iter()).finish()
    }
}

impl<K, V, S> FromIterator<(K, V)> for ConcurrentTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::with_hasher(S::default());
        table.map.get_mut().extend(iter);
        table
    }
}

impl<K, V, S> Extend<(K, V)> for ConcurrentTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        // Exclusive borrow; no lock traffic needed.
        self.map.get_mut().extend(iter);
    }
}
