//! cohash: a concurrency-safe hash table guarded by a single
//! reader-writer lock, plus a linear-scan list map as a baseline.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: the smallest correct shared key/value table. Each operation is
//!   one lock acquisition, so each is linearizable on its own.
//! - Layers:
//!   - ConcurrentTable<K, V, S>: a `hashbrown::HashMap` behind one
//!     `parking_lot::RwLock`. Reads (get, len, keys, values, entries,
//!     for_each) take the shared lock; writes (set, delete, clear, ...)
//!     take the exclusive lock.
//!   - ListMap<K, V>: unsynchronized `Vec<(K, V)>` with O(n) scans. No
//!     hashing at all; used as a contrast and in the property tests.
//!
//! Constraints
//! - Coarse lock: no sharding, no lock-free paths, no eviction.
//! - Waiting for the lock parks the thread. No timeouts, no cancellation,
//!   no fairness beyond what `parking_lot` provides.
//! - The lock never poisons; a panicking visitor leaves the table usable.
//! - Bulk accessors (`keys`, `values`, `entries`) return owned
//!   point-in-time copies, never live views.
//!
//! Reentrancy policy
//! - `for_each` and `update` run caller code while holding the lock. That
//!   code must not call back into the same table: the lock is not
//!   reentrant. Debug builds track running visitors per thread and panic
//!   on a nested call; release builds pay nothing and may deadlock.
//! - Calling into a *different* table from a visitor is fine.
//!
//! Notes and non-goals
//! - No real hash design or collision handling of our own; that is the
//!   underlying map's job.
//! - No persistence and no serialization format.
//! - Keys and values handed out by `get`/`keys`/`values` are clones.

mod list_map;
mod reentrancy;
mod table;

// Public surface
pub use list_map::ListMap;
pub use table::{ConcurrentTable, InsertError};
