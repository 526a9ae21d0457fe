//! Debug-only reentrancy guard for table visitors.
//!
//! `ConcurrentTable::for_each` runs user code while holding the shared
//! lock. A visitor that calls back into the same table would deadlock (or
//! silently nest read locks, depending on writer pressure). In debug builds
//! each table records, per thread, whether a visitor is currently running
//! on it, and every entry-point panics on a nested call instead of hanging.
//! In release builds this compiles to a zero-cost no-op.

#[cfg(debug_assertions)]
use std::cell::RefCell;
#[cfg(debug_assertions)]
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(debug_assertions)]
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[cfg(debug_assertions)]
thread_local! {
    // Ids of tables whose visitor is running on this thread, innermost last.
    static VISITING: RefCell<Vec<u64>> = const { RefCell::new(Vec::new()) };
}

/// Per-instance reentrancy tracker. Embed this in a table and call
/// `check()` at the start of every public entry-point; wrap visitor
/// execution in `visit()`.
#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    id: u64,
}

impl DebugReentrancy {
    pub(crate) fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Panics in debug builds if a visitor for this instance is running
    /// on the current thread.
    #[inline]
    pub(crate) fn check(&self) {
        #[cfg(debug_assertions)]
        {
            let nested = VISITING.with(|v| v.borrow().contains(&self.id));
            assert!(
                !nested,
                "reentrancy detected: table accessed from inside its own visitor"
            );
        }
    }

    /// Marks a visitor as running on the current thread until the returned
    /// guard is dropped.
    #[inline]
    pub(crate) fn visit(&self) -> VisitGuard<'_> {
        self.check();
        #[cfg(debug_assertions)]
        VISITING.with(|v| v.borrow_mut().push(self.id));
        VisitGuard { owner: self }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugReentrancy::visit`.
pub(crate) struct VisitGuard<'a> {
    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    owner: &'a DebugReentrancy,
}

impl Drop for VisitGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        VISITING.with(|v| {
            // Guards of distinct tables may drop in any order.
            let mut v = v.borrow_mut();
            if let Some(i) = v.iter().rposition(|&id| id == self.owner.id) {
                v.remove(i);
            }
        });
    }
}
