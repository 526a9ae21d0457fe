use cohash::ConcurrentTable;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

// Test: end-to-end walkthrough of the basic operations.
// Verifies: len/get after sets, delete, then clear empties everything.
#[test]
fn set_get_delete_clear_walkthrough() {
    let t: ConcurrentTable<String, i32> = ConcurrentTable::new();
    t.set("a".to_string(), 1);
    t.set("b".to_string(), 2);
    t.set("c".to_string(), 3);
    assert_eq!(t.len(), 3);
    assert_eq!(t.get_or_default("b"), (2, true));

    t.delete("b");
    assert_eq!(t.len(), 2);
    assert_eq!(t.get_or_default("b"), (0, false));

    t.clear();
    assert_eq!(t.len(), 0);
    assert_eq!(t.keys(), Vec::<String>::new());
}

// Test: keys() matches len() and every key is live at that instant.
#[test]
fn keys_are_present_and_complete() {
    let t: ConcurrentTable<String, i32> = ConcurrentTable::new();
    for (i, k) in ["a", "b", "c"].iter().enumerate() {
        t.set((*k).to_string(), i as i32);
    }
    let keys = t.keys();
    assert_eq!(keys.len(), t.len());
    for k in &keys {
        assert!(t.get(k).is_some());
    }
}

// Test: every value in values() belongs to some key.
#[test]
fn values_belong_to_keys() {
    let t: ConcurrentTable<String, i32> = ConcurrentTable::new();
    t.set("a".to_string(), 1);
    t.set("b".to_string(), 2);
    t.set("c".to_string(), 3);
    let values = t.values();
    assert_eq!(values.len(), 3);
    let by_key: BTreeSet<i32> = t.keys().iter().filter_map(|k| t.get(k)).collect();
    for v in values {
        assert!(by_key.contains(&v), "value {v} has no key");
    }
}

// Test: for_each observes exactly the pairs of keys() + get().
#[test]
fn for_each_matches_keys_and_get() {
    let t: ConcurrentTable<u32, String> = (0..20).map(|i| (i, format!("v{i}"))).collect();
    let mut visited = BTreeMap::new();
    t.for_each(|k, v| {
        let prev = visited.insert(*k, v.clone());
        assert!(prev.is_none(), "key {k} visited twice");
    });
    let expected: BTreeMap<u32, String> = t
        .keys()
        .into_iter()
        .map(|k| {
            let v = t.get(&k).expect("key from snapshot is live");
            (k, v)
        })
        .collect();
    assert_eq!(visited, expected);
    let entries: BTreeMap<u32, String> = t.entries().into_iter().collect();
    assert_eq!(entries, expected);
}

// Test: N threads writing N distinct keys lose no updates.
#[test]
fn concurrent_distinct_sets_are_all_kept() {
    const THREADS: u32 = 8;
    const PER_THREAD: u32 = 500;
    let t: ConcurrentTable<u32, u32> = ConcurrentTable::new();
    thread::scope(|s| {
        for tid in 0..THREADS {
            let t = &t;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    let k = tid * PER_THREAD + i;
                    t.set(k, k * 2);
                }
            });
        }
    });
    assert_eq!(t.len(), (THREADS * PER_THREAD) as usize);
    for k in 0..THREADS * PER_THREAD {
        assert_eq!(t.get(&k), Some(k * 2));
    }
}

// Test: readers racing a writer only see whole writes.
// Each batch writes key i and its mirror 1000+i atomically via set_many,
// so any snapshot must contain both or neither, with matching values.
#[test]
fn readers_never_observe_partial_batches() {
    let t: Arc<ConcurrentTable<u32, u32>> = Arc::new(ConcurrentTable::new());
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let t = Arc::clone(&t);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let snap: BTreeMap<u32, u32> = t.entries().into_iter().collect();
                    assert_eq!(snap.len() % 2, 0, "odd entry count {}", snap.len());
                    for (&k, &v) in snap.range(..1000) {
                        assert_eq!(snap.get(&(1000 + k)), Some(&v));
                    }
                    assert_eq!(t.len() % 2, 0);
                }
            })
        })
        .collect();

    for round in 0..200u32 {
        let i = round % 50;
        t.set_many([(i, round), (1000 + i, round)]);
    }
    done.store(true, Ordering::Release);
    for r in readers {
        r.join().expect("reader panicked");
    }
    assert_eq!(t.len(), 100);
}

// Test: concurrent readers run alongside each other and alongside
// visitors without blocking forever.
#[test]
fn shared_readers_proceed_together() {
    let t: ConcurrentTable<u32, u32> = (0..100).map(|i| (i, i)).collect();
    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let mut sum = 0u64;
                t.for_each(|_, v| sum += u64::from(*v));
                assert_eq!(sum, (0..100u64).sum::<u64>());
                assert_eq!(t.keys().len(), 100);
            });
        }
    });
}

// Test: clear under contention always leaves a consistent table.
#[test]
fn clear_races_with_writers() {
    let t: ConcurrentTable<u32, u32> = ConcurrentTable::new();
    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..1000 {
                t.set(i, i);
            }
        });
        s.spawn(|| {
            for _ in 0..50 {
                t.clear();
            }
        });
    });
    let keys = t.keys();
    assert_eq!(keys.len(), t.len());
    for k in keys {
        assert_eq!(t.get(&k), Some(k));
    }
}

// Test: a panicking visitor does not poison the table.
#[test]
fn panic_in_visitor_leaves_table_usable() {
    let t: ConcurrentTable<u32, u32> = (0..3).map(|i| (i, i)).collect();
    let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        t.for_each(|_, _| panic!("visitor failed"));
    }));
    assert!(res.is_err());
    t.set(9, 9);
    assert_eq!(t.len(), 4);
}
