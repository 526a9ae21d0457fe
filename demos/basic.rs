//! Walks a `ConcurrentTable` through set, get, delete and iterate, and
//! contrasts it with `ListMap`.
//!
//! Run with `cargo run --example basic`.

use cohash::{ConcurrentTable, ListMap};
use std::sync::Arc;
use std::thread;

fn main() {
    let table: Arc<ConcurrentTable<String, i32>> = Arc::new(ConcurrentTable::new());

    table.set("a".to_string(), 1);
    table.set("b".to_string(), 2);
    table.set("c".to_string(), 3);

    let (v, found) = table.get_or_default("b");
    println!("b = {v} (found: {found})");

    table.delete("b");
    println!("after delete: len = {}", table.len());

    // Two writer threads share the same table.
    let handles: Vec<_> = ["x", "y"]
        .into_iter()
        .enumerate()
        .map(|(i, k)| {
            let table = Arc::clone(&table);
            thread::spawn(move || table.set(k.to_string(), 10 * (i as i32 + 1)))
        })
        .collect();
    for h in handles {
        if h.join().is_err() {
            eprintln!("writer thread panicked");
        }
    }

    let mut entries = table.entries();
    entries.sort();
    for (k, v) in &entries {
        println!("{k} {v}");
    }
    table.for_each(|k, v| println!("visited {k} -> {v}"));

    let mut list = ListMap::new();
    list.set("key1", "value1");
    println!("{list:?}");
    println!("Number of key-value pairs: {}", list.len());
    println!("Keys: {:?}", list.keys());
    println!("Values: {:?}", list.values());
    list.delete(&"key1");
    println!("{list:?}");
}
