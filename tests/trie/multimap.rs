//! Integration tests for TrieMultimap
//!
//! Tests multi-valued keys, persistence and collision handling.

use facts::trie::TrieMultimap;
use std::hash::{BuildHasher, Hasher};

/// Sends every key to the same hash.
#[derive(Clone, Default)]
struct Constant;

struct ConstantHasher;

impl Hasher for ConstantHasher {
    fn finish(&self) -> u64 {
        0x5eed
    }

    fn write(&mut self, _: &[u8]) {}
}

impl BuildHasher for Constant {
    type Hasher = ConstantHasher;

    fn build_hasher(&self) -> ConstantHasher {
        ConstantHasher
    }
}

// =============================================================================
// Multi-valued keys
// =============================================================================

#[test]
fn remove_one_association_at_a_time() {
    let m = TrieMultimap::new().insert(1, "x").insert(1, "y");
    assert_eq!(m.len(), 2);
    assert!(m.contains_key(&1));

    let m = m.remove(&1, &"x");
    assert_eq!(m.len(), 1);
    assert!(m.contains_key(&1));

    let m = m.remove(&1, &"y");
    assert_eq!(m.len(), 0);
    assert!(!m.contains_key(&1));
    assert!(m.is_empty());
}

#[test]
fn duplicate_association_is_stored_once() {
    let m = TrieMultimap::new().insert("k", 1).insert("k", 1);
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&"k"), &[1]);
}

#[test]
fn removing_a_missing_association_changes_nothing() {
    let m = TrieMultimap::new().insert(1, 'a');
    assert_eq!(m.remove(&1, &'b'), m);
    assert_eq!(m.remove(&2, &'a'), m);
    assert_eq!(m.remove_key(&3).len(), 1);
}

#[test]
fn replace_collapses_to_one_value() {
    let m = TrieMultimap::new().insert(1, 'a').insert(1, 'b').replace(1, 'c');
    assert_eq!(m.get(&1), &['c']);
    assert_eq!(m.len(), 1);
    assert_eq!(m.key_count(), 1);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn every_version_stays_valid() {
    let mut versions = vec![TrieMultimap::new()];
    for n in 0..200_u32 {
        let next = versions[versions.len() - 1].insert(n % 50, n);
        versions.push(next);
    }
    for (count, version) in versions.iter().enumerate() {
        assert_eq!(version.len(), count);
        assert_eq!(version.key_count(), count.min(50));
    }
}

#[test]
fn equality_ignores_build_order() {
    let a: TrieMultimap<u32, u32> = (0..500).map(|n| (n % 7, n)).collect();
    let b: TrieMultimap<u32, u32> = (0..500).rev().map(|n| (n % 7, n)).collect();
    assert_eq!(a, b);
    assert_ne!(a, b.remove(&3, &3));
}

#[test]
fn iteration_visits_every_association() {
    let m: TrieMultimap<u32, u32> = (0..1000).map(|n| (n / 10, n)).collect();
    let mut values: Vec<u32> = m.iter().map(|(_, v)| *v).collect();
    values.sort_unstable();
    assert_eq!(values, (0..1000).collect::<Vec<_>>());
    assert_eq!(m.keys().count(), 100);
    assert!(m.iter().all(|(k, v)| *k == v / 10));
}

// =============================================================================
// Collisions
// =============================================================================

#[test]
fn colliding_keys_stay_distinct() {
    let m = (0..40).fold(TrieMultimap::with_hasher(Constant), |m, n| {
        m.insert(n, n * 2)
    });
    assert_eq!(m.key_count(), 40);
    for n in 0..40 {
        assert_eq!(m.get(&n), &[n * 2]);
    }

    let m = (0..39).fold(m, |m, n| m.remove(&n, &(n * 2)));
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&39), &[78]);
    assert!(m.get(&0).is_empty());
}

#[test]
fn colliding_maps_compare_by_content() {
    let a = (0..10).fold(TrieMultimap::with_hasher(Constant), |m, n| m.insert(n, ()));
    let b = (0..10)
        .rev()
        .fold(TrieMultimap::with_hasher(Constant), |m, n| m.insert(n, ()));
    assert_eq!(a, b);
}
