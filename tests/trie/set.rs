//! Integration tests for TrieSet
//!
//! Tests membership and set algebra.

use facts::trie::TrieSet;

fn set(values: impl IntoIterator<Item = u32>) -> TrieSet<u32> {
    values.into_iter().collect()
}

#[test]
fn insert_and_remove() {
    let s = set([1, 2, 3]).insert(2).insert(4);
    assert_eq!(s.len(), 4);
    assert!(s.contains(&4));
    let s = s.remove(&1);
    assert!(!s.contains(&1));
    assert_eq!(s.len(), 3);
}

#[test]
fn algebra_on_large_sets() {
    let evens = set((0..2000).step_by(2));
    let thirds = set((0..2000).step_by(3));

    assert_eq!(evens.union(&thirds).len(), 1000 + 667 - 334);
    assert_eq!(evens.intersection(&thirds), set((0..2000).step_by(6)));
    assert_eq!(
        evens.difference(&thirds).len(),
        evens.len() - evens.intersection(&thirds).len()
    );
    assert!(set((0..2000).step_by(6)).is_subset(&evens));
    assert!(!thirds.is_subset(&evens));
}

#[test]
fn empty_set_identities() {
    let s = set(0..10);
    let empty = TrieSet::new();
    assert_eq!(s.union(&empty), s);
    assert!(s.intersection(&empty).is_empty());
    assert_eq!(s.difference(&empty), s);
    assert!(empty.is_subset(&s));
}
