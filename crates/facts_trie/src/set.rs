//! Membership-only view of the trie.

use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::multimap::{DefaultState, TrieMultimap};

/// Persistent hash set: a [`TrieMultimap`] whose keys carry no values.
pub struct TrieSet<T, S = DefaultState>(TrieMultimap<T, (), S>);

impl<T, S: Clone> Clone for TrieSet<T, S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> TrieSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self(TrieMultimap::new())
    }
}

impl<T, S> TrieSet<T, S> {
    /// Creates an empty set hashing elements with `hasher`.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self(TrieMultimap::with_hasher(hasher))
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.key_count()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the elements in hash order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.keys()
    }
}

impl<T, S> TrieSet<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Clone,
{
    /// Returns true if the set contains `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.0.contains_key(value)
    }

    /// Returns a new set with `value` inserted.
    #[must_use]
    pub fn insert(&self, value: T) -> Self {
        Self(self.0.insert(value, ()))
    }

    /// Returns a new set without `value`.
    #[must_use]
    pub fn remove(&self, value: &T) -> Self {
        Self(self.0.remove_key(value))
    }

    /// Returns the union of two sets.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let (larger, smaller) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        smaller
            .iter()
            .fold(larger.clone(), |set, value| set.insert(value.clone()))
    }

    /// Returns the elements present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let (larger, smaller) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        smaller
            .iter()
            .filter(|value| !larger.contains(value))
            .fold(smaller.clone(), |set, value| set.remove(value))
    }

    /// Returns the elements of `self` not present in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        if self.len() <= other.len() {
            self.iter()
                .filter(|value| other.contains(value))
                .fold(self.clone(), |set, value| set.remove(value))
        } else {
            other
                .iter()
                .fold(self.clone(), |set, value| set.remove(value))
        }
    }

    /// Returns true if every element of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl<T, S: Default> Default for TrieSet<T, S> {
    fn default() -> Self {
        Self(TrieMultimap::default())
    }
}

impl<T, S> PartialEq for TrieSet<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T, S> Eq for TrieSet<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Clone,
{
}

impl<T: fmt::Debug, S> fmt::Debug for TrieSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> FromIterator<T> for TrieSet<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |set, value| set.insert(value))
    }
}
