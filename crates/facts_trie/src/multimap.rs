//! Persistent multimap on a hash-array-mapped trie.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::sync::Arc;

use crate::node::{Edit, Entries, Entry, Node, Outcome};

/// The default hash builder: deterministic SipHash.
pub type DefaultState = BuildHasherDefault<DefaultHasher>;

/// Persistent map from keys to sets of values.
///
/// Cloning is O(1). Every update returns a new map that shares all
/// untouched subtrees with the original; the original stays valid.
///
/// A key with no values is the same as an absent key. Values for one key
/// form a set: inserting an association twice stores it once.
pub struct TrieMultimap<K, V, S = DefaultState> {
    root: Arc<Node<K, V>>,
    size: usize,
    keys: usize,
    hasher: S,
}

impl<K, V, S: Clone> Clone for TrieMultimap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            size: self.size,
            keys: self.keys,
            hasher: self.hasher.clone(),
        }
    }
}

impl<K, V> TrieMultimap<K, V> {
    /// Creates an empty multimap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultState::default())
    }
}

impl<K, V, S> TrieMultimap<K, V, S> {
    /// Creates an empty multimap hashing keys with `hasher`.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            root: Arc::new(Node::empty()),
            size: 0,
            keys: 0,
            hasher,
        }
    }

    /// Returns the number of associations (not distinct keys).
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.keys
    }

    /// Returns true if there are no associations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Iterates over the distinct keys, in hash order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries().map(|entry| &entry.key)
    }

    /// Iterates over every value, once per association, in hash order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries().flat_map(|entry| entry.values.iter())
    }

    /// Iterates over every association.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: self.entries(),
            current: None,
        }
    }

    /// Iterates over each key with its values.
    pub fn grouped(&self) -> impl Iterator<Item = (&K, &[V])> + '_ {
        self.entries()
            .map(|entry| (&entry.key, entry.values.as_slice()))
    }

    fn entries(&self) -> Entries<'_, K, V> {
        Entries::new(&self.root)
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> &Node<K, V> {
        &self.root
    }
}

impl<K, V, S> TrieMultimap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Clone,
    S: BuildHasher + Clone,
{
    fn hash(&self, key: &K) -> u64 {
        self.hasher.hash_one(key)
    }

    fn lookup(&self, key: &K) -> Option<&Entry<K, V>> {
        self.root.get(self.hash(key), 0, key)
    }

    /// Returns the values associated with `key` (empty if absent).
    #[must_use]
    pub fn get(&self, key: &K) -> &[V] {
        self.lookup(key)
            .map(|entry| entry.values.as_slice())
            .unwrap_or_default()
    }

    /// Returns true if `key` has at least one value.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.lookup(key).is_some()
    }

    /// Returns true if the association `(key, value)` is present.
    #[must_use]
    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.get(key).contains(value)
    }

    /// Adds the association `(key, value)`, keeping the key's other values.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        self.alter(&key, |old| match old {
            Some(values) if values.contains(&value) => Edit::Keep,
            Some(values) => {
                let mut values = values.to_vec();
                values.push(value);
                Edit::Set(values)
            }
            None => Edit::Set(vec![value]),
        })
    }

    /// Makes `value` the only value of `key`.
    #[must_use]
    pub fn replace(&self, key: K, value: V) -> Self {
        self.alter(&key, |old| match old {
            Some([existing]) if *existing == value => Edit::Keep,
            _ => Edit::Set(vec![value]),
        })
    }

    /// Removes exactly the association `(key, value)`.
    ///
    /// Removing a key's last value removes the key.
    #[must_use]
    pub fn remove(&self, key: &K, value: &V) -> Self {
        self.alter(key, |old| match old {
            Some(values) if values.contains(value) => {
                let rest: Vec<V> = values.iter().filter(|v| *v != value).cloned().collect();
                if rest.is_empty() {
                    Edit::Remove
                } else {
                    Edit::Set(rest)
                }
            }
            _ => Edit::Keep,
        })
    }

    /// Removes `key` with all of its values.
    #[must_use]
    pub fn remove_key(&self, key: &K) -> Self {
        self.alter(key, |old| match old {
            Some(_) => Edit::Remove,
            None => Edit::Keep,
        })
    }

    /// Runs one path-copying update and keeps the counters in step.
    fn alter<F>(&self, key: &K, edit: F) -> Self
    where
        F: FnOnce(Option<&[V]>) -> Edit<V>,
    {
        let mut before = 0;
        let mut after = 0;
        let outcome = self.root.alter(self.hash(key), 0, key, |old| {
            before = old.map_or(0, <[V]>::len);
            let change = edit(old);
            after = match &change {
                Edit::Keep => before,
                Edit::Set(values) => values.len(),
                Edit::Remove => 0,
            };
            change
        });

        let root = match outcome {
            Outcome::Unchanged => return self.clone(),
            Outcome::Updated(node) => node,
            Outcome::Single(entry) => Node::singleton(entry),
            Outcome::Emptied => Node::empty(),
        };
        Self {
            root: Arc::new(root),
            size: self.size - before + after,
            keys: self.keys - usize::from(before > 0) + usize::from(after > 0),
            hasher: self.hasher.clone(),
        }
    }
}

impl<K, V, S: Default> Default for TrieMultimap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> PartialEq for TrieMultimap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Clone,
    S: BuildHasher + Clone,
{
    /// Content equality: the same associations, regardless of build order.
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.root, &other.root) {
            return true;
        }
        self.size == other.size
            && self.keys == other.keys
            && self.grouped().all(|(key, values)| {
                let theirs = other.get(key);
                theirs.len() == values.len() && values.iter().all(|v| theirs.contains(v))
            })
    }
}

impl<K, V, S> Eq for TrieMultimap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Clone,
    S: BuildHasher + Clone,
{
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for TrieMultimap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.grouped()).finish()
    }
}

impl<K, V, S> FromIterator<(K, V)> for TrieMultimap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Clone,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |map, (key, value)| map.insert(key, value))
    }
}

impl<'a, K, V, S> IntoIterator for &'a TrieMultimap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the associations of a [`TrieMultimap`].
pub struct Iter<'a, K, V> {
    entries: Entries<'a, K, V>,
    current: Option<(&'a K, std::slice::Iter<'a, V>)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, values)) = &mut self.current {
                if let Some(value) = values.next() {
                    return Some((*key, value));
                }
            }
            let entry = self.entries.next()?;
            self.current = Some((&entry.key, entry.values.iter()));
        }
    }
}
