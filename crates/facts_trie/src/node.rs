//! Trie nodes and the path-copying update shared by every mutator.
//!
//! Each level consumes [`BITS`] bits of the 64-bit key hash. Branch nodes
//! store their occupied slots densely, ordered by slot index, with a bitmap
//! recording which indices are present. Keys whose hashes agree in every
//! bit end up in a collision node below the last branch level.
//!
//! Every update copies only the nodes on the path to the affected entry.
//! Removals compact on the way back up: empty nodes disappear and a node
//! left holding a single entry is replaced by that entry.

use std::slice;
use std::sync::Arc;

/// Hash bits consumed per level.
pub(crate) const BITS: u32 = 5;
const MASK: u64 = (1 << BITS) - 1;
const HASH_BITS: u32 = u64::BITS;

/// A key with its (non-empty) set of values.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) hash: u64,
    pub(crate) key: K,
    pub(crate) values: Vec<V>,
}

impl<K, V> Entry<K, V> {
    fn new(hash: u64, key: K, values: Vec<V>) -> Arc<Self> {
        Arc::new(Self { hash, key, values })
    }
}

#[derive(Debug)]
pub(crate) enum Slot<K, V> {
    Entry(Arc<Entry<K, V>>),
    Node(Arc<Node<K, V>>),
}

impl<K, V> Clone for Slot<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Entry(entry) => Self::Entry(Arc::clone(entry)),
            Self::Node(node) => Self::Node(Arc::clone(node)),
        }
    }
}

impl<K, V> Slot<K, V> {
    /// True if both slots point at the same shared entry or node.
    #[cfg(test)]
    pub(crate) fn shares(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Entry(a), Self::Entry(b)) => Arc::ptr_eq(a, b),
            (Self::Node(a), Self::Node(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Debug)]
pub(crate) enum Node<K, V> {
    Branch {
        bitmap: u32,
        slots: Vec<Slot<K, V>>,
    },
    Collision {
        hash: u64,
        entries: Vec<Arc<Entry<K, V>>>,
    },
}

/// What an update does to the values stored for one key.
pub(crate) enum Edit<V> {
    /// Leave the trie untouched.
    Keep,
    /// Store exactly these values (never empty).
    Set(Vec<V>),
    /// Drop the key.
    Remove,
}

/// The result of updating a subtree.
pub(crate) enum Outcome<K, V> {
    Unchanged,
    Updated(Node<K, V>),
    /// The subtree shrank to one entry, which the parent stores inline.
    Single(Arc<Entry<K, V>>),
    Emptied,
}

fn index(hash: u64, shift: u32) -> u32 {
    // Truncation is fine: the mask keeps only BITS bits.
    #[allow(clippy::cast_possible_truncation)]
    let index = ((hash >> shift) & MASK) as u32;
    index
}

fn position(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

impl<K, V> Node<K, V> {
    pub(crate) const fn empty() -> Self {
        Self::Branch {
            bitmap: 0,
            slots: Vec::new(),
        }
    }

    /// A root holding one entry.
    pub(crate) fn singleton(entry: Arc<Entry<K, V>>) -> Self {
        Self::Branch {
            bitmap: 1 << index(entry.hash, 0),
            slots: vec![Slot::Entry(entry)],
        }
    }

    /// The smallest subtree at `shift` holding two entries with distinct keys.
    fn pair(first: Arc<Entry<K, V>>, second: Arc<Entry<K, V>>, shift: u32) -> Self {
        if shift >= HASH_BITS {
            return Self::Collision {
                hash: first.hash,
                entries: vec![first, second],
            };
        }

        let (a, b) = (index(first.hash, shift), index(second.hash, shift));
        if a == b {
            let child = Self::pair(first, second, shift + BITS);
            return Self::Branch {
                bitmap: 1 << a,
                slots: vec![Slot::Node(Arc::new(child))],
            };
        }

        let slots = if a < b {
            vec![Slot::Entry(first), Slot::Entry(second)]
        } else {
            vec![Slot::Entry(second), Slot::Entry(first)]
        };
        Self::Branch {
            bitmap: (1 << a) | (1 << b),
            slots,
        }
    }

    /// Wraps rebuilt branch contents, compacting what removal left behind.
    fn branch(bitmap: u32, slots: Vec<Slot<K, V>>) -> Outcome<K, V> {
        if let [Slot::Entry(entry)] = slots.as_slice() {
            return Outcome::Single(Arc::clone(entry));
        }
        if slots.is_empty() {
            Outcome::Emptied
        } else {
            Outcome::Updated(Self::Branch { bitmap, slots })
        }
    }

    /// Finds the entry for `key`.
    pub(crate) fn get(&self, hash: u64, shift: u32, key: &K) -> Option<&Entry<K, V>>
    where
        K: Eq,
    {
        match self {
            Self::Branch { bitmap, slots } => {
                let bit = 1 << index(hash, shift);
                if bitmap & bit == 0 {
                    return None;
                }
                match &slots[position(*bitmap, bit)] {
                    Slot::Entry(entry) if entry.hash == hash && entry.key == *key => Some(&**entry),
                    Slot::Entry(_) => None,
                    Slot::Node(child) => child.get(hash, shift + BITS, key),
                }
            }
            Self::Collision { entries, .. } => entries
                .iter()
                .find(|entry| entry.key == *key)
                .map(|entry| &**entry),
        }
    }

    /// Applies `edit` to the values stored for `key`, copying the path.
    ///
    /// `edit` sees `None` when the key is absent and is called exactly once.
    pub(crate) fn alter<F>(&self, hash: u64, shift: u32, key: &K, edit: F) -> Outcome<K, V>
    where
        K: Eq + Clone,
        F: FnOnce(Option<&[V]>) -> Edit<V>,
    {
        match self {
            Self::Branch { bitmap, slots } => {
                let bit = 1 << index(hash, shift);
                let pos = position(*bitmap, bit);

                if bitmap & bit == 0 {
                    return match edit(None) {
                        Edit::Set(values) => {
                            let mut slots = slots.clone();
                            slots.insert(pos, Slot::Entry(Entry::new(hash, key.clone(), values)));
                            Outcome::Updated(Self::Branch {
                                bitmap: bitmap | bit,
                                slots,
                            })
                        }
                        Edit::Keep | Edit::Remove => Outcome::Unchanged,
                    };
                }

                let replacement = match &slots[pos] {
                    Slot::Entry(entry) if entry.hash == hash && entry.key == *key => {
                        match edit(Some(entry.values.as_slice())) {
                            Edit::Keep => return Outcome::Unchanged,
                            Edit::Set(values) => {
                                Some(Slot::Entry(Entry::new(hash, key.clone(), values)))
                            }
                            Edit::Remove => None,
                        }
                    }
                    Slot::Entry(entry) => match edit(None) {
                        Edit::Set(values) => {
                            let added = Entry::new(hash, key.clone(), values);
                            let child = Self::pair(Arc::clone(entry), added, shift + BITS);
                            Some(Slot::Node(Arc::new(child)))
                        }
                        Edit::Keep | Edit::Remove => return Outcome::Unchanged,
                    },
                    Slot::Node(child) => match child.alter(hash, shift + BITS, key, edit) {
                        Outcome::Unchanged => return Outcome::Unchanged,
                        Outcome::Updated(node) => Some(Slot::Node(Arc::new(node))),
                        Outcome::Single(entry) => Some(Slot::Entry(entry)),
                        Outcome::Emptied => None,
                    },
                };

                let mut slots = slots.clone();
                let mut bitmap = *bitmap;
                match replacement {
                    Some(slot) => slots[pos] = slot,
                    None => {
                        slots.remove(pos);
                        bitmap ^= bit;
                    }
                }
                Self::branch(bitmap, slots)
            }
            Self::Collision {
                hash: chain_hash,
                entries,
            } => {
                let found = entries.iter().position(|entry| entry.key == *key);
                let change = edit(found.map(|i| entries[i].values.as_slice()));

                let mut entries = entries.clone();
                match (change, found) {
                    (Edit::Keep, _) | (Edit::Remove, None) => return Outcome::Unchanged,
                    (Edit::Set(values), Some(i)) => {
                        entries[i] = Entry::new(hash, key.clone(), values);
                    }
                    (Edit::Set(values), None) => {
                        entries.push(Entry::new(hash, key.clone(), values));
                    }
                    (Edit::Remove, Some(i)) => {
                        entries.remove(i);
                    }
                }

                if let [single] = entries.as_slice() {
                    return Outcome::Single(Arc::clone(single));
                }
                if entries.is_empty() {
                    Outcome::Emptied
                } else {
                    Outcome::Updated(Self::Collision {
                        hash: *chain_hash,
                        entries,
                    })
                }
            }
        }
    }

    /// Counts this node and every node below it.
    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        match self {
            Self::Branch { slots, .. } => {
                1 + slots
                    .iter()
                    .map(|slot| match slot {
                        Slot::Node(child) => child.node_count(),
                        Slot::Entry(_) => 0,
                    })
                    .sum::<usize>()
            }
            Self::Collision { .. } => 1,
        }
    }

    /// True if a collision node exists anywhere in this subtree.
    #[cfg(test)]
    pub(crate) fn has_collisions(&self) -> bool {
        match self {
            Self::Branch { slots, .. } => slots.iter().any(|slot| match slot {
                Slot::Node(child) => child.has_collisions(),
                Slot::Entry(_) => false,
            }),
            Self::Collision { .. } => true,
        }
    }

    fn cursor(&self) -> Cursor<'_, K, V> {
        match self {
            Self::Branch { slots, .. } => Cursor::Slots(slots.iter()),
            Self::Collision { entries, .. } => Cursor::Chain(entries.iter()),
        }
    }
}

enum Cursor<'a, K, V> {
    Slots(slice::Iter<'a, Slot<K, V>>),
    Chain(slice::Iter<'a, Arc<Entry<K, V>>>),
}

/// Depth-first iterator over the entries of a subtree, in hash order.
pub(crate) struct Entries<'a, K, V> {
    stack: Vec<Cursor<'a, K, V>>,
}

impl<'a, K, V> Entries<'a, K, V> {
    pub(crate) fn new(root: &'a Node<K, V>) -> Self {
        Self {
            stack: vec![root.cursor()],
        }
    }
}

impl<K, V> Clone for Entries<'_, K, V> {
    fn clone(&self) -> Self {
        let stack = self
            .stack
            .iter()
            .map(|cursor| match cursor {
                Cursor::Slots(it) => Cursor::Slots(it.clone()),
                Cursor::Chain(it) => Cursor::Chain(it.clone()),
            })
            .collect();
        Self { stack }
    }
}

impl<'a, K, V> Iterator for Entries<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = match self.stack.last_mut()? {
                Cursor::Slots(it) => it.next().map(|slot| match slot {
                    Slot::Entry(entry) => Ok(&**entry),
                    Slot::Node(child) => Err(&**child),
                }),
                Cursor::Chain(it) => it.next().map(|entry| Ok(&**entry)),
            };
            match next {
                Some(Ok(entry)) => return Some(entry),
                Some(Err(child)) => self.stack.push(child.cursor()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
