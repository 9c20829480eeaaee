//! Maps with unique keys.

use std::fmt;
use std::hash::{Hash, Hasher};

use facts_trie::TrieMultimap;
use facts_types::{Field, Type, TypeKind, TypeUniverse};

use crate::value::{Value, hash_alone};

/// An immutable map, stored in a persistent hash trie with one value per key.
///
/// Key and value labels of the map type are kept but never affect
/// equality.
#[derive(Clone)]
pub struct Map {
    ty: Type,
    entries: TrieMultimap<Value, Value>,
}

impl Map {
    /// An empty map of the given map type.
    pub(crate) fn empty(ty: Type) -> Self {
        Self::from_parts(ty, TrieMultimap::new())
    }

    pub(crate) fn from_parts(ty: Type, entries: TrieMultimap<Value, Value>) -> Self {
        Self { ty, entries }
    }

    /// The map type.
    #[must_use]
    pub fn map_type(&self) -> &Type {
        &self.ty
    }

    /// The key type.
    #[must_use]
    pub fn key_type(&self) -> Type {
        self.ty.key_type().cloned().unwrap_or_else(Type::value)
    }

    /// The value type.
    #[must_use]
    pub fn value_type(&self) -> Type {
        self.ty.map_value_type().cloned().unwrap_or_else(Type::value)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets the value for `key`.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key).first()
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.keys()
    }

    /// Iterates over the values.
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.values()
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> facts_trie::Iter<'_, Value, Value> {
        self.entries.iter()
    }

    /// Returns a new map with `key` bound to `value`, replacing any previous
    /// binding and widening the map type to fit.
    #[must_use]
    pub fn put(&self, universe: &TypeUniverse, key: Value, value: Value) -> Self {
        let ty = self.widened(universe, &key.runtime_type(), &value.runtime_type());
        Self::from_parts(ty, self.entries.replace(key, value))
    }

    /// Returns a new map without `key`.
    #[must_use]
    pub fn remove(&self, key: &Value) -> Self {
        Self::from_parts(self.ty.clone(), self.entries.remove_key(key))
    }

    /// Right-biased union: bindings in `other` win. Typed by the lub of the
    /// two map types, so a key or value label survives only when both maps
    /// carry the same one.
    #[must_use]
    pub fn join(&self, universe: &TypeUniverse, other: &Self) -> Self {
        let ty = universe.lub(&self.ty, &other.ty);
        let entries = other
            .iter()
            .fold(self.entries.clone(), |entries, (key, value)| {
                entries.replace(key.clone(), value.clone())
            });
        Self::from_parts(ty, entries)
    }

    fn widened(&self, universe: &TypeUniverse, key: &Type, value: &Type) -> Type {
        let TypeKind::Map {
            key: key_field,
            value: value_field,
        } = self.ty.resolved().kind()
        else {
            return universe.map_type(key.clone(), value.clone());
        };
        let joined_key = universe.lub(&key_field.ty, key);
        let joined_value = universe.lub(&value_field.ty, value);
        if joined_key == key_field.ty && joined_value == value_field.ty {
            return self.ty.clone();
        }
        universe.map_type_of(
            Field {
                ty: joined_key,
                label: key_field.label.clone(),
            },
            Field {
                ty: joined_value,
                label: value_field.label.clone(),
            },
        )
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.ty.comparable(&other.ty) && self.entries == other.entries
    }
}

impl Eq for Map {}

impl Hash for Map {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self
            .iter()
            .fold(0u64, |acc, entry| acc.wrapping_add(hash_alone(&entry)));
        self.len().hash(state);
        combined.hash(state);
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a Value, &'a Value);
    type IntoIter = facts_trie::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{key}:{value}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
