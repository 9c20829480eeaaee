//! Writers: single-owner accumulators that seal into immutable values.
//!
//! A writer is bound to one declared collection type. Every inserted value
//! must be a subtype of the declared element (or key/value) type. `seal`
//! freezes the contents; after that every mutator fails with
//! [`ErrorKind::IllegalState`](facts_types::ErrorKind::IllegalState) and
//! further `seal` calls return the same value.

use facts_trie::{TrieMultimap, TrieSet};
use facts_types::{Error, Result, Type};
use tracing::trace;

use crate::list::{List, ListRelation, element_of};
use crate::map::Map;
use crate::set::{Relation, Set};
use crate::value::Value;

fn ensure_open<T>(sealed: Option<&T>, operation: &'static str) -> Result<()> {
    match sealed {
        None => Ok(()),
        Some(_) => Err(Error::illegal_state("writer is already sealed").in_operation(operation)),
    }
}

fn check_bound(bound: &Type, value: &Value, operation: &'static str) -> Result<()> {
    let actual = value.runtime_type();
    if actual.is_subtype_of(bound) {
        Ok(())
    } else {
        Err(Error::type_mismatch(bound.clone(), actual).in_operation(operation))
    }
}

/// Builds a [`List`].
pub struct ListWriter {
    ty: Type,
    element: Type,
    elements: im::Vector<Value>,
    sealed: Option<List>,
}

impl ListWriter {
    pub(crate) fn new(ty: Type) -> Self {
        Self {
            element: element_of(&ty),
            ty,
            elements: im::Vector::new(),
            sealed: None,
        }
    }

    /// The declared element type.
    #[must_use]
    pub fn element_type(&self) -> &Type {
        &self.element
    }

    /// Number of elements written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Prepends `value`.
    pub fn insert(&mut self, value: Value) -> Result<()> {
        ensure_open(self.sealed.as_ref(), "list_writer.insert")?;
        check_bound(&self.element, &value, "list_writer.insert")?;
        self.elements.push_front(value);
        Ok(())
    }

    /// Appends `value`.
    pub fn append(&mut self, value: Value) -> Result<()> {
        ensure_open(self.sealed.as_ref(), "list_writer.append")?;
        check_bound(&self.element, &value, "list_writer.append")?;
        self.elements.push_back(value);
        Ok(())
    }

    /// Prepends `values`, keeping their order. Nothing is written unless
    /// every value fits.
    pub fn insert_all(&mut self, values: impl IntoIterator<Item = Value>) -> Result<()> {
        ensure_open(self.sealed.as_ref(), "list_writer.insert_all")?;
        let values: Vec<Value> = values.into_iter().collect();
        for value in &values {
            check_bound(&self.element, value, "list_writer.insert_all")?;
        }
        for value in values.into_iter().rev() {
            self.elements.push_front(value);
        }
        Ok(())
    }

    /// Freezes the writer and returns the list.
    pub fn seal(&mut self) -> List {
        self.sealed
            .get_or_insert_with(|| {
                trace!(ty = %self.ty, len = self.elements.len(), "sealed list");
                List::from_parts(self.ty.clone(), std::mem::take(&mut self.elements))
            })
            .clone()
    }

    /// Freezes the writer and returns the result as a list relation.
    ///
    /// Fails with a result-type mismatch if the declared element type is not
    /// a tuple type.
    pub fn seal_list_relation(&mut self) -> Result<ListRelation> {
        ListRelation::try_from_list(self.seal())
    }

    /// Returns true once sealed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.is_some()
    }
}

/// Builds a [`Set`] or [`Relation`].
pub struct SetWriter {
    ty: Type,
    element: Type,
    elements: TrieSet<Value>,
    sealed: Option<Set>,
}

impl SetWriter {
    pub(crate) fn new(ty: Type) -> Self {
        Self {
            element: element_of(&ty),
            ty,
            elements: TrieSet::new(),
            sealed: None,
        }
    }

    /// The declared element type.
    #[must_use]
    pub fn element_type(&self) -> &Type {
        &self.element
    }

    /// Number of distinct elements written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Adds `value`. Duplicates collapse.
    pub fn insert(&mut self, value: Value) -> Result<()> {
        ensure_open(self.sealed.as_ref(), "set_writer.insert")?;
        check_bound(&self.element, &value, "set_writer.insert")?;
        self.elements = self.elements.insert(value);
        Ok(())
    }

    /// Adds every value. Nothing is written unless every value fits.
    pub fn insert_all(&mut self, values: impl IntoIterator<Item = Value>) -> Result<()> {
        ensure_open(self.sealed.as_ref(), "set_writer.insert_all")?;
        let values: Vec<Value> = values.into_iter().collect();
        for value in &values {
            check_bound(&self.element, value, "set_writer.insert_all")?;
        }
        self.elements = values
            .into_iter()
            .fold(self.elements.clone(), |elements, value| elements.insert(value));
        Ok(())
    }

    /// Freezes the writer and returns the set.
    pub fn seal(&mut self) -> Set {
        self.sealed
            .get_or_insert_with(|| {
                trace!(ty = %self.ty, len = self.elements.len(), "sealed set");
                Set::from_parts(self.ty.clone(), std::mem::take(&mut self.elements))
            })
            .clone()
    }

    /// Freezes the writer and returns the result as a relation.
    ///
    /// Fails with a result-type mismatch if the declared element type is not
    /// a tuple type.
    pub fn seal_relation(&mut self) -> Result<Relation> {
        Relation::try_from_set(self.seal())
    }

    /// Returns true once sealed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.is_some()
    }
}

/// Builds a [`Map`].
pub struct MapWriter {
    ty: Type,
    key: Type,
    value: Type,
    entries: TrieMultimap<Value, Value>,
    sealed: Option<Map>,
}

impl MapWriter {
    pub(crate) fn new(ty: Type) -> Self {
        Self {
            key: ty.key_type().cloned().unwrap_or_else(Type::value),
            value: ty.map_value_type().cloned().unwrap_or_else(Type::value),
            ty,
            entries: TrieMultimap::new(),
            sealed: None,
        }
    }

    /// Number of entries written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binds `key` to `value`; a later `put` for the same key wins.
    pub fn put(&mut self, key: Value, value: Value) -> Result<()> {
        ensure_open(self.sealed.as_ref(), "map_writer.put")?;
        check_bound(&self.key, &key, "map_writer.put")?;
        check_bound(&self.value, &value, "map_writer.put")?;
        self.entries = self.entries.replace(key, value);
        Ok(())
    }

    /// Binds every pair. Nothing is written unless every pair fits.
    pub fn put_all(&mut self, entries: impl IntoIterator<Item = (Value, Value)>) -> Result<()> {
        ensure_open(self.sealed.as_ref(), "map_writer.put_all")?;
        let entries: Vec<(Value, Value)> = entries.into_iter().collect();
        for (key, value) in &entries {
            check_bound(&self.key, key, "map_writer.put_all")?;
            check_bound(&self.value, value, "map_writer.put_all")?;
        }
        self.entries = entries
            .into_iter()
            .fold(self.entries.clone(), |map, (key, value)| map.replace(key, value));
        Ok(())
    }

    /// Freezes the writer and returns the map.
    pub fn seal(&mut self) -> Map {
        self.sealed
            .get_or_insert_with(|| {
                trace!(ty = %self.ty, len = self.entries.len(), "sealed map");
                Map::from_parts(self.ty.clone(), std::mem::take(&mut self.entries))
            })
            .clone()
    }

    /// Returns true once sealed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.is_some()
    }
}
