//! Ordered lists and the list relation view of lists of tuples.

use std::fmt;
use std::hash::{Hash, Hasher};

use facts_trie::TrieSet;
use facts_types::{Error, Result, ResultKind, Type, TypeUniverse};

use crate::set::Set;
use crate::tuple::Tuple;
use crate::value::{Value, write_separated};

/// An immutable list backed by a persistent vector.
///
/// `insert` and `append` widen the list type to fit the new element.
#[derive(Clone)]
pub struct List {
    ty: Type,
    elements: im::Vector<Value>,
}

/// The element type of a collection type, `value` if it has none.
pub(crate) fn element_of(ty: &Type) -> Type {
    ty.element_type().cloned().unwrap_or_else(Type::value)
}

impl List {
    /// An empty list of the given list type.
    pub(crate) fn empty(ty: Type) -> Self {
        Self::from_parts(ty, im::Vector::new())
    }

    pub(crate) fn from_parts(ty: Type, elements: im::Vector<Value>) -> Self {
        Self { ty, elements }
    }

    /// The list type.
    #[must_use]
    pub fn list_type(&self) -> &Type {
        &self.ty
    }

    /// The element type.
    #[must_use]
    pub fn element_type(&self) -> Type {
        element_of(&self.ty)
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Gets an element by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> im::vector::Iter<'_, Value> {
        self.elements.iter()
    }

    /// Returns true if the list contains `value`.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.elements.contains(value)
    }

    /// Returns a new list with `value` prepended.
    #[must_use]
    pub fn insert(&self, universe: &TypeUniverse, value: Value) -> Self {
        let ty = self.widened(universe, &value.runtime_type());
        let mut elements = self.elements.clone();
        elements.push_front(value);
        Self::from_parts(ty, elements)
    }

    /// Returns a new list with `value` appended.
    #[must_use]
    pub fn append(&self, universe: &TypeUniverse, value: Value) -> Self {
        let ty = self.widened(universe, &value.runtime_type());
        let mut elements = self.elements.clone();
        elements.push_back(value);
        Self::from_parts(ty, elements)
    }

    /// Returns the concatenation of two lists, typed by their lub.
    #[must_use]
    pub fn concat(&self, universe: &TypeUniverse, other: &Self) -> Self {
        let ty = universe.lub(&self.ty, &other.ty);
        let mut elements = self.elements.clone();
        elements.append(other.elements.clone());
        Self::from_parts(ty, elements)
    }

    /// Returns a new list with the elements in reverse order.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let elements = self.elements.iter().rev().cloned().collect();
        Self::from_parts(self.ty.clone(), elements)
    }

    /// Views this list as a list relation.
    pub fn into_list_relation(self) -> Result<ListRelation> {
        ListRelation::try_from_list(self)
    }

    fn widened(&self, universe: &TypeUniverse, added: &Type) -> Type {
        let element = self.element_type();
        let joined = universe.lub(&element, added);
        if joined == element {
            self.ty.clone()
        } else {
            universe.list_type(joined)
        }
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.ty.comparable(&other.ty) && self.elements == other.elements
    }
}

impl Eq for List {}

impl Hash for List {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.elements.len().hash(state);
        for element in &self.elements {
            element.hash(state);
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = im::vector::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        write_separated(f, self.iter())?;
        write!(f, "]")
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A list whose elements are tuples. Order and duplicates are kept.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ListRelation(List);

impl ListRelation {
    /// Views `list` as a list relation, failing if its elements are not
    /// tuples.
    pub fn try_from_list(list: List) -> Result<Self> {
        if list.ty.is_list_relation() {
            Ok(Self(list))
        } else {
            Err(Error::result_type_mismatch(ResultKind::ListRelation, list.ty))
        }
    }

    /// The underlying list.
    #[must_use]
    pub fn as_list(&self) -> &List {
        &self.0
    }

    /// Unwraps the underlying list.
    #[must_use]
    pub fn into_list(self) -> List {
        self.0
    }

    /// Returns the number of tuples, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the list relation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the tuples in order.
    pub fn tuples(&self) -> impl Iterator<Item = &Tuple> + '_ {
        self.0.iter().filter_map(Value::as_tuple)
    }

    /// Returns the number of fields per tuple.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.0.ty.arity()
    }

    /// Returns the type of field `index`.
    #[must_use]
    pub fn field_type(&self, index: usize) -> Option<&Type> {
        self.0.ty.field_type(index)
    }

    /// Projects every tuple onto the given positions, keeping order.
    ///
    /// Selecting a single position yields a list of that field's values;
    /// selecting more yields a list relation.
    pub fn select(&self, universe: &TypeUniverse, indices: &[usize]) -> Result<List> {
        let element_type = self.0.element_type();
        if let [index] = indices {
            let ty = element_type
                .field_type(*index)
                .cloned()
                .ok_or_else(|| Error::index_out_of_bounds(*index, self.arity()))?;
            let elements = self
                .tuples()
                .map(|tuple| tuple.get(*index).cloned())
                .collect::<Result<im::Vector<Value>>>()?;
            return Ok(List::from_parts(universe.list_type(ty), elements));
        }

        let ty = universe.tuple_select(&element_type, indices)?;
        let elements = self
            .tuples()
            .map(|tuple| tuple.select(universe, indices).map(Value::Tuple))
            .collect::<Result<im::Vector<Value>>>()?;
        Ok(List::from_parts(universe.list_type(ty), elements))
    }

    /// Composes two binary list relations: `<a, c>` for every `<a, b>` in
    /// `self` and `<b, c>` in `other`, in the order the pairs are met.
    pub fn compose(&self, universe: &TypeUniverse, other: &Self) -> Result<Self> {
        if self.arity() != 2 {
            return Err(Error::unsupported("list_relation.compose", self.0.ty.clone()));
        }
        if other.arity() != 2 {
            return Err(Error::unsupported("list_relation.compose", other.0.ty.clone()));
        }

        let tuple_type = universe.tuple_compose(&self.0.element_type(), &other.0.element_type())?;
        let mut elements = im::Vector::new();
        for left in self.tuples() {
            let (from, via) = (&left.fields()[0], &left.fields()[1]);
            for right in other.tuples().filter(|right| right.fields()[0] == *via) {
                let pair = vec![from.clone(), right.fields()[1].clone()];
                elements.push_back(Value::Tuple(Tuple::from_parts(tuple_type.clone(), pair.into())));
            }
        }
        Ok(Self(List::from_parts(universe.list_type(tuple_type), elements)))
    }

    /// The set of every field value of every tuple.
    #[must_use]
    pub fn carrier(&self, universe: &TypeUniverse) -> Set {
        let element_type = self.0.element_type();
        let field_types = element_type.fields().iter().map(|field| &field.ty);
        let ty = universe.set_type(universe.lub_all(field_types));
        let elements: TrieSet<Value> = self
            .tuples()
            .flat_map(|tuple| tuple.iter().cloned())
            .collect();
        Set::from_parts(ty, elements)
    }
}

impl fmt::Display for ListRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for ListRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
