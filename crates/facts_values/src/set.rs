//! Sets and the relation view of sets of tuples.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use facts_trie::TrieSet;
use facts_types::{Error, Result, ResultKind, Type, TypeUniverse};

use crate::list::element_of;
use crate::tuple::Tuple;
use crate::value::{Value, hash_alone, write_separated};

/// An immutable set of values, stored in a persistent hash trie.
#[derive(Clone)]
pub struct Set {
    ty: Type,
    elements: TrieSet<Value>,
}

impl Set {
    /// An empty set of the given set type.
    pub(crate) fn empty(ty: Type) -> Self {
        Self::from_parts(ty, TrieSet::new())
    }

    pub(crate) fn from_parts(ty: Type, elements: TrieSet<Value>) -> Self {
        Self { ty, elements }
    }

    /// The set type.
    #[must_use]
    pub fn set_type(&self) -> &Type {
        &self.ty
    }

    /// The element type.
    #[must_use]
    pub fn element_type(&self) -> Type {
        element_of(&self.ty)
    }

    /// Returns true if the elements are tuples.
    #[must_use]
    pub fn is_relation(&self) -> bool {
        self.ty.is_relation()
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns true if the set contains `value`.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.elements.contains(value)
    }

    /// Iterates over the elements in hash order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.elements.iter()
    }

    /// Returns a new set with `value` inserted, widening the type to fit.
    #[must_use]
    pub fn insert(&self, universe: &TypeUniverse, value: Value) -> Self {
        let element = self.element_type();
        let joined = universe.lub(&element, &value.runtime_type());
        let ty = if joined == element {
            self.ty.clone()
        } else {
            universe.set_type(joined)
        };
        Self::from_parts(ty, self.elements.insert(value))
    }

    /// Returns a new set without `value`.
    #[must_use]
    pub fn delete(&self, value: &Value) -> Self {
        Self::from_parts(self.ty.clone(), self.elements.remove(value))
    }

    /// Returns the union, typed by the lub of both set types.
    ///
    /// The result is a relation whenever that lub has tuple elements.
    #[must_use]
    pub fn union(&self, universe: &TypeUniverse, other: &Self) -> Self {
        let ty = universe.lub(&self.ty, &other.ty);
        Self::from_parts(ty, self.elements.union(&other.elements))
    }

    /// Returns the elements present in both sets, typed by the lub.
    #[must_use]
    pub fn intersect(&self, universe: &TypeUniverse, other: &Self) -> Self {
        let ty = universe.lub(&self.ty, &other.ty);
        Self::from_parts(ty, self.elements.intersection(&other.elements))
    }

    /// Returns the elements of `self` not in `other`, keeping this set's type.
    #[must_use]
    pub fn subtract(&self, other: &Self) -> Self {
        Self::from_parts(self.ty.clone(), self.elements.difference(&other.elements))
    }

    /// Returns true if every element of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.elements.is_subset(&other.elements)
    }

    /// The cartesian product: every pair `<a, b>` with `a` from `self` and
    /// `b` from `other`.
    #[must_use]
    pub fn product(&self, universe: &TypeUniverse, other: &Self) -> Relation {
        let tuple_type = universe.tuple_type(&[self.element_type(), other.element_type()]);
        let elements = self
            .iter()
            .flat_map(|a| {
                other.iter().map(|b| {
                    Value::Tuple(Tuple::from_parts(
                        tuple_type.clone(),
                        vec![a.clone(), b.clone()].into(),
                    ))
                })
            })
            .collect();
        Relation(Self::from_parts(universe.set_type(tuple_type), elements))
    }

    /// Views this set as a relation.
    pub fn into_relation(self) -> Result<Relation> {
        Relation::try_from_set(self)
    }

    /// Insists that this set is not a relation.
    pub fn into_plain_set(self) -> Result<Self> {
        if self.is_relation() {
            Err(Error::result_type_mismatch(ResultKind::Set, self.ty))
        } else {
            Ok(self)
        }
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        self.ty.comparable(&other.ty) && self.elements == other.elements
    }
}

impl Eq for Set {}

impl Hash for Set {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent: trie order depends on build history.
        let combined = self
            .iter()
            .fold(0u64, |acc, value| acc.wrapping_add(hash_alone(value)));
        self.len().hash(state);
        combined.hash(state);
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        write_separated(f, self.iter())?;
        write!(f, "}}")
    }
}

impl fmt::Debug for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A set whose elements are tuples.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Relation(Set);

impl Relation {
    /// Views `set` as a relation, failing if its elements are not tuples.
    pub fn try_from_set(set: Set) -> Result<Self> {
        if set.is_relation() {
            Ok(Self(set))
        } else {
            Err(Error::result_type_mismatch(ResultKind::Relation, set.ty))
        }
    }

    /// The underlying set.
    #[must_use]
    pub fn as_set(&self) -> &Set {
        &self.0
    }

    /// Unwraps the underlying set.
    #[must_use]
    pub fn into_set(self) -> Set {
        self.0
    }

    /// Returns the number of tuples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the relation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the tuples.
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

    /// Projects every tuple onto the given positions.
    ///
    /// Selecting a single position yields a set of that field's values;
    /// selecting more yields a relation.
    pub fn select(&self, universe: &TypeUniverse, indices: &[usize]) -> Result<Set> {
        let element_type = self.0.element_type();
        if let [index] = indices {
            let ty = element_type
                .field_type(*index)
                .cloned()
                .ok_or_else(|| Error::index_out_of_bounds(*index, self.arity()))?;
            let elements = self
                .tuples()
                .map(|tuple| tuple.get(*index).cloned())
                .collect::<Result<TrieSet<Value>>>()?;
            return Ok(Set::from_parts(universe.set_type(ty), elements));
        }

        let ty = universe.tuple_select(&element_type, indices)?;
        let elements = self
            .tuples()
            .map(|tuple| tuple.select(universe, indices).map(Value::Tuple))
            .collect::<Result<TrieSet<Value>>>()?;
        Ok(Set::from_parts(universe.set_type(ty), elements))
    }

    /// Composes two binary relations: `<a, c>` for every `<a, b>` in `self`
    /// and `<b, c>` in `other`.
    pub fn compose(&self, universe: &TypeUniverse, other: &Self) -> Result<Self> {
        if self.arity() != 2 {
            return Err(Error::unsupported("relation.compose", self.0.ty.clone()));
        }
        if other.arity() != 2 {
            return Err(Error::unsupported("relation.compose", other.0.ty.clone()));
        }

        let tuple_type = universe.tuple_compose(&self.0.element_type(), &other.0.element_type())?;
        let mut elements = TrieSet::new();
        for left in self.tuples() {
            let (from, via) = (&left.fields()[0], &left.fields()[1]);
            for right in other.tuples().filter(|right| right.fields()[0] == *via) {
                let pair = vec![from.clone(), right.fields()[1].clone()];
                elements = elements.insert(Value::Tuple(Tuple::from_parts(
                    tuple_type.clone(),
                    pair.into(),
                )));
            }
        }
        Ok(Self(Set::from_parts(universe.set_type(tuple_type), elements)))
    }

    /// The transitive closure of a binary relation: `<a, c>` whenever `c`
    /// is reachable from `a` along one or more tuples.
    ///
    /// Both fields of the result are typed by the lub of the two field
    /// types.
    pub fn closure(&self, universe: &TypeUniverse) -> Result<Self> {
        if self.arity() != 2 {
            return Err(Error::unsupported("relation.closure", self.0.ty.clone()));
        }
        let tuple_type = universe
            .tuple_closure(&self.0.element_type())
            .map_err(|err| err.in_operation("relation.closure"))?;
        let pair = |from: &Value, to: &Value| {
            Value::Tuple(Tuple::from_parts(
                tuple_type.clone(),
                vec![from.clone(), to.clone()].into(),
            ))
        };

        let mut successors: HashMap<&Value, Vec<&Value>> = HashMap::new();
        for tuple in self.tuples() {
            let fields = tuple.fields();
            successors.entry(&fields[0]).or_default().push(&fields[1]);
        }

        let mut elements = TrieSet::new();
        for &start in successors.keys() {
            let mut reached: HashSet<&Value> = HashSet::new();
            let mut pending: Vec<&Value> = successors[start].clone();
            while let Some(next) = pending.pop() {
                if reached.insert(next) {
                    elements = elements.insert(pair(start, next));
                    if let Some(onward) = successors.get(next) {
                        pending.extend(onward.iter().copied());
                    }
                }
            }
        }
        Ok(Self(Set::from_parts(universe.set_type(tuple_type), elements)))
    }

    /// The set of every field value of every tuple.
    #[must_use]
    pub fn carrier(&self, universe: &TypeUniverse) -> Set {
        let element_type = self.0.element_type();
        let field_types = element_type.fields().iter().map(|field| &field.ty);
        let ty = universe.set_type(universe.lub_all(field_types));
        let elements = self
            .tuples()
            .flat_map(|tuple| tuple.iter().cloned())
            .collect();
        Set::from_parts(ty, elements)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
