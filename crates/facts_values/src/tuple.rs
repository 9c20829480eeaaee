//! Fixed-arity tuples.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use facts_types::{Error, Result, Type, TypeUniverse};

use crate::value::{Value, write_separated};

/// An immutable tuple with optionally labeled fields.
///
/// `set` copies the field array once and shares every field value.
#[derive(Clone)]
pub struct Tuple {
    ty: Type,
    fields: Arc<[Value]>,
}

impl Tuple {
    /// Builds a tuple without checking the fields against `ty`.
    pub(crate) fn from_parts(ty: Type, fields: Arc<[Value]>) -> Self {
        Self { ty, fields }
    }

    /// Builds a tuple of `ty`, checking arity and every field type.
    pub(crate) fn checked(universe: &TypeUniverse, ty: &Type, fields: Vec<Value>) -> Result<Self> {
        if !ty.is_tuple() {
            return Err(Error::unsupported("tuple", ty.clone()));
        }
        if fields.len() != ty.arity() {
            let actual = universe.tuple_type(&runtime_types(&fields));
            return Err(Error::type_mismatch(ty.clone(), actual));
        }
        for (index, value) in fields.iter().enumerate() {
            check_field(ty, index, value)?;
        }
        Ok(Self::from_parts(ty.clone(), fields.into()))
    }

    /// The tuple type.
    #[must_use]
    pub fn tuple_type(&self) -> &Type {
        &self.ty
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Returns the fields in order.
    #[must_use]
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// Iterates over the fields.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.fields.iter()
    }

    /// Returns the field at `index`.
    pub fn get(&self, index: usize) -> Result<&Value> {
        self.fields
            .get(index)
            .ok_or_else(|| Error::index_out_of_bounds(index, self.arity()))
    }

    /// Returns the field labeled `label`.
    pub fn get_labeled(&self, label: &str) -> Result<&Value> {
        self.get(self.index_of(label)?)
    }

    /// Returns a tuple with the field at `index` replaced.
    ///
    /// The new value must be a subtype of the declared field type.
    pub fn set(&self, index: usize, value: Value) -> Result<Self> {
        self.get(index)?;
        check_field(&self.ty, index, &value).map_err(|e| e.in_operation("tuple.set"))?;
        let mut fields = self.fields.to_vec();
        fields[index] = value;
        Ok(Self::from_parts(self.ty.clone(), fields.into()))
    }

    /// Returns a tuple with the field labeled `label` replaced.
    pub fn set_labeled(&self, label: &str, value: Value) -> Result<Self> {
        self.set(self.index_of(label)?, value)
    }

    /// Projects onto the given positions, in the given order.
    pub fn select(&self, universe: &TypeUniverse, indices: &[usize]) -> Result<Self> {
        let ty = universe.tuple_select(&self.ty, indices)?;
        let fields = indices
            .iter()
            .map(|&index| self.get(index).cloned())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_parts(ty, fields.into()))
    }

    /// Projects onto the given labels, in the given order.
    pub fn select_labels(&self, universe: &TypeUniverse, labels: &[&str]) -> Result<Self> {
        let indices = labels
            .iter()
            .map(|label| self.index_of(label))
            .collect::<Result<Vec<_>>>()?;
        self.select(universe, &indices)
    }

    fn index_of(&self, label: &str) -> Result<usize> {
        self.ty
            .field_index(label)
            .ok_or_else(|| Error::label_not_found(label, self.ty.clone()))
    }
}

/// The runtime types of `values`, in order.
pub(crate) fn runtime_types(values: &[Value]) -> Vec<Type> {
    values.iter().map(Value::runtime_type).collect()
}

/// Checks `value` against field `index` of a tuple or constructor type.
pub(crate) fn check_field(ty: &Type, index: usize, value: &Value) -> Result<()> {
    let expected = ty
        .field_type(index)
        .ok_or_else(|| Error::index_out_of_bounds(index, ty.arity()))?;
    let actual = value.runtime_type();
    if actual.is_subtype_of(expected) {
        Ok(())
    } else {
        Err(Error::type_mismatch(expected.clone(), actual))
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        self.ty.comparable(&other.ty) && self.fields == other.fields
    }
}

impl Eq for Tuple {}

impl Hash for Tuple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fields.hash(state);
    }
}

impl<'a> IntoIterator for &'a Tuple {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        write_separated(f, self.iter())?;
        write!(f, ">")
    }
}

impl fmt::Debug for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
