//! Constructor values: nodes of algebraic sorts.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use facts_types::{Error, Result, Type, TypeUniverse};
use once_cell::sync::Lazy;

use crate::tuple::{check_field, runtime_types};
use crate::value::{Value, write_separated};

/// Label to value annotations carried by a constructor value.
pub type Annotations = im::HashMap<Arc<str>, Value>;

/// Unannotated nodes all share this map.
static NO_ANNOTATIONS: Lazy<Annotations> = Lazy::new(Annotations::new);

/// An immutable node of an algebraic sort.
///
/// The node keeps its precise constructor type, but its runtime type as a
/// [`Value`] is the sort.
#[derive(Clone)]
pub struct Constructor {
    ty: Type,
    children: Arc<[Value]>,
    annotations: Annotations,
}

impl Constructor {
    /// Builds a node of constructor type `ty`, checking every child.
    pub(crate) fn checked(
        universe: &TypeUniverse,
        ty: &Type,
        children: Vec<Value>,
    ) -> Result<Self> {
        Self::check_children(universe, ty, &children)?;
        Ok(Self::unchecked(ty.clone(), children))
    }

    /// Checks that `children` fit the declared children of `ty`.
    pub(crate) fn check_children(
        universe: &TypeUniverse,
        ty: &Type,
        children: &[Value],
    ) -> Result<()> {
        if !ty.is_constructor() {
            return Err(Error::unsupported("constructor", ty.clone()));
        }
        if children.len() != ty.arity() {
            let expected = ty.children().cloned().unwrap_or_else(Type::void);
            let actual = universe.tuple_type(&runtime_types(children));
            return Err(Error::type_mismatch(expected, actual));
        }
        for (index, child) in children.iter().enumerate() {
            check_field(ty, index, child)?;
        }
        Ok(())
    }

    pub(crate) fn unchecked(ty: Type, children: Vec<Value>) -> Self {
        Self {
            ty,
            children: children.into(),
            annotations: NO_ANNOTATIONS.clone(),
        }
    }

    fn with_children(&self, children: Arc<[Value]>) -> Self {
        Self {
            ty: self.ty.clone(),
            children,
            annotations: self.annotations.clone(),
        }
    }

    fn with_annotations(&self, annotations: Annotations) -> Self {
        Self {
            ty: self.ty.clone(),
            children: self.children.clone(),
            annotations,
        }
    }

    /// The constructor name, `None` for the anonymous constructor.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.ty.resolved().name()
    }

    /// The precise constructor type.
    #[must_use]
    pub fn constructor_type(&self) -> &Type {
        &self.ty
    }

    /// The sort this node belongs to.
    #[must_use]
    pub fn sort(&self) -> &Type {
        self.ty.sort().unwrap_or(&self.ty)
    }

    /// Returns the number of children.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.children.len()
    }

    /// Returns the children in order.
    #[must_use]
    pub fn children(&self) -> &[Value] {
        &self.children
    }

    /// Returns the child at `index`.
    pub fn get(&self, index: usize) -> Result<&Value> {
        self.children
            .get(index)
            .ok_or_else(|| Error::index_out_of_bounds(index, self.arity()))
    }

    /// Returns the child labeled `label`.
    pub fn get_labeled(&self, label: &str) -> Result<&Value> {
        self.get(self.index_of(label)?)
    }

    /// Returns a node with the child at `index` replaced.
    ///
    /// The new child must be a subtype of the declared child type. The
    /// annotations are kept.
    pub fn set(&self, index: usize, value: Value) -> Result<Self> {
        self.get(index)?;
        check_field(&self.ty, index, &value).map_err(|e| e.in_operation("constructor.set"))?;
        let mut children = self.children.to_vec();
        children[index] = value;
        Ok(self.with_children(children.into()))
    }

    /// Returns a node with the child labeled `label` replaced.
    pub fn set_labeled(&self, label: &str, value: Value) -> Result<Self> {
        self.set(self.index_of(label)?, value)
    }

    fn index_of(&self, label: &str) -> Result<usize> {
        self.ty
            .field_index(label)
            .ok_or_else(|| Error::label_not_found(label, self.ty.clone()))
    }

    /// All annotations on this node.
    #[must_use]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Gets one annotation.
    #[must_use]
    pub fn get_annotation(&self, label: &str) -> Option<&Value> {
        self.annotations.get(label)
    }

    /// Returns true if the annotation is set on this node.
    #[must_use]
    pub fn has_annotation(&self, label: &str) -> bool {
        self.annotations.contains_key(label)
    }

    /// Returns true if `label` is declared for this node's type.
    #[must_use]
    pub fn declares_annotation(&self, universe: &TypeUniverse, label: &str) -> bool {
        universe.declares_annotation(&self.ty, label)
    }

    /// Returns a node carrying annotation `label` with `value`.
    ///
    /// A declared annotation type is always enforced. An undeclared label
    /// only requires the new value to be comparable with the value it
    /// replaces.
    pub fn set_annotation(
        &self,
        universe: &TypeUniverse,
        label: &str,
        value: Value,
    ) -> Result<Self> {
        let actual = value.runtime_type();
        let expected = match universe.annotation_type(&self.ty, label) {
            Some(declared) if actual.is_subtype_of(&declared) => None,
            Some(declared) => Some(declared),
            None => self
                .annotations
                .get(label)
                .map(Value::runtime_type)
                .filter(|previous| !previous.comparable(&actual)),
        };
        if let Some(expected) = expected {
            return Err(Error::annotation_type_mismatch(label, expected, actual)
                .in_operation("constructor.set_annotation"));
        }
        Ok(self.with_annotations(self.annotations.update(label.into(), value)))
    }

    /// Returns a node without annotation `label`.
    #[must_use]
    pub fn remove_annotation(&self, label: &str) -> Self {
        if self.has_annotation(label) {
            self.with_annotations(self.annotations.without(label))
        } else {
            self.clone()
        }
    }
}

impl PartialEq for Constructor {
    fn eq(&self, other: &Self) -> bool {
        self.ty.comparable(&other.ty)
            && self.children == other.children
            && self.annotations == other.annotations
    }
}

impl Eq for Constructor {}

impl Hash for Constructor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.children.hash(state);
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}(")?,
            None => write!(f, "{}(", self.sort())?,
        }
        write_separated(f, self.children.iter())?;
        write!(f, ")")?;

        if !self.annotations.is_empty() {
            let mut labels: Vec<_> = self.annotations.keys().collect();
            labels.sort();
            write!(f, "[")?;
            for (i, label) in labels.into_iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "@{label}={}", self.annotations[label])?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
