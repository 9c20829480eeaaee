//! The value type shared by every collection and tree node.

use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use facts_types::Type;

use crate::constructor::Constructor;
use crate::list::{List, ListRelation};
use crate::map::Map;
use crate::set::{Relation, Set};
use crate::tuple::Tuple;
use crate::visitor::ValueVisitor;

/// An immutable, typed value.
///
/// Cloning is O(1) for every variant: composite values share their
/// storage. Equality is structural: composite values are equal when
/// their types are comparable and their contents are equal.
#[derive(Clone)]
pub enum Value {
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point, compared bitwise.
    Real(f64),
    /// String value.
    String(Arc<str>),
    /// A region of a source file.
    SourceLocation(SourceLocation),
    /// An opaque externally defined payload.
    Object(ObjectValue),
    /// Fixed-arity tuple.
    Tuple(Tuple),
    /// Ordered list.
    List(List),
    /// Set; a set of tuples is a relation.
    Set(Set),
    /// Map with unique keys.
    Map(Map),
    /// Tree node built by a constructor of a sort.
    Constructor(Constructor),
}

/// A line and column inside a source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinePosition {
    /// Line, starting at 1.
    pub line: u32,
    /// Column, starting at 0.
    pub column: u32,
}

/// A region of a source file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Path or URI of the file.
    pub path: Arc<str>,
    /// Character offset of the region.
    pub offset: usize,
    /// Length of the region in characters.
    pub length: usize,
    /// Start of the region, when known.
    pub begin: Option<LinePosition>,
    /// End of the region, when known.
    pub end: Option<LinePosition>,
}

impl SourceLocation {
    /// Creates a location without line information.
    #[must_use]
    pub fn new(path: &str, offset: usize, length: usize) -> Self {
        Self {
            path: path.into(),
            offset,
            length,
            begin: None,
            end: None,
        }
    }

    /// Adds begin and end line positions.
    #[must_use]
    pub fn with_lines(mut self, begin: LinePosition, end: LinePosition) -> Self {
        self.begin = Some(begin);
        self.end = Some(end);
        self
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}|({},{}", self.path, self.offset, self.length)?;
        if let (Some(begin), Some(end)) = (self.begin, self.end) {
            write!(
                f,
                ",<{},{}>,<{},{}>",
                begin.line, begin.column, end.line, end.column
            )?;
        }
        write!(f, ")")
    }
}

/// An opaque payload of an externally defined kind.
///
/// Two objects are equal only if they share the same payload.
#[derive(Clone, Debug)]
pub struct ObjectValue {
    ty: Type,
    payload: Arc<dyn Any + Send + Sync>,
}

impl ObjectValue {
    /// Wraps a payload with its object type.
    #[must_use]
    pub fn new(ty: Type, payload: Arc<dyn Any + Send + Sync>) -> Self {
        Self { ty, payload }
    }

    /// The object type.
    #[must_use]
    pub fn object_type(&self) -> &Type {
        &self.ty
    }

    /// Borrows the payload as `T`, if it is one.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref()
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.payload), Arc::as_ptr(&other.payload))
    }
}

impl Eq for ObjectValue {}

impl Hash for ObjectValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.payload).cast::<()>(), state);
    }
}

impl Value {
    /// Returns the runtime type of this value.
    ///
    /// The runtime type of a constructor node is its sort; use
    /// [`Constructor::constructor_type`] for the precise type.
    #[must_use]
    pub fn runtime_type(&self) -> Type {
        match self {
            Self::Integer(_) => Type::integer(),
            Self::Real(_) => Type::real(),
            Self::String(_) => Type::string(),
            Self::SourceLocation(_) => Type::source_location(),
            Self::Object(object) => object.ty.clone(),
            Self::Tuple(tuple) => tuple.tuple_type().clone(),
            Self::List(list) => list.list_type().clone(),
            Self::Set(set) => set.set_type().clone(),
            Self::Map(map) => map.map_type().clone(),
            Self::Constructor(node) => node.sort().clone(),
        }
    }

    /// Returns true if the runtime type is a subtype of `ty`.
    #[must_use]
    pub fn has_type(&self, ty: &Type) -> bool {
        self.runtime_type().is_subtype_of(ty)
    }

    /// Dispatches to the visitor method for this kind of value.
    pub fn accept<V: ValueVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Integer(n) => visitor.visit_integer(*n),
            Self::Real(n) => visitor.visit_real(*n),
            Self::String(s) => visitor.visit_string(s),
            Self::SourceLocation(loc) => visitor.visit_source_location(loc),
            Self::Object(object) => visitor.visit_object(object),
            Self::Tuple(tuple) => visitor.visit_tuple(tuple),
            Self::List(list) => match ListRelation::try_from_list(list.clone()) {
                Ok(relation) => visitor.visit_list_relation(&relation),
                Err(_) => visitor.visit_list(list),
            },
            Self::Set(set) => match Relation::try_from_set(set.clone()) {
                Ok(relation) => visitor.visit_relation(&relation),
                Err(_) => visitor.visit_set(set),
            },
            Self::Map(map) => visitor.visit_map(map),
            Self::Constructor(node) => visitor.visit_constructor(node),
        }
    }

    /// Attempts to extract an integer.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a real.
    #[must_use]
    pub const fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a source location.
    #[must_use]
    pub const fn as_source_location(&self) -> Option<&SourceLocation> {
        match self {
            Self::SourceLocation(loc) => Some(loc),
            _ => None,
        }
    }

    /// Attempts to extract a tuple.
    #[must_use]
    pub const fn as_tuple(&self) -> Option<&Tuple> {
        match self {
            Self::Tuple(tuple) => Some(tuple),
            _ => None,
        }
    }

    /// Attempts to extract a list.
    #[must_use]
    pub const fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Attempts to view this value as a list relation.
    #[must_use]
    pub fn as_list_relation(&self) -> Option<ListRelation> {
        self.as_list()
            .and_then(|list| ListRelation::try_from_list(list.clone()).ok())
    }

    /// Attempts to extract a set (relations included).
    #[must_use]
    pub const fn as_set(&self) -> Option<&Set> {
        match self {
            Self::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Attempts to view this value as a relation.
    #[must_use]
    pub fn as_relation(&self) -> Option<Relation> {
        self.as_set()
            .and_then(|set| Relation::try_from_set(set.clone()).ok())
    }

    /// Attempts to extract a map.
    #[must_use]
    pub const fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Attempts to extract a constructor node.
    #[must_use]
    pub const fn as_constructor(&self) -> Option<&Constructor> {
        match self {
            Self::Constructor(node) => Some(node),
            _ => None,
        }
    }
}

/// Hashes one item on its own, for order-independent combination.
pub(crate) fn hash_alone<T: Hash + ?Sized>(item: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    item.hash(&mut hasher);
    hasher.finish()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::SourceLocation(a), Self::SourceLocation(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Constructor(a), Self::Constructor(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Integer(n) => n.hash(state),
            Self::Real(n) => n.to_bits().hash(state),
            Self::String(s) => s.hash(state),
            Self::SourceLocation(loc) => loc.hash(state),
            Self::Object(object) => object.hash(state),
            Self::Tuple(tuple) => tuple.hash(state),
            Self::List(list) => list.hash(state),
            Self::Set(set) => set.hash(state),
            Self::Map(map) => map.hash(state),
            Self::Constructor(node) => node.hash(state),
        }
    }
}

/// Writes `items` separated by commas.
pub(crate) fn write_separated<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(n) => write!(f, "{n:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::SourceLocation(loc) => write!(f, "{loc}"),
            Self::Object(object) => write!(f, "{}", object.ty),
            Self::Tuple(tuple) => write!(f, "{tuple}"),
            Self::List(list) => write!(f, "{list}"),
            Self::Set(set) => write!(f, "{set}"),
            Self::Map(map) => write!(f, "{map}"),
            Self::Constructor(node) => write!(f, "{node}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// Convenience From implementations

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Real(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<SourceLocation> for Value {
    fn from(loc: SourceLocation) -> Self {
        Self::SourceLocation(loc)
    }
}

impl From<Tuple> for Value {
    fn from(tuple: Tuple) -> Self {
        Self::Tuple(tuple)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Self::List(list)
    }
}

impl From<Set> for Value {
    fn from(set: Set) -> Self {
        Self::Set(set)
    }
}

impl From<ListRelation> for Value {
    fn from(relation: ListRelation) -> Self {
        Self::List(relation.into_list())
    }
}

impl From<Relation> for Value {
    fn from(relation: Relation) -> Self {
        Self::Set(relation.into_set())
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Map(map)
    }
}

impl From<Constructor> for Value {
    fn from(node: Constructor) -> Self {
        Self::Constructor(node)
    }
}
