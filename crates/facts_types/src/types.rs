//! Canonical type descriptors and the subtype relation.
//!
//! A [`Type`] is a shared handle to an immutable [`TypeKind`]. Composite
//! types are only ever created through a [`TypeUniverse`](crate::TypeUniverse),
//! which guarantees one live instance per structural shape, so equality
//! and hashing are by identity.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;

static VALUE: Lazy<Type> = Lazy::new(|| Type::leaf(TypeKind::Value));
static VOID: Lazy<Type> = Lazy::new(|| Type::leaf(TypeKind::Void));
static INTEGER: Lazy<Type> = Lazy::new(|| Type::leaf(TypeKind::Integer));
static REAL: Lazy<Type> = Lazy::new(|| Type::leaf(TypeKind::Real));
static STRING: Lazy<Type> = Lazy::new(|| Type::leaf(TypeKind::String));
static SOURCE_LOCATION: Lazy<Type> = Lazy::new(|| Type::leaf(TypeKind::SourceLocation));

/// A canonical type.
///
/// Cloning is O(1). Two types are equal iff they are the same instance.
#[derive(Clone)]
pub struct Type(Arc<TypeKind>);

/// The structural shape of a type.
///
/// Component types are already canonical, so deriving `Eq`/`Hash` here
/// compares components by identity. This is the interning key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// The universal supertype.
    Value,
    /// The empty type, a subtype of everything.
    Void,
    /// 64-bit signed integers.
    Integer,
    /// 64-bit floating point numbers.
    Real,
    /// Strings.
    String,
    /// Source locations.
    SourceLocation,
    /// An opaque, externally defined kind. Its own subtyping is not imported.
    Object(Arc<str>),
    /// Fixed-arity tuple with optionally labeled fields.
    Tuple(Arc<[Field]>),
    /// Homogeneous list.
    List(Type),
    /// Homogeneous set. A set of tuples is a relation.
    Set(Type),
    /// Map with optionally labeled key and value.
    Map {
        /// Key type and label.
        key: Field,
        /// Value type and label.
        value: Field,
    },
    /// A nominal alias of another type.
    Named {
        /// Alias name.
        name: Arc<str>,
        /// The aliased type.
        aliased: Type,
    },
    /// An abstract algebraic sort.
    Sort(Arc<str>),
    /// One alternative of a sort.
    Constructor {
        /// Constructor name; `None` for the anonymous constructor.
        name: Option<Arc<str>>,
        /// The sort this constructor belongs to.
        sort: Type,
        /// The children, always a tuple type.
        children: Type,
    },
}

/// A tuple field, map key or map value: a type with an optional label.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Field {
    /// The field type.
    pub ty: Type,
    /// The field label, metadata only for subtyping and lub.
    pub label: Option<Arc<str>>,
}

impl Field {
    /// Creates an unlabeled field.
    #[must_use]
    pub fn new(ty: Type) -> Self {
        Self { ty, label: None }
    }

    /// Creates a labeled field.
    #[must_use]
    pub fn labeled(ty: Type, label: &str) -> Self {
        Self {
            ty,
            label: Some(label.into()),
        }
    }

    /// Returns the label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Type {
    fn leaf(kind: TypeKind) -> Self {
        Self(Arc::new(kind))
    }

    /// Wraps a freshly built shape. Only the universe calls this.
    pub(crate) fn from_node(node: Arc<TypeKind>) -> Self {
        Self(node)
    }

    /// Returns the shared instance for a leaf shape, if `kind` is a leaf.
    pub(crate) fn shared_leaf(kind: &TypeKind) -> Option<Self> {
        match kind {
            TypeKind::Value => Some(Self::value()),
            TypeKind::Void => Some(Self::void()),
            TypeKind::Integer => Some(Self::integer()),
            TypeKind::Real => Some(Self::real()),
            TypeKind::String => Some(Self::string()),
            TypeKind::SourceLocation => Some(Self::source_location()),
            _ => None,
        }
    }

    /// The universal supertype.
    #[must_use]
    pub fn value() -> Self {
        VALUE.clone()
    }

    /// The bottom type.
    #[must_use]
    pub fn void() -> Self {
        VOID.clone()
    }

    /// The integer type.
    #[must_use]
    pub fn integer() -> Self {
        INTEGER.clone()
    }

    /// The real type.
    #[must_use]
    pub fn real() -> Self {
        REAL.clone()
    }

    /// The string type.
    #[must_use]
    pub fn string() -> Self {
        STRING.clone()
    }

    /// The source location type.
    #[must_use]
    pub fn source_location() -> Self {
        SOURCE_LOCATION.clone()
    }

    /// Returns the shape of this type.
    #[must_use]
    pub fn kind(&self) -> &TypeKind {
        &self.0
    }

    /// Follows aliases down to the first non-alias type.
    #[must_use]
    pub fn resolved(&self) -> &Type {
        let mut current = self;
        while let TypeKind::Named { aliased, .. } = current.kind() {
            current = aliased;
        }
        current
    }

    /// Returns true if this is the universal supertype.
    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self.kind(), TypeKind::Value)
    }

    /// Returns true if this is the bottom type.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self.kind(), TypeKind::Void)
    }

    /// Returns true if this is (an alias of) a tuple type.
    #[must_use]
    pub fn is_tuple(&self) -> bool {
        matches!(self.resolved().kind(), TypeKind::Tuple(_))
    }

    /// Returns true if this is (an alias of) a list type.
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self.resolved().kind(), TypeKind::List(_))
    }

    /// Returns true if this is (an alias of) a set type, relations included.
    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self.resolved().kind(), TypeKind::Set(_))
    }

    /// Returns true if this is a set whose elements are tuples.
    #[must_use]
    pub fn is_relation(&self) -> bool {
        match self.resolved().kind() {
            TypeKind::Set(element) => element.is_tuple(),
            _ => false,
        }
    }

    /// Returns true if this is a list whose elements are tuples.
    #[must_use]
    pub fn is_list_relation(&self) -> bool {
        match self.resolved().kind() {
            TypeKind::List(element) => element.is_tuple(),
            _ => false,
        }
    }

    /// Returns true if this is (an alias of) a map type.
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self.resolved().kind(), TypeKind::Map { .. })
    }

    /// Returns true if this is a named alias.
    #[must_use]
    pub fn is_named(&self) -> bool {
        matches!(self.kind(), TypeKind::Named { .. })
    }

    /// Returns true if this is (an alias of) a sort.
    #[must_use]
    pub fn is_sort(&self) -> bool {
        matches!(self.resolved().kind(), TypeKind::Sort(_))
    }

    /// Returns true if this is (an alias of) a constructor type.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        matches!(self.resolved().kind(), TypeKind::Constructor { .. })
    }

    /// Returns the name of a named type, sort or constructor.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self.kind() {
            TypeKind::Named { name, .. } | TypeKind::Sort(name) => Some(name.as_ref()),
            TypeKind::Constructor { name, .. } => name.as_deref(),
            TypeKind::Object(kind) => Some(kind.as_ref()),
            _ => None,
        }
    }

    /// Returns the aliased type of a named type.
    #[must_use]
    pub fn aliased(&self) -> Option<&Type> {
        match self.kind() {
            TypeKind::Named { aliased, .. } => Some(aliased),
            _ => None,
        }
    }

    /// Returns the element type of a list or set.
    #[must_use]
    pub fn element_type(&self) -> Option<&Type> {
        match self.resolved().kind() {
            TypeKind::List(element) | TypeKind::Set(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the key type of a map.
    #[must_use]
    pub fn key_type(&self) -> Option<&Type> {
        match self.resolved().kind() {
            TypeKind::Map { key, .. } => Some(&key.ty),
            _ => None,
        }
    }

    /// Returns the value type of a map.
    #[must_use]
    pub fn map_value_type(&self) -> Option<&Type> {
        match self.resolved().kind() {
            TypeKind::Map { value, .. } => Some(&value.ty),
            _ => None,
        }
    }

    /// Returns the key label of a map.
    #[must_use]
    pub fn key_label(&self) -> Option<&str> {
        match self.resolved().kind() {
            TypeKind::Map { key, .. } => key.label(),
            _ => None,
        }
    }

    /// Returns the value label of a map.
    #[must_use]
    pub fn value_label(&self) -> Option<&str> {
        match self.resolved().kind() {
            TypeKind::Map { value, .. } => value.label(),
            _ => None,
        }
    }

    /// Returns the sort of a constructor type.
    #[must_use]
    pub fn sort(&self) -> Option<&Type> {
        match self.resolved().kind() {
            TypeKind::Constructor { sort, .. } => Some(sort),
            _ => None,
        }
    }

    /// Returns the children tuple type of a constructor type.
    #[must_use]
    pub fn children(&self) -> Option<&Type> {
        match self.resolved().kind() {
            TypeKind::Constructor { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Returns the fields of a tuple, of a constructor's children, or of the
    /// element tuple of a relation or list relation. Empty for every other
    /// type.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        match self.resolved().kind() {
            TypeKind::Tuple(fields) => &fields[..],
            TypeKind::Constructor { children, .. } => children.fields(),
            TypeKind::Set(element) | TypeKind::List(element) if element.is_tuple() => {
                element.fields()
            }
            _ => &[],
        }
    }

    /// Returns the number of fields (see [`Type::fields`]).
    #[must_use]
    pub fn arity(&self) -> usize {
        self.fields().len()
    }

    /// Returns the type of the field at `index`.
    #[must_use]
    pub fn field_type(&self, index: usize) -> Option<&Type> {
        self.fields().get(index).map(|field| &field.ty)
    }

    /// Returns the label of the field at `index`.
    #[must_use]
    pub fn field_label(&self, index: usize) -> Option<&str> {
        self.fields().get(index).and_then(Field::label)
    }

    /// Returns the index of the field labeled `label`.
    #[must_use]
    pub fn field_index(&self, label: &str) -> Option<usize> {
        self.fields()
            .iter()
            .position(|field| field.label() == Some(label))
    }

    /// Returns true if any field carries a label.
    #[must_use]
    pub fn has_field_labels(&self) -> bool {
        self.fields().iter().any(|field| field.label.is_some())
    }

    /// Checks whether `self` is a subtype of `other`.
    ///
    /// - everything is a subtype of `value`, `void` is a subtype of everything
    /// - an alias is a subtype of whatever its aliased type is a subtype of;
    ///   only the alias itself (or an alias of it) is a subtype of an alias
    /// - lists, sets and maps are covariant in every parameter
    /// - tuples are covariant per position and require equal arity
    /// - constructors require the same name and sort, covariant children
    /// - a constructor is a subtype of its sort
    /// - labels never matter
    #[must_use]
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        if self == other {
            return true;
        }

        match (self.kind(), other.kind()) {
            (_, TypeKind::Value) | (TypeKind::Void, _) => true,
            (TypeKind::Named { aliased, .. }, _) => aliased.is_subtype_of(other),
            (_, TypeKind::Named { .. }) => false,
            (TypeKind::Tuple(a), TypeKind::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.ty.is_subtype_of(&y.ty))
            }
            (TypeKind::List(a), TypeKind::List(b)) | (TypeKind::Set(a), TypeKind::Set(b)) => {
                a.is_subtype_of(b)
            }
            (
                TypeKind::Map { key: ak, value: av },
                TypeKind::Map { key: bk, value: bv },
            ) => ak.ty.is_subtype_of(&bk.ty) && av.ty.is_subtype_of(&bv.ty),
            (
                TypeKind::Constructor {
                    name: an,
                    sort: asort,
                    children: ac,
                },
                TypeKind::Constructor {
                    name: bn,
                    sort: bsort,
                    children: bc,
                },
            ) => an == bn && asort == bsort && ac.is_subtype_of(bc),
            (TypeKind::Constructor { sort, .. }, TypeKind::Sort(_)) => sort == other,
            _ => false,
        }
    }

    /// Returns true if either type is a subtype of the other.
    #[must_use]
    pub fn comparable(&self, other: &Type) -> bool {
        self.is_subtype_of(other) || other.is_subtype_of(self)
    }

    /// Structural equality with labels erased.
    ///
    /// Two map types that differ only in key/value labels are equivalent
    /// but not equal.
    #[must_use]
    pub fn equivalent(&self, other: &Type) -> bool {
        if self == other {
            return true;
        }

        match (self.kind(), other.kind()) {
            (TypeKind::Tuple(a), TypeKind::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.ty.equivalent(&y.ty))
            }
            (TypeKind::List(a), TypeKind::List(b)) | (TypeKind::Set(a), TypeKind::Set(b)) => {
                a.equivalent(b)
            }
            (
                TypeKind::Map { key: ak, value: av },
                TypeKind::Map { key: bk, value: bv },
            ) => ak.ty.equivalent(&bk.ty) && av.ty.equivalent(&bv.ty),
            (
                TypeKind::Constructor {
                    name: an,
                    sort: asort,
                    children: ac,
                },
                TypeKind::Constructor {
                    name: bn,
                    sort: bsort,
                    children: bc,
                },
            ) => an == bn && asort == bsort && ac.equivalent(bc),
            _ => false,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[Field]) -> fmt::Result {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", field.ty)?;
        if let Some(label) = field.label() {
            write!(f, " {label}")?;
        }
    }
    Ok(())
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            TypeKind::Value => write!(f, "value"),
            TypeKind::Void => write!(f, "void"),
            TypeKind::Integer => write!(f, "int"),
            TypeKind::Real => write!(f, "real"),
            TypeKind::String => write!(f, "str"),
            TypeKind::SourceLocation => write!(f, "loc"),
            TypeKind::Object(kind) => write!(f, "object[{kind}]"),
            TypeKind::Tuple(fields) => {
                write!(f, "tuple[")?;
                write_fields(f, fields)?;
                write!(f, "]")
            }
            TypeKind::List(element) => match element.kind() {
                TypeKind::Tuple(fields) => {
                    write!(f, "lrel[")?;
                    write_fields(f, fields)?;
                    write!(f, "]")
                }
                _ => write!(f, "list[{element}]"),
            },
            TypeKind::Set(element) => match element.kind() {
                TypeKind::Tuple(fields) => {
                    write!(f, "rel[")?;
                    write_fields(f, fields)?;
                    write!(f, "]")
                }
                _ => write!(f, "set[{element}]"),
            },
            TypeKind::Map { key, value } => {
                write!(f, "map[")?;
                write_fields(f, &[key.clone(), value.clone()])?;
                write!(f, "]")
            }
            TypeKind::Named { name, .. } | TypeKind::Sort(name) => write!(f, "{name}"),
            TypeKind::Constructor {
                name,
                sort,
                children,
            } => {
                write!(f, "{sort}")?;
                if let Some(name) = name {
                    write!(f, ".{name}")?;
                }
                write!(f, "(")?;
                write_fields(f, children.fields())?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
