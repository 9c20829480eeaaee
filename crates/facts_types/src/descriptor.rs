//! A plain, serializable description of a type.
//!
//! Codecs persist and transmit types as [`TypeDescriptor`]s instead of
//! depending on the interned representation. Converting a descriptor back
//! into a [`Type`] re-declares any aliases, sorts and constructors it names.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Field, Type, TypeKind};
use crate::universe::TypeUniverse;

/// A tagged record describing one type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeDescriptor {
    /// The universal supertype.
    Value,
    /// The bottom type.
    Void,
    /// Integers.
    Integer,
    /// Reals.
    Real,
    /// Strings.
    String,
    /// Source locations.
    SourceLocation,
    /// An opaque external kind.
    Object {
        /// Kind name.
        kind: String,
    },
    /// A tuple type.
    Tuple {
        /// Fields in order.
        fields: Vec<FieldDescriptor>,
    },
    /// A list type.
    List {
        /// Element type.
        element: Box<TypeDescriptor>,
    },
    /// A set (or relation) type.
    Set {
        /// Element type.
        element: Box<TypeDescriptor>,
    },
    /// A map type.
    Map {
        /// Key type and label.
        key: Box<FieldDescriptor>,
        /// Value type and label.
        value: Box<FieldDescriptor>,
    },
    /// A named alias.
    Named {
        /// Alias name.
        name: String,
        /// The aliased type.
        aliased: Box<TypeDescriptor>,
    },
    /// An algebraic sort.
    Sort {
        /// Sort name.
        name: String,
    },
    /// A constructor of a sort.
    Constructor {
        /// Constructor name, absent for the anonymous constructor.
        name: Option<String>,
        /// Sort name.
        sort: String,
        /// Children fields.
        children: Vec<FieldDescriptor>,
    },
}

/// A described field: a type and an optional label.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldDescriptor {
    /// Field type.
    pub ty: TypeDescriptor,
    /// Field label.
    pub label: Option<String>,
}

impl FieldDescriptor {
    fn of(field: &Field) -> Self {
        Self {
            ty: field.ty.descriptor(),
            label: field.label().map(str::to_string),
        }
    }
}

impl Type {
    /// Describes this type.
    #[must_use]
    pub fn descriptor(&self) -> TypeDescriptor {
        match self.kind() {
            TypeKind::Value => TypeDescriptor::Value,
            TypeKind::Void => TypeDescriptor::Void,
            TypeKind::Integer => TypeDescriptor::Integer,
            TypeKind::Real => TypeDescriptor::Real,
            TypeKind::String => TypeDescriptor::String,
            TypeKind::SourceLocation => TypeDescriptor::SourceLocation,
            TypeKind::Object(kind) => TypeDescriptor::Object {
                kind: kind.to_string(),
            },
            TypeKind::Tuple(fields) => TypeDescriptor::Tuple {
                fields: fields.iter().map(FieldDescriptor::of).collect(),
            },
            TypeKind::List(element) => TypeDescriptor::List {
                element: Box::new(element.descriptor()),
            },
            TypeKind::Set(element) => TypeDescriptor::Set {
                element: Box::new(element.descriptor()),
            },
            TypeKind::Map { key, value } => TypeDescriptor::Map {
                key: Box::new(FieldDescriptor::of(key)),
                value: Box::new(FieldDescriptor::of(value)),
            },
            TypeKind::Named { name, aliased } => TypeDescriptor::Named {
                name: name.to_string(),
                aliased: Box::new(aliased.descriptor()),
            },
            TypeKind::Sort(name) => TypeDescriptor::Sort {
                name: name.to_string(),
            },
            TypeKind::Constructor {
                name,
                sort,
                children,
            } => TypeDescriptor::Constructor {
                name: name.as_deref().map(str::to_string),
                sort: sort.name().unwrap_or_default().to_string(),
                children: children.fields().iter().map(FieldDescriptor::of).collect(),
            },
        }
    }
}

impl TypeUniverse {
    /// Rebuilds the type a descriptor describes.
    ///
    /// Aliases, sorts and constructors are declared on the way, so a
    /// descriptor that conflicts with existing declarations fails with a
    /// declaration error.
    pub fn from_descriptor(&self, descriptor: &TypeDescriptor) -> Result<Type> {
        let ty = match descriptor {
            TypeDescriptor::Value => Type::value(),
            TypeDescriptor::Void => Type::void(),
            TypeDescriptor::Integer => Type::integer(),
            TypeDescriptor::Real => Type::real(),
            TypeDescriptor::String => Type::string(),
            TypeDescriptor::SourceLocation => Type::source_location(),
            TypeDescriptor::Object { kind } => self.object_type(kind),
            TypeDescriptor::Tuple { fields } => {
                let fields = self.fields_from(fields)?;
                self.tuple_type_of(fields)
            }
            TypeDescriptor::List { element } => {
                let element = self.from_descriptor(element)?;
                self.list_type(element)
            }
            TypeDescriptor::Set { element } => {
                let element = self.from_descriptor(element)?;
                self.set_type(element)
            }
            TypeDescriptor::Map { key, value } => {
                let key = self.field_from(key)?;
                let value = self.field_from(value)?;
                self.canonical(TypeKind::Map { key, value })
            }
            TypeDescriptor::Named { name, aliased } => {
                let aliased = self.from_descriptor(aliased)?;
                self.declare_alias(name, aliased)?
            }
            TypeDescriptor::Sort { name } => self.declare_sort(name)?,
            TypeDescriptor::Constructor {
                name,
                sort,
                children,
            } => {
                let sort = self.declare_sort(sort)?;
                let fields = self.fields_from(children)?;
                let children = self.tuple_type_of(fields);
                self.declare_constructor(&sort, name.as_deref(), children)?
            }
        };
        Ok(ty)
    }

    fn field_from(&self, field: &FieldDescriptor) -> Result<Field> {
        Ok(Field {
            ty: self.from_descriptor(&field.ty)?,
            label: field.label.as_deref().map(Into::into),
        })
    }

    fn fields_from(&self, fields: &[FieldDescriptor]) -> Result<Vec<Field>> {
        fields.iter().map(|field| self.field_from(field)).collect()
    }
}
