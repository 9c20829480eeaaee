//! The entry point for creating values.

use std::any::Any;
use std::sync::Arc;

use facts_types::{Error, Result, Type, TypeUniverse};

use crate::constructor::Constructor;
use crate::list::List;
use crate::map::Map;
use crate::set::Set;
use crate::tuple::{Tuple, runtime_types};
use crate::value::{ObjectValue, SourceLocation, Value};
use crate::writer::{ListWriter, MapWriter, SetWriter};

/// Creates values whose types live in one [`TypeUniverse`].
#[derive(Clone, Default)]
pub struct ValueFactory {
    universe: TypeUniverse,
}

impl ValueFactory {
    /// Creates a factory over `universe`.
    #[must_use]
    pub fn new(universe: TypeUniverse) -> Self {
        Self { universe }
    }

    /// The universe types are interned in.
    #[must_use]
    pub fn universe(&self) -> &TypeUniverse {
        &self.universe
    }

    /// An integer value.
    #[must_use]
    pub fn integer(&self, n: i64) -> Value {
        Value::Integer(n)
    }

    /// A real value.
    #[must_use]
    pub fn real(&self, n: f64) -> Value {
        Value::Real(n)
    }

    /// A string value.
    #[must_use]
    pub fn string(&self, s: &str) -> Value {
        Value::String(s.into())
    }

    /// A source location without line information.
    #[must_use]
    pub fn source_location(&self, path: &str, offset: usize, length: usize) -> Value {
        Value::SourceLocation(SourceLocation::new(path, offset, length))
    }

    /// Wraps an external payload as a value of object kind `kind`.
    #[must_use]
    pub fn object<T: Any + Send + Sync>(&self, kind: &str, payload: T) -> Value {
        let ty = self.universe.object_type(kind);
        Value::Object(ObjectValue::new(ty, Arc::new(payload)))
    }

    /// A tuple typed by the runtime types of its fields.
    #[must_use]
    pub fn tuple(&self, fields: Vec<Value>) -> Tuple {
        let ty = self.universe.tuple_type(&runtime_types(&fields));
        Tuple::from_parts(ty, fields.into())
    }

    /// A tuple of a declared (possibly labeled) tuple type.
    pub fn tuple_of(&self, ty: &Type, fields: Vec<Value>) -> Result<Tuple> {
        Tuple::checked(&self.universe, ty, fields).map_err(|e| e.in_operation("tuple_of"))
    }

    /// A writer for `list[element]`.
    #[must_use]
    pub fn list_writer(&self, element: Type) -> ListWriter {
        ListWriter::new(self.universe.list_type(element))
    }

    /// A writer for `lrel[fields...]`.
    #[must_use]
    pub fn list_relation_writer(&self, fields: &[Type]) -> ListWriter {
        ListWriter::new(self.universe.list_relation_type(fields))
    }

    /// A writer for `set[element]`, a relation writer if `element` is a
    /// tuple type.
    #[must_use]
    pub fn set_writer(&self, element: Type) -> SetWriter {
        SetWriter::new(self.universe.set_type(element))
    }

    /// A writer for a declared set or relation type, labels included.
    pub fn set_writer_of(&self, ty: &Type) -> Result<SetWriter> {
        if ty.resolved().is_set() {
            Ok(SetWriter::new(ty.clone()))
        } else {
            Err(Error::unsupported("set_writer_of", ty.clone()))
        }
    }

    /// A writer for `rel[fields...]`.
    #[must_use]
    pub fn relation_writer(&self, fields: &[Type]) -> SetWriter {
        SetWriter::new(self.universe.relation_type(fields))
    }

    /// A writer for `map[key, value]`.
    #[must_use]
    pub fn map_writer(&self, key: Type, value: Type) -> MapWriter {
        MapWriter::new(self.universe.map_type(key, value))
    }

    /// A writer for a declared map type, labels included.
    pub fn map_writer_of(&self, ty: &Type) -> Result<MapWriter> {
        if ty.resolved().is_map() {
            Ok(MapWriter::new(ty.clone()))
        } else {
            Err(Error::unsupported("map_writer_of", ty.clone()))
        }
    }

    /// An empty `list[element]`.
    #[must_use]
    pub fn empty_list(&self, element: Type) -> List {
        List::empty(self.universe.list_type(element))
    }

    /// An empty `set[element]`.
    #[must_use]
    pub fn empty_set(&self, element: Type) -> Set {
        Set::empty(self.universe.set_type(element))
    }

    /// An empty `map[key, value]`.
    #[must_use]
    pub fn empty_map(&self, key: Type, value: Type) -> Map {
        Map::empty(self.universe.map_type(key, value))
    }

    /// A list of `elements`, typed by the lub of their runtime types.
    #[must_use]
    pub fn list(&self, elements: &[Value]) -> List {
        let element = self.universe.lub_all(&runtime_types(elements));
        List::from_parts(self.universe.list_type(element), elements.iter().cloned().collect())
    }

    /// A set of `elements`, typed by the lub of their runtime types.
    #[must_use]
    pub fn set(&self, elements: &[Value]) -> Set {
        let element = self.universe.lub_all(&runtime_types(elements));
        Set::from_parts(self.universe.set_type(element), elements.iter().cloned().collect())
    }

    /// A node of constructor type `ty`.
    pub fn constructor(&self, ty: &Type, children: Vec<Value>) -> Result<Constructor> {
        Constructor::checked(&self.universe, ty, children).map_err(|e| e.in_operation("constructor"))
    }

    /// A node of the constructor of `sort` called `name` whose declared
    /// children accept `children`. Overloads are tried in declaration order.
    pub fn constructor_named(
        &self,
        sort: &Type,
        name: &str,
        children: Vec<Value>,
    ) -> Result<Constructor> {
        let mut last_error = None;
        for ty in self.universe.lookup_constructor(sort, name) {
            match Constructor::check_children(&self.universe, &ty, &children) {
                Ok(()) => return Ok(Constructor::unchecked(ty, children)),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error
            .unwrap_or_else(|| Error::label_not_found(name, sort.clone()))
            .in_operation("constructor_named"))
    }
}
