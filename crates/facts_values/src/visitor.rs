//! Generic traversal over the closed set of value kinds.

use crate::constructor::Constructor;
use crate::list::{List, ListRelation};
use crate::map::Map;
use crate::set::{Relation, Set};
use crate::tuple::Tuple;
use crate::value::{ObjectValue, SourceLocation};

/// One case per value kind, dispatched by [`Value::accept`](crate::Value::accept).
///
/// Sets whose elements are tuples arrive at [`visit_relation`](Self::visit_relation),
/// which falls back to [`visit_set`](Self::visit_set) unless overridden. Lists
/// of tuples likewise arrive at [`visit_list_relation`](Self::visit_list_relation).
pub trait ValueVisitor {
    /// The result of visiting one value.
    type Output;

    /// Visits an integer.
    fn visit_integer(&mut self, value: i64) -> Self::Output;
    /// Visits a real.
    fn visit_real(&mut self, value: f64) -> Self::Output;
    /// Visits a string.
    fn visit_string(&mut self, value: &str) -> Self::Output;
    /// Visits a source location.
    fn visit_source_location(&mut self, value: &SourceLocation) -> Self::Output;
    /// Visits an opaque object.
    fn visit_object(&mut self, value: &ObjectValue) -> Self::Output;
    /// Visits a tuple.
    fn visit_tuple(&mut self, value: &Tuple) -> Self::Output;
    /// Visits a list that is not a list relation.
    fn visit_list(&mut self, value: &List) -> Self::Output;
    /// Visits a list relation.
    fn visit_list_relation(&mut self, value: &ListRelation) -> Self::Output {
        self.visit_list(value.as_list())
    }
    /// Visits a set that is not a relation.
    fn visit_set(&mut self, value: &Set) -> Self::Output;
    /// Visits a relation.
    fn visit_relation(&mut self, value: &Relation) -> Self::Output {
        self.visit_set(value.as_set())
    }
    /// Visits a map.
    fn visit_map(&mut self, value: &Map) -> Self::Output;
    /// Visits a constructor node.
    fn visit_constructor(&mut self, value: &Constructor) -> Self::Output;
}
