//! Immutable, type-checked values for facts.
//!
//! This crate provides:
//! - [`Value`] - Leaf values and the composite kinds [`Tuple`], [`List`],
//!   [`ListRelation`], [`Set`], [`Relation`], [`Map`] and [`Constructor`]
//! - [`ValueFactory`] - Creates values and writers over a type universe
//! - [`ListWriter`], [`SetWriter`], [`MapWriter`] - Single-owner builders
//!   that seal into immutable values
//! - [`ValueVisitor`] - One case per value kind
//!
//! Updates never modify a value. They return a successor that shares every
//! unaffected part with its predecessor.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod constructor;
pub mod factory;
pub mod list;
pub mod map;
pub mod set;
pub mod tuple;
pub mod value;
pub mod visitor;
pub mod writer;

pub use constructor::{Annotations, Constructor};
pub use factory::ValueFactory;
pub use list::{List, ListRelation};
pub use map::Map;
pub use set::{Relation, Set};
pub use tuple::Tuple;
pub use value::{LinePosition, ObjectValue, SourceLocation, Value};
pub use visitor::ValueVisitor;
pub use writer::{ListWriter, MapWriter, SetWriter};
