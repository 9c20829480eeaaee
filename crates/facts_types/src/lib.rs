//! Canonical structural types for facts.
//!
//! This crate provides:
//! - [`Type`] - Interned type descriptors with identity equality
//! - [`TypeUniverse`] - The canonicalizing type factory and declaration registry
//! - [`TypeDescriptor`] - A serializable description of any type
//! - [`Error`] - Rich error types with context
//!
//! Subtyping ([`Type::is_subtype_of`]) and least upper bounds
//! ([`TypeUniverse::lub`]) make the types a lattice with `value` on top and
//! `void` at the bottom.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod descriptor;
pub mod error;
mod lattice;
pub mod registry;
pub mod types;
pub mod universe;

pub use descriptor::{FieldDescriptor, TypeDescriptor};
pub use error::{DeclarationError, Error, ErrorContext, ErrorKind, Result, ResultKind};
pub use registry::is_identifier;
pub use types::{Field, Type, TypeKind};
pub use universe::{TypeUniverse, UniverseConfig};
