//! Facts - immutable, strongly-typed algebraic values
//!
//! This crate re-exports all layers of the facts system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: facts_values  Tuples, lists, sets, relations, maps, constructors, writers
//! Layer 0: facts_types   Type lattice, declarations, errors
//!          facts_trie    Persistent hash-trie multimap and set
//! ```

pub use facts_trie as trie;
pub use facts_types as types;
pub use facts_values as values;
