//! Persistent hash-array-mapped tries for facts.
//!
//! This crate provides:
//! - [`TrieMultimap`] - A persistent map from keys to sets of values
//! - [`TrieSet`] - The membership-only view used for set values
//!
//! Both are immutable: updates return new versions that share every
//! untouched subtree with the previous one.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod multimap;
mod node;
pub mod set;

pub use multimap::{DefaultState, Iter, TrieMultimap};
pub use set::TrieSet;
