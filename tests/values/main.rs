//! Integration tests for Layer 1: Values
//!
//! Tests for tuples, collections, constructors, writers and randomly
//! generated values of randomly generated types.

mod collections;
mod constructors;
mod random;
mod writers;
