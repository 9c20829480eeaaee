//! Integration tests for Layer 0: Types
//!
//! Tests for canonical interning, the subtype lattice, declarations and errors.

mod declarations;
mod errors;
mod lattice;
