//! Shared containers for the object-graph crates.
//!
//! - [`hash`]: fixed-seed hashing and `hashbrown` based maps.
//! - [`OrderedMap`]: an insertion-ordered map, used wherever key order is part
//!   of the output (object properties, associative containers).
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod ordered;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use ordered::{OrderedMap, ordered_eq};
