//! Value model and property enumeration for object graphs.
//!
//! # Overview
//!
//! - [`Value`]: the in-memory value graph. Scalars and containers are held
//!   inline; objects are held in a [`Heap`] and referenced by [`ObjectId`],
//!   so two values refer to the same object exactly when their ids are equal.
//! - [`Reflect`]: ordered field access for objects. This is all the codec
//!   knows about an object.
//! - [`Typed`] and [`TypeRegistry`]: allocation of blank instances by type
//!   name, used when rebuilding a graph.
//! - [`DynamicObject`]: a reflective object whose fields are whatever was
//!   set on it, for types that only exist as a name and a shape.
//! - [`impl_reflect!`]: implements [`Reflect`] and [`Typed`] for a plain
//!   struct.
//!
//! # Examples
//!
//! ```
//! use og_reflect::{Heap, ObjectId, Reflect, Value, impl_reflect};
//!
//! #[derive(Debug, Default)]
//! struct Node {
//!     name: String,
//!     next: Option<ObjectId>,
//! }
//!
//! impl_reflect!(Node as "Node" {
//!     "name" => name,
//!     "next" => next,
//! });
//!
//! let mut heap = Heap::new();
//! let id = heap.insert(Node { name: "a".into(), next: None });
//! heap.downcast_mut::<Node>(id).unwrap().next = Some(id);
//!
//! let fields = heap.get(id).unwrap().fields();
//! assert_eq!(fields[1], ("next", Value::Object(id)));
//! ```
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod convert;
mod dynamic;
mod error;
mod heap;
mod macros;
mod reflect;
mod registry;
mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use convert::{FromValue, ToValue};
pub use dynamic::DynamicObject;
pub use error::ReflectError;
pub use heap::{Heap, ObjectId};
pub use reflect::{Reflect, Typed};
pub use registry::TypeRegistry;
pub use value::{Opaque, OpaqueKind, Value};
