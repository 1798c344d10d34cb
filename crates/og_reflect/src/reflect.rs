use alloc::vec::Vec;
use core::any::Any;
use core::fmt::Debug;

use crate::{ReflectError, Value};

// -----------------------------------------------------------------------------
// Reflect

/// Ordered field access for an object.
///
/// This is the only view of an object the codec uses: it never inspects
/// memory layout or constructors, it reads [`fields`](Reflect::fields) when
/// encoding and calls [`set_field`](Reflect::set_field) on a blank instance
/// when decoding.
///
/// Usually implemented through [`impl_reflect!`](crate::impl_reflect).
pub trait Reflect: Any + Debug {
    /// The name under which this type is registered in a
    /// [`TypeRegistry`](crate::TypeRegistry).
    fn type_name(&self) -> &str;

    /// Declared fields as `(name, value)` pairs, in a stable order.
    fn fields(&self) -> Vec<(&str, Value)>;

    /// Assigns a single field.
    ///
    /// Called on a blank instance once per property, in wire order.
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), ReflectError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// -----------------------------------------------------------------------------
// Typed

/// A [`Reflect`] type with a static name and a blank constructor.
///
/// `blank` must not run any construction logic with side effects: the
/// returned instance is registered for back-references before its fields
/// are assigned, and may be observed in that partial state by the rest of
/// the graph being rebuilt.
pub trait Typed: Reflect + Sized {
    const TYPE_NAME: &'static str;

    fn blank() -> Self;
}
