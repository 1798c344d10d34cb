use alloc::boxed::Box;
use alloc::string::String;

use og_utils::hash::HashMap;

use crate::{DynamicObject, Reflect, Typed};

// -----------------------------------------------------------------------------
// Allocator

/// How a registered type produces a blank instance.
#[derive(Clone, Copy)]
enum Allocator {
    /// A static type; calls [`Typed::blank`].
    Typed(fn() -> Box<dyn Reflect>),
    /// A shape-only type; allocates an empty [`DynamicObject`].
    Dynamic,
}

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of types that can be rebuilt by name.
///
/// Decoding a graph needs to turn a type name back into an instance.
/// The registry maps names to blank allocators; anything not registered
/// is reported as an unknown type by the decoder.
///
/// # Example
///
/// ```
/// use og_reflect::{Reflect, TypeRegistry, impl_reflect};
///
/// #[derive(Debug, Default)]
/// struct User {
///     name: String,
/// }
/// impl_reflect!(User as "User" { "name" => name });
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<User>();
/// registry.register_dynamic("Comment");
///
/// let user = registry.allocate("User").unwrap();
/// assert_eq!(user.type_name(), "User");
///
/// let comment = registry.allocate("Comment").unwrap();
/// assert_eq!(comment.type_name(), "Comment");
///
/// assert!(registry.allocate("Missing").is_none());
/// ```
#[derive(Clone, Default)]
pub struct TypeRegistry {
    allocators: HashMap<String, Allocator>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    // - If the name already exist, the function will do nothing and return `false`.
    // - If the name does not exist, the function will insert value and return `true`.
    fn register_internal(&mut self, name: &str, allocator: Allocator) -> bool {
        if self.allocators.contains_key(name) {
            return false;
        }
        log::trace!("registering type `{name}`");
        self.allocators.insert(String::from(name), allocator);
        true
    }

    /// Registers `T` under [`Typed::TYPE_NAME`].
    ///
    /// Returns `false` and keeps the existing entry if the name is taken.
    #[inline]
    pub fn register<T: Typed>(&mut self) -> bool {
        self.register_internal(T::TYPE_NAME, Allocator::Typed(|| Box::new(T::blank())))
    }

    /// Registers a type that is rebuilt as a [`DynamicObject`].
    ///
    /// Returns `false` and keeps the existing entry if the name is taken.
    #[inline]
    pub fn register_dynamic(&mut self, name: impl AsRef<str>) -> bool {
        self.register_internal(name.as_ref(), Allocator::Dynamic)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.allocators.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.allocators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.allocators.is_empty()
    }

    /// Allocates a blank instance of the named type.
    ///
    /// Returns `None` if the name was never registered.
    pub fn allocate(&self, name: &str) -> Option<Box<dyn Reflect>> {
        match self.allocators.get(name)? {
            Allocator::Typed(func) => Some(func()),
            Allocator::Dynamic => Some(Box::new(DynamicObject::new(name))),
        }
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut names: alloc::vec::Vec<&str> = self.allocators.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("TypeRegistry").field("types", &names).finish()
    }
}
