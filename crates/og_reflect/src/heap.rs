use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::Reflect;

// -----------------------------------------------------------------------------
// ObjectId

/// A stable handle to an object stored in a [`Heap`].
///
/// Ids are only meaningful for the heap that issued them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(usize);

impl ObjectId {
    /// Creates an id from a raw arena index.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// -----------------------------------------------------------------------------
// Heap

/// An arena owning every object of a value graph.
///
/// Objects reference each other through [`ObjectId`]s stored in their fields,
/// so cycles need no shared ownership. An object, once inserted, keeps its id
/// until the heap is truncated below it.
///
/// # Examples
///
/// ```
/// use og_reflect::{DynamicObject, Heap, Reflect, Value};
///
/// let mut heap = Heap::new();
/// let a = heap.insert(DynamicObject::new("A"));
/// heap.downcast_mut::<DynamicObject>(a)
///     .unwrap()
///     .insert("me", Value::Object(a));
///
/// assert_eq!(heap.len(), 1);
/// assert_eq!(heap.get(a).unwrap().type_name(), "A");
/// ```
#[derive(Default)]
pub struct Heap {
    objects: Vec<Box<dyn Reflect>>,
}

impl Heap {
    /// Creates an empty heap.
    #[inline]
    pub const fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Moves `object` into the heap and returns its id.
    #[inline]
    pub fn insert<T: Reflect>(&mut self, object: T) -> ObjectId {
        self.insert_boxed(Box::new(object))
    }

    /// Moves an already boxed object into the heap and returns its id.
    pub fn insert_boxed(&mut self, object: Box<dyn Reflect>) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(object);
        id
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        id.0 < self.objects.len()
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&dyn Reflect> {
        self.objects.get(id.0).map(|obj| &**obj)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut (dyn Reflect + 'static)> {
        self.objects.get_mut(id.0).map(|obj| &mut **obj)
    }

    /// Returns the object as a `T`, if it is one.
    #[inline]
    pub fn downcast_ref<T: Reflect>(&self, id: ObjectId) -> Option<&T> {
        self.get(id)?.as_any().downcast_ref::<T>()
    }

    /// Returns the object as a mutable `T`, if it is one.
    #[inline]
    pub fn downcast_mut<T: Reflect>(&mut self, id: ObjectId) -> Option<&mut T> {
        self.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// Drops every object whose index is `len` or above.
    ///
    /// Used to discard the allocations of a failed decode.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.objects.truncate(len);
    }

    /// Iterates over all objects in id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (ObjectId, &dyn Reflect)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, obj)| (ObjectId(index), &**obj))
    }
}

impl fmt::Debug for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
