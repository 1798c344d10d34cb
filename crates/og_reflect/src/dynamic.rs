use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use og_utils::{OrderedMap, ordered_eq};

use crate::{Reflect, ReflectError, Value};

// -----------------------------------------------------------------------------
// DynamicObject

/// A reflective object with a runtime type name and a runtime field list.
///
/// Fields keep the order in which they were first set; setting an existing
/// field replaces its value in place.
///
/// Types registered through
/// [`TypeRegistry::register_dynamic`](crate::TypeRegistry::register_dynamic)
/// are rebuilt as `DynamicObject`s.
///
/// # Examples
///
/// ```
/// use og_reflect::{DynamicObject, Reflect, Value};
///
/// let post = DynamicObject::new("Post")
///     .with_field("postId", Value::Integer(9))
///     .with_field("title", Value::from("Hello World"));
///
/// assert_eq!(post.type_name(), "Post");
/// assert_eq!(post.field_len(), 2);
/// assert_eq!(post.fields()[0].0, "postId");
/// ```
#[derive(Debug, Clone)]
pub struct DynamicObject {
    type_name: String,
    fields: OrderedMap<String, Value>,
}

impl DynamicObject {
    /// Creates an object with no fields.
    #[inline]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: OrderedMap::default(),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[inline]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, returning the previous value if it existed.
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }
}

impl PartialEq for DynamicObject {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && ordered_eq(&self.fields, &other.fields, |a, b| a == b)
    }
}

impl Reflect for DynamicObject {
    #[inline]
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn fields(&self) -> Vec<(&str, Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.clone()))
            .collect()
    }

    #[inline]
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), ReflectError> {
        self.insert(name, value);
        Ok(())
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::DynamicObject;
    use crate::{Reflect, Value};

    #[test]
    fn set_field_replaces_in_place() {
        let mut obj = DynamicObject::new("T")
            .with_field("a", Value::Integer(1))
            .with_field("b", Value::Integer(2));

        obj.set_field("a", Value::Integer(3)).unwrap();

        let names: alloc::vec::Vec<_> = obj.fields().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(obj.get("a"), Some(&Value::Integer(3)));
    }

    #[test]
    fn equality_includes_field_order() {
        let ab = DynamicObject::new("T")
            .with_field("a", Value::Null)
            .with_field("b", Value::Null);
        let ba = DynamicObject::new("T")
            .with_field("b", Value::Null)
            .with_field("a", Value::Null);

        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }
}
