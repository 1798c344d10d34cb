use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use og_utils::{OrderedMap, ordered_eq};

use crate::ObjectId;

// -----------------------------------------------------------------------------
// Opaque

/// Kinds of values that exist in a graph but have no serializable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpaqueKind {
    /// An open file, socket, or other OS resource.
    Resource,
    /// A function or closure.
    Callable,
    /// An unbounded or lazily produced sequence.
    Generator,
}

impl OpaqueKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resource => "resource handle",
            Self::Callable => "callable",
            Self::Generator => "generator",
        }
    }
}

impl fmt::Display for OpaqueKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that can be held in a graph but never serialized.
///
/// The label is free-form and only used in error messages,
/// e.g. a file path or a function name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    pub kind: OpaqueKind,
    pub label: String,
}

// -----------------------------------------------------------------------------
// Value

/// A node of an in-memory value graph.
///
/// Objects are not stored inline; [`Value::Object`] holds a handle into a
/// [`Heap`](crate::Heap). Cloning a `Value` therefore never duplicates an
/// object, and shared or cyclic references are expressed by repeating ids.
///
/// Equality is structural for scalars and containers, order-sensitive for
/// maps, and by identity for objects. `NaN` is equal to `NaN` so that
/// round trips of non-finite floats can be compared.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Map(OrderedMap<String, Value>),
    Object(ObjectId),
    Opaque(Opaque),
}

impl Value {
    /// Creates an open-resource value.
    #[inline]
    pub fn resource(label: impl Into<String>) -> Self {
        Self::opaque(OpaqueKind::Resource, label)
    }

    /// Creates a callable value.
    #[inline]
    pub fn callable(label: impl Into<String>) -> Self {
        Self::opaque(OpaqueKind::Callable, label)
    }

    /// Creates a generator value.
    #[inline]
    pub fn generator(label: impl Into<String>) -> Self {
        Self::opaque(OpaqueKind::Generator, label)
    }

    #[inline]
    fn opaque(kind: OpaqueKind, label: impl Into<String>) -> Self {
        Self::Opaque(Opaque {
            kind,
            label: label.into(),
        })
    }

    /// Builds a [`Value::Map`] from key/value pairs, keeping their order.
    ///
    /// ```
    /// use og_reflect::Value;
    ///
    /// let map = Value::map([("a", Value::from(1)), ("b", Value::from(2))]);
    /// let Value::Map(entries) = map else { unreachable!() };
    /// assert_eq!(entries.get_index(0).unwrap().0, "a");
    /// ```
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// A short human-readable name of the variant, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
            Self::Opaque(opaque) => opaque.kind.as_str(),
        }
    }

    #[inline]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::Bool(_) | Self::Integer(_) | Self::Float(_) | Self::String(_)
        )
    }

    #[inline]
    pub const fn as_object(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => ordered_eq(a, b, |x, y| x == y),
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

impl_from! {
    bool => |v| Value::Bool(v),
    i32 => |v| Value::Integer(i64::from(v)),
    i64 => |v| Value::Integer(v),
    f64 => |v| Value::Float(v),
    String => |v| Value::String(v),
    &str => |v| Value::String(String::from(v)),
    ObjectId => |v| Value::Object(v),
    Vec<Value> => |v| Value::Sequence(v),
    OrderedMap<String, Value> => |v| Value::Map(v),
}
