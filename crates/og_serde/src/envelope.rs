//! The canonical, wire-neutral form of a value graph.

use alloc::string::String;
use alloc::vec::Vec;

use og_reflect::Value;
use og_utils::{OrderedMap, ordered_eq};

// -----------------------------------------------------------------------------
// Tags

/// Key holding an object's type name, or `@N` for a back-reference.
pub const TYPE_TAG: &str = "@type";
/// Key holding a scalar's type.
pub const SCALAR_TAG: &str = "@scalar";
/// Key holding a scalar's value or a container's elements.
pub const VALUE_TAG: &str = "@value";
/// Key marking a container.
pub const MAP_TAG: &str = "@map";
/// Every reserved tag. Map keys and property names may not be one of them.
pub const RESERVED_TAGS: [&str; 4] = [TYPE_TAG, SCALAR_TAG, VALUE_TAG, MAP_TAG];
/// The only container kind.
pub const MAP_KIND: &str = "array";
/// Prefix of a back-reference type name.
pub const REFERENCE_PREFIX: char = '@';

// -----------------------------------------------------------------------------
// Scalar

/// A scalar with its type.
#[derive(Debug, Clone)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// The scalar's type tag as written to `@scalar`.
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Returns the scalar part of a value, if the value is a scalar.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(match value {
            Value::Null => Self::Null,
            Value::Bool(v) => Self::Boolean(*v),
            Value::Integer(v) => Self::Integer(*v),
            Value::Float(v) => Self::Float(*v),
            Value::String(v) => Self::String(v.clone()),
            _ => return None,
        })
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Boolean(v) => Value::Bool(v),
            Self::Integer(v) => Value::Integer(v),
            Self::Float(v) => Value::Float(v),
            Self::String(v) => Value::String(v),
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Envelope

/// The elements of a container envelope.
#[derive(Debug, Clone)]
pub enum MapBody {
    /// Keys are exactly `0..n` in order.
    Sequence(Vec<Envelope>),
    /// Any other keys, in insertion order.
    Associative(OrderedMap<String, Envelope>),
}

impl PartialEq for MapBody {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Associative(a), Self::Associative(b)) => ordered_eq(a, b, |x, y| x == y),
            _ => false,
        }
    }
}

/// A node of the canonical typed tree.
///
/// Produced by [`Encoder`](crate::Encoder), consumed by
/// [`Decoder`](crate::Decoder). See [`Node`](crate::Node) for the tagged
/// map form written to the wire.
#[derive(Debug, Clone)]
pub enum Envelope {
    Scalar(Scalar),
    Map(MapBody),
    Object {
        type_name: String,
        properties: OrderedMap<String, Envelope>,
    },
    /// Index of an object registered earlier in the same call.
    BackReference(usize),
}

impl Envelope {
    /// The `@type` value of an object or back-reference envelope.
    pub fn type_name(&self) -> Option<String> {
        match self {
            Self::Object { type_name, .. } => Some(type_name.clone()),
            Self::BackReference(index) => Some(alloc::format!("{REFERENCE_PREFIX}{index}")),
            _ => None,
        }
    }
}

impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (
                Self::Object {
                    type_name: ta,
                    properties: pa,
                },
                Self::Object {
                    type_name: tb,
                    properties: pb,
                },
            ) => ta == tb && ordered_eq(pa, pb, |x, y| x == y),
            (Self::BackReference(a), Self::BackReference(b)) => a == b,
            _ => false,
        }
    }
}
