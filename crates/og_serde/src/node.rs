//! The tagged tree form of an [`Envelope`] and its native structure.
//!
//! An [`Envelope`] is written out as a tree of maps keyed by the reserved
//! tags (`@type`, `@scalar`, `@value`, `@map`). [`Node`] is that tree with
//! typed leaves; [`NativeValue`] is the same tree as plain JSON-like data,
//! which is what a [`Strategy`](crate::Strategy) transports.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use og_utils::{OrderedMap, ordered_eq};
use serde_core::ser::{SerializeMap, SerializeSeq};
use serde_core::{Serialize, Serializer};
use serde_json::Number;

use crate::codec::DepthGuard;
use crate::envelope::{Envelope, MapBody, Scalar};
use crate::{CodecConfig, SerdeError};
use crate::envelope::{MAP_KIND, MAP_TAG, REFERENCE_PREFIX, SCALAR_TAG, TYPE_TAG, VALUE_TAG};

/// The native nested map/list structure of an envelope.
///
/// Objects keep insertion order.
pub type NativeValue = serde_json::Value;

const FORMAT: &str = "envelope";

// -----------------------------------------------------------------------------
// Float representation

/// 2^53, the largest magnitude below which every integer is an exact `f64`.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

enum FloatRepr {
    Integral(i64),
    Finite(f64),
    NonFinite(String),
}

// Integral floats are written without a fractional part (`17.0` as `17`);
// the scalar tag restores the type on the way back. `-0.0` keeps its
// fractional part, since the integer form has no sign. JSON has no literal
// for infinities or NaN, so those travel as `inf`, `-inf` and `NaN`.
fn float_repr(value: f64) -> FloatRepr {
    if !value.is_finite() {
        log::warn!("non-finite float {value} is carried as a string");
        FloatRepr::NonFinite(value.to_string())
    } else if value.fract() == 0.0
        && value.abs() <= EXACT_INTEGER_LIMIT
        && !(value == 0.0 && value.is_sign_negative())
    {
        FloatRepr::Integral(value as i64)
    } else {
        FloatRepr::Finite(value)
    }
}

// -----------------------------------------------------------------------------
// Node

/// A tree of maps, lists and typed leaves.
#[derive(Debug, Clone)]
pub enum Node {
    Leaf(Scalar),
    Seq(Vec<Node>),
    Map(OrderedMap<String, Node>),
}

impl Node {
    #[inline]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    #[inline]
    fn text(text: &str) -> Self {
        Self::Leaf(Scalar::String(String::from(text)))
    }

    /// Converts the tree to its native structure.
    pub fn to_native(&self) -> NativeValue {
        match self {
            Self::Leaf(scalar) => scalar_to_native(scalar),
            Self::Seq(items) => NativeValue::Array(items.iter().map(Node::to_native).collect()),
            Self::Map(entries) => NativeValue::Object(
                entries
                    .iter()
                    .map(|(key, node)| (key.clone(), node.to_native()))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(a), Self::Leaf(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => ordered_eq(a, b, |x, y| x == y),
            _ => false,
        }
    }
}

fn scalar_to_native(scalar: &Scalar) -> NativeValue {
    match scalar {
        Scalar::Null => NativeValue::Null,
        Scalar::Boolean(v) => NativeValue::Bool(*v),
        Scalar::Integer(v) => NativeValue::Number(Number::from(*v)),
        Scalar::Float(v) => match float_repr(*v) {
            FloatRepr::Integral(i) => NativeValue::Number(Number::from(i)),
            FloatRepr::Finite(f) => Number::from_f64(f).map_or(NativeValue::Null, NativeValue::Number),
            FloatRepr::NonFinite(s) => NativeValue::String(s),
        },
        Scalar::String(v) => NativeValue::String(v.clone()),
    }
}

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Boolean(v) => serializer.serialize_bool(*v),
            Self::Integer(v) => serializer.serialize_i64(*v),
            Self::Float(v) => match float_repr(*v) {
                FloatRepr::Integral(i) => serializer.serialize_i64(i),
                FloatRepr::Finite(f) => serializer.serialize_f64(f),
                FloatRepr::NonFinite(s) => serializer.serialize_str(&s),
            },
            Self::String(v) => serializer.serialize_str(v),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(scalar) => scalar.serialize(serializer),
            Self::Seq(items) => {
                let mut state = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    state.serialize_element(item)?;
                }
                state.end()
            }
            Self::Map(entries) => {
                let mut state = serializer.serialize_map(Some(entries.len()))?;
                for (key, node) in entries {
                    state.serialize_entry(key, node)?;
                }
                state.end()
            }
        }
    }
}

impl Serialize for Envelope {
    /// Serializes the tagged form, see [`Envelope::to_node`].
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_node().serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// Envelope <-> tagged form

impl Envelope {
    /// Converts the envelope to its tagged tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use og_serde::{Envelope, Scalar};
    ///
    /// let native = Envelope::Scalar(Scalar::Float(17.0)).to_native();
    /// assert_eq!(native.to_string(), r#"{"@scalar":"float","@value":17}"#);
    /// ```
    pub fn to_node(&self) -> Node {
        let mut entries = OrderedMap::default();
        match self {
            Self::Scalar(scalar) => {
                entries.insert(String::from(SCALAR_TAG), Node::text(scalar.type_tag()));
                entries.insert(String::from(VALUE_TAG), Node::Leaf(scalar.clone()));
            }
            Self::Map(body) => {
                let elements = match body {
                    MapBody::Sequence(items) => Node::Seq(items.iter().map(Envelope::to_node).collect()),
                    MapBody::Associative(map) => Node::Map(
                        map.iter()
                            .map(|(key, envelope)| (key.clone(), envelope.to_node()))
                            .collect(),
                    ),
                };
                entries.insert(String::from(MAP_TAG), Node::text(MAP_KIND));
                entries.insert(String::from(VALUE_TAG), elements);
            }
            Self::Object {
                type_name,
                properties,
            } => {
                entries.insert(String::from(TYPE_TAG), Node::text(type_name));
                for (key, envelope) in properties {
                    entries.insert(key.clone(), envelope.to_node());
                }
            }
            Self::BackReference(index) => {
                let reference = format!("{REFERENCE_PREFIX}{index}");
                entries.insert(String::from(TYPE_TAG), Node::text(&reference));
            }
        }
        Node::Map(entries)
    }

    /// Converts the envelope to its native structure.
    #[inline]
    pub fn to_native(&self) -> NativeValue {
        self.to_node().to_native()
    }

    /// Reads an envelope back from its native structure.
    ///
    /// Scalar values are cast to their stated type, so a text-only
    /// transport that turned `17` into `"17"` still yields an integer.
    /// Envelopes nest at most [`CodecConfig::DEFAULT_MAX_DEPTH`] deep; see
    /// [`from_native_with_depth`](Self::from_native_with_depth).
    ///
    /// # Examples
    ///
    /// ```
    /// use og_serde::{Envelope, Scalar};
    /// use serde_json::json;
    ///
    /// let envelope = Envelope::from_native(&json!({"@scalar": "integer", "@value": "42"}));
    /// assert_eq!(envelope, Ok(Envelope::Scalar(Scalar::Integer(42))));
    /// ```
    #[inline]
    pub fn from_native(native: &NativeValue) -> Result<Self, SerdeError> {
        Self::from_native_with_depth(native, CodecConfig::DEFAULT_MAX_DEPTH)
    }

    /// Reads an envelope back from its native structure, failing with
    /// [`SerdeError::DepthExceeded`] once envelopes nest deeper than
    /// `max_depth`.
    pub fn from_native_with_depth(
        native: &NativeValue,
        max_depth: usize,
    ) -> Result<Self, SerdeError> {
        read_envelope(native, &mut DepthGuard::new(max_depth))
    }
}

fn read_envelope(native: &NativeValue, guard: &mut DepthGuard) -> Result<Envelope, SerdeError> {
    guard.enter()?;
    let envelope = read_tagged(native, guard);
    guard.leave();
    envelope
}

fn read_tagged(native: &NativeValue, guard: &mut DepthGuard) -> Result<Envelope, SerdeError> {
    let NativeValue::Object(map) = native else {
        return Err(SerdeError::malformed(
            FORMAT,
            format!("expected a tagged object, found {}", native_kind(native)),
        ));
    };

    if let Some(tag) = map.get(SCALAR_TAG) {
        let tag = tag
            .as_str()
            .ok_or_else(|| SerdeError::malformed(FORMAT, "`@scalar` is not a string"))?;
        let value = map.get(VALUE_TAG).unwrap_or(&NativeValue::Null);
        return cast_scalar(tag, value).map(Envelope::Scalar);
    }

    if map.contains_key(MAP_TAG) {
        return map_body(map.get(VALUE_TAG), guard).map(Envelope::Map);
    }

    let Some(tag) = map.get(TYPE_TAG) else {
        return Err(SerdeError::malformed(
            FORMAT,
            "object has none of `@type`, `@scalar` or `@map`",
        ));
    };
    let type_name = tag
        .as_str()
        .ok_or_else(|| SerdeError::malformed(FORMAT, "`@type` is not a string"))?;

    if let Some(index) = type_name.strip_prefix(REFERENCE_PREFIX) {
        return index.parse::<usize>().map(Envelope::BackReference).map_err(|_| {
            SerdeError::malformed(FORMAT, format!("`{type_name}` is not a back-reference"))
        });
    }

    let mut properties = OrderedMap::default();
    for (key, value) in map {
        if key != TYPE_TAG {
            properties.insert(key.clone(), read_envelope(value, guard)?);
        }
    }
    Ok(Envelope::Object {
        type_name: String::from(type_name),
        properties,
    })
}

fn map_body(elements: Option<&NativeValue>, guard: &mut DepthGuard) -> Result<MapBody, SerdeError> {
    match elements {
        Some(NativeValue::Array(items)) => items
            .iter()
            .map(|item| read_envelope(item, guard))
            .collect::<Result<_, _>>()
            .map(MapBody::Sequence),
        Some(NativeValue::Object(entries)) => {
            let mut map = OrderedMap::default();
            for (key, value) in entries {
                map.insert(key.clone(), read_envelope(value, guard)?);
            }
            Ok(MapBody::Associative(map))
        }
        // Text transports may write an empty container as an empty element.
        None | Some(NativeValue::Null) => Ok(MapBody::Sequence(Vec::new())),
        Some(NativeValue::String(s)) if s.is_empty() => Ok(MapBody::Sequence(Vec::new())),
        Some(other) => Err(SerdeError::malformed(
            FORMAT,
            format!("container elements cannot be {}", native_kind(other)),
        )),
    }
}

fn cast_scalar(tag: &str, value: &NativeValue) -> Result<Scalar, SerdeError> {
    let cast = match tag {
        "NULL" => Some(Scalar::Null),
        "boolean" => match value {
            NativeValue::Bool(v) => Some(*v),
            NativeValue::Number(n) => n.as_f64().map(|f| f != 0.0),
            NativeValue::String(s) => match s.trim() {
                "true" | "1" => Some(true),
                "false" | "0" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
        .map(Scalar::Boolean),
        "integer" => match value {
            NativeValue::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() <= EXACT_INTEGER_LIMIT)
                    .map(|f| f as i64)
            }),
            NativeValue::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .map(Scalar::Integer),
        "float" => match value {
            NativeValue::Number(n) => n.as_f64(),
            NativeValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .map(Scalar::Float),
        "string" => match value {
            NativeValue::String(s) => Some(s.clone()),
            NativeValue::Number(n) => Some(n.to_string()),
            NativeValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
        .map(Scalar::String),
        other => {
            return Err(SerdeError::malformed(
                FORMAT,
                format!("unknown scalar type `{other}`"),
            ));
        }
    };

    cast.ok_or_else(|| {
        SerdeError::malformed(
            FORMAT,
            format!("cannot read {} as `{tag}`", native_kind(value)),
        )
    })
}

fn native_kind(value: &NativeValue) -> &'static str {
    match value {
        NativeValue::Null => "null",
        NativeValue::Bool(_) => "a boolean",
        NativeValue::Number(_) => "a number",
        NativeValue::String(_) => "a string",
        NativeValue::Array(_) => "an array",
        NativeValue::Object(_) => "an object",
    }
}
