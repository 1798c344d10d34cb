//! Reversible serialization of object graphs.
//!
//! # Overview
//!
//! Serialization runs in two stages.
//!
//! 1. The [graph codec](codec) walks a [`Value`] graph and produces an
//!    [`Envelope`]: a typed tree in which every scalar carries its type,
//!    every object carries its type name, and every object seen before is
//!    replaced by a back-reference to the index it was first given.
//! 2. A [`Strategy`] moves the envelope's native shape (nested maps and
//!    lists, see [`NativeValue`]) to and from text.
//!
//! Unserialization runs the same stages backwards and rebuilds the objects
//! in a caller-supplied [`Heap`], preserving identity: an object referenced
//! twice in the input is rebuilt once and referenced twice in the output,
//! cycles included.
//!
//! The [`Serializer`] bundles both stages.
//!
//! ## Envelope shape
//!
//! In JSON syntax, an object `c1` whose `mirror` field points at itself is
//!
//! ```text
//! {"@type":"T","mirror":{"@type":"@0"}}
//! ```
//!
//! and scalars and containers are
//!
//! ```text
//! {"@scalar":"integer","@value":0}
//! {"@map":"array","@value":[{"@scalar":"integer","@value":1}]}
//! ```
//!
//! ## Strategies
//!
//! - [`JsonStrategy`]: JSON text, non-ASCII kept as is.
//! - [`XmlStrategy`]: XML text under a `data` root; reserved tags and
//!   numeric keys are escaped into valid element names and restored on parse.
//! - [`YamlStrategy`]: YAML text (`yaml` feature).
//! - [`NullStrategy`]: no text at all on the way back; unserialize returns
//!   the native structure it is given. Used for deep copies.
//!
//! [`Value`]: og_reflect::Value
//! [`Heap`]: og_reflect::Heap

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod config;
mod error;
mod serializer;

pub mod codec;
pub mod envelope;
pub mod node;
pub mod strategy;
pub mod xml;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use codec::{Decoder, Encoder, GraphCodec};
pub use config::CodecConfig;
pub use envelope::{Envelope, MapBody, Scalar};
pub use error::SerdeError;
pub use node::{NativeValue, Node};
pub use serializer::{DeepCopySerializer, JsonSerializer, Serializer, XmlSerializer};
pub use strategy::{JsonStrategy, NullStrategy, Strategy, XmlStrategy};

#[cfg(feature = "yaml")]
pub use serializer::YamlSerializer;
#[cfg(feature = "yaml")]
pub use strategy::{YAML_MAX_NESTING, YamlStrategy};
