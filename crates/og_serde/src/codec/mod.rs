//! The graph codec: [`Value`] graphs to [`Envelope`]s and back.
//!
//! # Identity
//!
//! Each call owns a reference table. The first time an object is reached
//! (pre-order, fields in declared order) it receives the next index and is
//! expanded; every later occurrence is written as a back-reference `@N`.
//!
//! Decoding allocates a blank instance for each object envelope, gives it
//! the next index *before* hydrating its fields, then hydrates. A field that
//! refers back to an object still being hydrated therefore resolves to that
//! same instance, which is what makes cycles rebuildable.
//!
//! [`Value`]: og_reflect::Value
//! [`Envelope`]: crate::Envelope

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::Decoder;
pub use ser::Encoder;

use og_reflect::{Heap, TypeRegistry, Value};

use crate::{CodecConfig, Envelope, SerdeError};

// -----------------------------------------------------------------------------
// Depth guard

/// Tracks recursion depth against [`CodecConfig::max_depth`].
pub(crate) struct DepthGuard {
    depth: usize,
    max_depth: usize,
}

impl DepthGuard {
    #[inline]
    pub(crate) const fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    #[inline]
    pub(crate) fn enter(&mut self) -> Result<(), SerdeError> {
        if self.depth >= self.max_depth {
            return Err(SerdeError::DepthExceeded(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    #[inline]
    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }
}

// -----------------------------------------------------------------------------
// GraphCodec

/// [`Encoder`] and [`Decoder`] sharing one registry and configuration.
///
/// # Examples
///
/// ```
/// use og_reflect::{DynamicObject, Heap, TypeRegistry, Value};
/// use og_serde::{Envelope, GraphCodec};
///
/// let mut registry = TypeRegistry::new();
/// registry.register_dynamic("T");
///
/// let mut heap = Heap::new();
/// let c1 = heap.insert(DynamicObject::new("T"));
/// heap.downcast_mut::<DynamicObject>(c1)
///     .unwrap()
///     .insert("mirror", Value::Object(c1));
///
/// let codec = GraphCodec::new(&registry);
/// let envelope = codec.serialize(&heap, &Value::Object(c1)).unwrap();
/// assert_eq!(
///     envelope.to_native().to_string(),
///     r#"{"@type":"T","mirror":{"@type":"@0"}}"#
/// );
///
/// let mut copy = Heap::new();
/// let rebuilt = codec.unserialize(&envelope, &mut copy).unwrap();
/// let id = rebuilt.as_object().unwrap();
/// let obj = copy.downcast_ref::<DynamicObject>(id).unwrap();
/// assert_eq!(obj.get("mirror"), Some(&Value::Object(id)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GraphCodec<'r> {
    registry: &'r TypeRegistry,
    config: CodecConfig,
}

impl<'r> GraphCodec<'r> {
    /// Creates a codec with the default [`CodecConfig`].
    #[inline]
    pub const fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            config: CodecConfig::new(),
        }
    }

    #[inline]
    pub const fn with_config(registry: &'r TypeRegistry, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    #[inline]
    pub const fn config(&self) -> CodecConfig {
        self.config
    }

    #[inline]
    pub const fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// See [`Encoder::encode`].
    #[inline]
    pub fn serialize(&self, heap: &Heap, value: &Value) -> Result<Envelope, SerdeError> {
        Encoder::new(self.config).encode(heap, value)
    }

    /// See [`Decoder::decode`].
    #[inline]
    pub fn unserialize(&self, envelope: &Envelope, heap: &mut Heap) -> Result<Value, SerdeError> {
        Decoder::new(self.registry, self.config).decode(envelope, heap)
    }
}
