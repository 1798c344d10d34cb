use alloc::string::String;

use og_reflect::{ObjectId, OpaqueKind, ReflectError};
use thiserror::Error;

// -----------------------------------------------------------------------------
// SerdeError

/// Every failure of a serialize or unserialize call.
///
/// Failures are deterministic; retrying the same call with the same input
/// fails the same way. Output produced before the failure is discarded.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SerdeError {
    /// The graph holds a value with no serializable state.
    #[error("cannot serialize {kind} `{label}`")]
    UnsupportedValue { kind: OpaqueKind, label: String },

    /// An object envelope names a type missing from the registry.
    #[error("unknown type `{0}`")]
    UnknownType(String),

    /// A back-reference points at an index that was never registered.
    #[error("back-reference `@{0}` does not name a previously decoded object")]
    UnknownReference(usize),

    /// Wire text, or a native structure, is not a valid envelope.
    #[error("malformed {format} input: {reason}")]
    MalformedInput {
        format: &'static str,
        reason: String,
    },

    /// The component only works in one direction.
    #[error("`{0}` does not support unserialize")]
    NotSupported(String),

    /// The graph is nested deeper than [`CodecConfig::max_depth`].
    ///
    /// [`CodecConfig::max_depth`]: crate::CodecConfig::max_depth
    #[error("value graph is nested deeper than the limit of {0}")]
    DepthExceeded(usize),

    /// A map key or property name is one of the envelope's reserved tags
    /// and would be read back as a tag.
    #[error("key `{0}` is reserved by the envelope format")]
    ReservedKey(String),

    /// A value refers to an object the heap does not hold.
    #[error("object {0} is not stored in the heap")]
    MissingObject(ObjectId),

    /// A key cannot be written as an XML element name.
    #[error("`{0}` cannot be used as an XML element name")]
    InvalidElementName(String),

    /// An object rejected one of its decoded properties.
    #[error("cannot set property `{property}` of `{type_name}`: {source}")]
    Property {
        type_name: String,
        property: String,
        source: ReflectError,
    },

    /// The output writer failed.
    #[error("failed to write {format} output: {reason}")]
    WriteFailed {
        format: &'static str,
        reason: String,
    },
}

impl SerdeError {
    #[inline]
    pub(crate) fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            format,
            reason: reason.into(),
        }
    }
}
