use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// ReflectError

/// An error raised by a [`Reflect`](crate::Reflect) implementation while
/// hydrating a field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReflectError {
    #[error("type `{type_name}` has no field named `{field}`")]
    UnknownField { type_name: String, field: String },

    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("integer {value} does not fit in `{target}`")]
    IntegerOverflow { value: i64, target: &'static str },
}
