use alloc::string::{String, ToString};

use super::Strategy;
use crate::{NativeValue, SerdeError};

/// Passes the native structure through untouched.
///
/// [`serialize`](Strategy::serialize) still returns text, a pretty JSON
/// view meant for debugging; [`unserialize`](Strategy::unserialize) takes
/// the native structure back as is. Pairing the two directions through
/// the native form gives a deep copy of an object graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NullStrategy;

impl Strategy for NullStrategy {
    type Wire<'a> = NativeValue;

    #[inline]
    fn name(&self) -> &str {
        "null"
    }

    fn serialize(&self, native: &NativeValue) -> Result<String, SerdeError> {
        serde_json::to_string_pretty(native).map_err(|e| SerdeError::WriteFailed {
            format: "null",
            reason: e.to_string(),
        })
    }

    #[inline]
    fn unserialize<'a>(&self, wire: NativeValue) -> Result<NativeValue, SerdeError> {
        Ok(wire)
    }
}
