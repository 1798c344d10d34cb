//! Wire strategies: native envelope structures to text and back.
//!
//! A strategy only moves data. It knows nothing about objects, types or
//! references; those live in the [codec](crate::codec).

// -----------------------------------------------------------------------------
// Modules

mod json;
mod null;
mod xml;

#[cfg(feature = "yaml")]
mod yaml;

// -----------------------------------------------------------------------------
// Exports

pub use json::JsonStrategy;
pub use null::NullStrategy;
pub use xml::XmlStrategy;

#[cfg(feature = "yaml")]
pub use yaml::{YAML_MAX_NESTING, YamlStrategy};

use alloc::string::String;
use alloc::vec;

use crate::{CodecConfig, NativeValue, SerdeError};

/// Deepest list/map nesting the text strategies write and read.
///
/// An envelope adds at most two levels per value level, so every graph
/// within [`CodecConfig::DEFAULT_MAX_DEPTH`] fits.
pub const MAX_NESTING: usize = 2 * CodecConfig::DEFAULT_MAX_DEPTH;

// -----------------------------------------------------------------------------
// Strategy

/// Converts a [`NativeValue`] to wire text and back.
///
/// `Wire` is what [`unserialize`](Strategy::unserialize) consumes. Text
/// strategies borrow a `&str`; [`NullStrategy`] takes the native structure
/// itself.
pub trait Strategy {
    type Wire<'a>;

    /// Short identifier used in logs and errors.
    fn name(&self) -> &str;

    fn serialize(&self, native: &NativeValue) -> Result<String, SerdeError>;

    fn unserialize<'a>(&self, wire: Self::Wire<'a>) -> Result<NativeValue, SerdeError>;
}

// -----------------------------------------------------------------------------
// Nesting

/// Fails with [`SerdeError::DepthExceeded`] if lists and maps in `native`
/// nest deeper than `limit`. Walks with an explicit stack.
pub(crate) fn check_nesting(native: &NativeValue, limit: usize) -> Result<(), SerdeError> {
    let mut pending = vec![(native, 0_usize)];
    while let Some((node, depth)) = pending.pop() {
        match node {
            NativeValue::Array(items) if depth < limit => {
                pending.extend(items.iter().map(|item| (item, depth + 1)));
            }
            NativeValue::Object(entries) if depth < limit => {
                pending.extend(entries.values().map(|value| (value, depth + 1)));
            }
            NativeValue::Array(_) | NativeValue::Object(_) => {
                return Err(SerdeError::DepthExceeded(limit));
            }
            _ => {}
        }
    }
    Ok(())
}
