use alloc::string::{String, ToString};

use super::{Strategy, check_nesting};
use crate::{NativeValue, SerdeError};

const FORMAT: &str = "yaml";

/// serde_yaml reads at most this many nested collections.
pub const YAML_MAX_NESTING: usize = 128;

/// YAML text.
///
/// Mappings keep their key order. Non-finite floats already travel as
/// strings in the native form, so they read back unchanged.
///
/// Collections nest at most [`YAML_MAX_NESTING`] deep, roughly 64 value
/// levels. Deeper structures fail to serialize with
/// [`SerdeError::DepthExceeded`] rather than producing text that cannot be
/// read back.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct YamlStrategy;

impl Strategy for YamlStrategy {
    type Wire<'a> = &'a str;

    #[inline]
    fn name(&self) -> &str {
        FORMAT
    }

    fn serialize(&self, native: &NativeValue) -> Result<String, SerdeError> {
        check_nesting(native, YAML_MAX_NESTING)?;
        serde_yaml::to_string(native).map_err(|e| SerdeError::WriteFailed {
            format: FORMAT,
            reason: e.to_string(),
        })
    }

    fn unserialize<'a>(&self, wire: &'a str) -> Result<NativeValue, SerdeError> {
        serde_yaml::from_str(wire).map_err(|e| SerdeError::malformed(FORMAT, e.to_string()))
    }
}
