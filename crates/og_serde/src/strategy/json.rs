use alloc::string::{String, ToString};

use serde_core::Deserialize;

use super::{MAX_NESTING, Strategy, check_nesting};
use crate::{NativeValue, SerdeError};

const FORMAT: &str = "json";

/// Compact JSON text.
///
/// Non-ASCII characters and `/` are written unescaped. Lists and objects
/// nest at most [`MAX_NESTING`] deep in both directions.
///
/// # Examples
///
/// ```
/// use og_serde::{JsonStrategy, Strategy};
/// use serde_json::json;
///
/// let text = JsonStrategy.serialize(&json!({"name": "Zoë/1"})).unwrap();
/// assert_eq!(text, r#"{"name":"Zoë/1"}"#);
/// assert_eq!(JsonStrategy.unserialize(&text).unwrap()["name"], "Zoë/1");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JsonStrategy;

impl Strategy for JsonStrategy {
    type Wire<'a> = &'a str;

    #[inline]
    fn name(&self) -> &str {
        FORMAT
    }

    fn serialize(&self, native: &NativeValue) -> Result<String, SerdeError> {
        check_nesting(native, MAX_NESTING)?;
        serde_json::to_string(native).map_err(|e| SerdeError::WriteFailed {
            format: FORMAT,
            reason: e.to_string(),
        })
    }

    fn unserialize<'a>(&self, wire: &'a str) -> Result<NativeValue, SerdeError> {
        let malformed = |e: serde_json::Error| SerdeError::malformed(FORMAT, e.to_string());

        // serde_json stops at 128 levels; the text is measured here instead.
        check_text_nesting(wire, MAX_NESTING)?;
        let mut de = serde_json::Deserializer::from_str(wire);
        de.disable_recursion_limit();
        let native = NativeValue::deserialize(&mut de).map_err(malformed)?;
        de.end().map_err(malformed)?;
        Ok(native)
    }
}

/// Bracket depth of JSON text, ignoring brackets inside strings.
fn check_text_nesting(text: &str, limit: usize) -> Result<(), SerdeError> {
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > limit {
                    return Err(SerdeError::DepthExceeded(limit));
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}
