use alloc::string::{String, ToString};

use og_reflect::{Heap, Value};
use og_serde::{CodecConfig, Encoder, SerdeError};

use crate::Transformer;
use crate::plain::project;

/// The plain structure as indented JSON.
///
/// Non-ASCII characters and `/` are written as they are.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonTransformer {
    encoder: Encoder,
}

impl JsonTransformer {
    #[inline]
    pub const fn new() -> Self {
        Self::with_config(CodecConfig::new())
    }

    #[inline]
    pub const fn with_config(config: CodecConfig) -> Self {
        Self {
            encoder: Encoder::new(config),
        }
    }
}

impl Transformer for JsonTransformer {
    #[inline]
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, heap: &Heap, value: &Value) -> Result<String, SerdeError> {
        let node = project(&self.encoder, heap, value)?;
        serde_json::to_string_pretty(&node).map_err(|e| SerdeError::WriteFailed {
            format: "json",
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use og_reflect::{Heap, Value};

    use super::JsonTransformer;
    use crate::Transformer;

    #[test]
    fn indented_and_unescaped() {
        let value = Value::map([("path", Value::from("a/b")), ("name", Value::from("Zoë"))]);
        assert_eq!(
            JsonTransformer::new().serialize(&Heap::new(), &value).unwrap(),
            "{\n  \"path\": \"a/b\",\n  \"name\": \"Zoë\"\n}"
        );
    }
}
