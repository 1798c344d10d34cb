use alloc::string::{String, ToString};

use og_reflect::{Heap, Value};
use og_serde::{CodecConfig, Encoder, SerdeError};

use crate::Transformer;
use crate::plain::project;

/// The plain structure as compact JSON.
///
/// # Examples
///
/// ```
/// use og_reflect::{Heap, Value};
/// use og_transform::{ArrayTransformer, Transformer};
///
/// let value = Value::map([("a", Value::from(1)), ("b", Value::Sequence(vec![Value::from(2.5)]))]);
/// let text = ArrayTransformer::new().serialize(&Heap::new(), &value).unwrap();
/// assert_eq!(text, r#"{"a":1,"b":[2.5]}"#);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrayTransformer {
    encoder: Encoder,
}

impl ArrayTransformer {
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

impl Transformer for ArrayTransformer {
    #[inline]
    fn name(&self) -> &str {
        "array"
    }

    fn serialize(&self, heap: &Heap, value: &Value) -> Result<String, SerdeError> {
        let node = project(&self.encoder, heap, value)?;
        serde_json::to_string(&node).map_err(|e| SerdeError::WriteFailed {
            format: "json",
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use og_reflect::Heap;

    use super::ArrayTransformer;
    use crate::{Transformer, fixtures};

    #[test]
    fn post_as_compact_json() {
        let mut heap = Heap::new();
        let value = fixtures::post(&mut heap);
        assert_eq!(
            ArrayTransformer::new().serialize(&heap, &value).unwrap(),
            r#"{"postId":9,"title":"Hello World","author":{"userId":1,"name":"Post Author"}}"#
        );
    }
}
