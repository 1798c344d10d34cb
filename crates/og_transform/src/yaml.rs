use alloc::string::{String, ToString};

use og_reflect::{Heap, Value};
use og_serde::{CodecConfig, Encoder, SerdeError};

use crate::Transformer;
use crate::plain::project;

/// The plain structure as YAML.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlTransformer {
    encoder: Encoder,
}

impl YamlTransformer {
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

impl Transformer for YamlTransformer {
    #[inline]
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, heap: &Heap, value: &Value) -> Result<String, SerdeError> {
        let node = project(&self.encoder, heap, value)?;
        serde_yaml::to_string(&node).map_err(|e| SerdeError::WriteFailed {
            format: "yaml",
            reason: e.to_string(),
        })
    }
}
