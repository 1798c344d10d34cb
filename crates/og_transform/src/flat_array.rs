use alloc::format;
use alloc::string::{String, ToString};

use og_reflect::{Heap, Value};
use og_serde::{CodecConfig, Encoder, Node, SerdeError};
use og_utils::OrderedMap;

use crate::Transformer;
use crate::plain::project;

/// The plain structure flattened to one level, as compact JSON.
///
/// Every scalar is keyed by the dot-joined path leading to it, list
/// indices included (`"0.author.name"`). Empty lists and maps have no
/// scalar below them and do not appear. A scalar root is written as is.
///
/// # Examples
///
/// ```
/// use og_reflect::{Heap, Value};
/// use og_transform::{FlatArrayTransformer, Transformer};
///
/// let value = Value::Sequence(vec![Value::map([("tags", Value::Sequence(vec!["a".into()]))])]);
/// let text = FlatArrayTransformer::new().serialize(&Heap::new(), &value).unwrap();
/// assert_eq!(text, r#"{"0.tags.0":"a"}"#);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatArrayTransformer {
    encoder: Encoder,
}

impl FlatArrayTransformer {
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

impl Transformer for FlatArrayTransformer {
    #[inline]
    fn name(&self) -> &str {
        "flat_array"
    }

    fn serialize(&self, heap: &Heap, value: &Value) -> Result<String, SerdeError> {
        let node = project(&self.encoder, heap, value)?;
        let flat = match node {
            leaf @ Node::Leaf(_) => leaf,
            composite => {
                let mut entries = OrderedMap::default();
                flatten(composite, None, &mut entries);
                log::trace!("flattened into {} paths", entries.len());
                Node::Map(entries)
            }
        };
        serde_json::to_string(&flat).map_err(|e| SerdeError::WriteFailed {
            format: "json",
            reason: e.to_string(),
        })
    }
}

fn flatten(node: Node, prefix: Option<&str>, output: &mut OrderedMap<String, Node>) {
    let path = |key: &str| match prefix {
        Some(prefix) => format!("{prefix}.{key}"),
        None => String::from(key),
    };
    match node {
        Node::Leaf(_) => {
            output.insert(String::from(prefix.unwrap_or_default()), node);
        }
        Node::Seq(items) => {
            for (index, item) in items.into_iter().enumerate() {
                let key = path(&index.to_string());
                flatten(item, Some(&key), output);
            }
        }
        Node::Map(entries) => {
            for (key, item) in entries {
                let key = path(&key);
                flatten(item, Some(&key), output);
            }
        }
    }
}
