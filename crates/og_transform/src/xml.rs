use alloc::string::{String, ToString};

use og_reflect::{Heap, Value};
use og_serde::xml::ElementWriter;
use og_serde::xml::keys::is_numeric_key;
use og_serde::{CodecConfig, Encoder, Node, SerdeError};

use crate::Transformer;
use crate::plain::project;

/// Element name of list items and numeric keys.
const SEQUENTIAL_ITEM: &str = "sequential-item";

const ROOT: &str = "data";

/// The plain structure as indented XML under a `data` element.
///
/// List items and numeric keys become `sequential-item` elements. Every
/// scalar element carries a `type` attribute (`integer`, `float`, `string`,
/// `boolean` or `NULL`).
///
/// # Examples
///
/// ```
/// use og_reflect::{Heap, Value};
/// use og_transform::{Transformer, XmlTransformer};
///
/// let value = Value::map([("ids", Value::Sequence(vec![Value::from(4)]))]);
/// let text = XmlTransformer::new().serialize(&Heap::new(), &value).unwrap();
/// assert_eq!(
///     text,
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
///      <data>\n  <ids>\n    <sequential-item type=\"integer\">4</sequential-item>\n  </ids>\n</data>"
/// );
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlTransformer {
    encoder: Encoder,
}

impl XmlTransformer {
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

impl Transformer for XmlTransformer {
    #[inline]
    fn name(&self) -> &str {
        "xml"
    }

    fn serialize(&self, heap: &Heap, value: &Value) -> Result<String, SerdeError> {
        let node = project(&self.encoder, heap, value)?;
        let mut out = ElementWriter::pretty(2)?;
        write_node(&mut out, ROOT, &node)?;
        out.finish()
    }
}

fn write_node(out: &mut ElementWriter, name: &str, node: &Node) -> Result<(), SerdeError> {
    match node {
        Node::Leaf(scalar) => {
            let text = match node.to_native() {
                serde_json::Value::Null => String::new(),
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            };
            out.leaf(name, Some(("type", scalar.type_tag())), &text)
        }
        Node::Seq(items) if items.is_empty() => out.leaf(name, None, ""),
        Node::Map(entries) if entries.is_empty() => out.leaf(name, None, ""),
        Node::Seq(items) => {
            out.start(name, None)?;
            for item in items {
                write_node(out, SEQUENTIAL_ITEM, item)?;
            }
            out.end(name)
        }
        Node::Map(entries) => {
            out.start(name, None)?;
            for (key, item) in entries {
                let child = if is_numeric_key(key) { SEQUENTIAL_ITEM } else { key.as_str() };
                write_node(out, child, item)?;
            }
            out.end(name)
        }
    }
}
