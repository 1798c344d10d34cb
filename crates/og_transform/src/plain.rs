//! The plain structure shared by every transformer.
//!
//! [`project`] encodes a graph and runs three passes over its tagged tree:
//!
//! 1. Every node carrying `@value` (a scalar or a container) is replaced by
//!    that value.
//! 2. `@type` is removed from what is left, so objects become maps of their
//!    properties and back-references become empty maps.
//! 3. A map left with a single scalar entry whose key equals the key the map
//!    itself sits under is replaced by that scalar.

use alloc::string::{String, ToString};

use og_reflect::{Heap, Value};
use og_serde::envelope::{MAP_TAG, SCALAR_TAG, TYPE_TAG, VALUE_TAG};
use og_serde::{Encoder, Node, SerdeError};
use og_utils::OrderedMap;

/// Encodes `value` and reduces it to its plain structure.
///
/// # Examples
///
/// ```
/// use og_reflect::{DynamicObject, Heap, Value};
/// use og_serde::Encoder;
/// use og_transform::plain::project;
///
/// let mut heap = Heap::new();
/// let user = heap.insert(DynamicObject::new("User").with_field("id", Value::from(3)));
/// let node = project(&Encoder::default(), &heap, &Value::Object(user)).unwrap();
/// assert_eq!(node.to_native().to_string(), r#"{"id":3}"#);
/// ```
pub fn project(encoder: &Encoder, heap: &Heap, value: &Value) -> Result<Node, SerdeError> {
    let envelope = encoder.encode(heap, value)?;
    let node = unwrap_values(envelope.to_node());
    let node = strip_types(node);
    Ok(collapse(node, None))
}

fn unwrap_values(node: Node) -> Node {
    match node {
        Node::Map(mut entries) => {
            let wrapped = entries.contains_key(SCALAR_TAG) || entries.contains_key(MAP_TAG);
            if let Some(inner) = wrapped.then(|| entries.shift_remove(VALUE_TAG)).flatten() {
                return unwrap_values(inner);
            }
            Node::Map(
                entries
                    .into_iter()
                    .map(|(key, node)| (key, unwrap_values(node)))
                    .collect(),
            )
        }
        Node::Seq(items) => Node::Seq(items.into_iter().map(unwrap_values).collect()),
        leaf => leaf,
    }
}

fn strip_types(node: Node) -> Node {
    match node {
        Node::Map(mut entries) => {
            entries.shift_remove(TYPE_TAG);
            Node::Map(
                entries
                    .into_iter()
                    .map(|(key, node)| (key, strip_types(node)))
                    .collect(),
            )
        }
        Node::Seq(items) => Node::Seq(items.into_iter().map(strip_types).collect()),
        leaf => leaf,
    }
}

fn collapse(node: Node, parent_key: Option<&str>) -> Node {
    match node {
        Node::Map(entries) => {
            let mut entries: OrderedMap<String, Node> = entries
                .into_iter()
                .map(|(key, node)| {
                    let node = collapse(node, Some(&key));
                    (key, node)
                })
                .collect();

            let wrapper = entries.len() == 1
                && entries
                    .first()
                    .is_some_and(|(key, node)| Some(key.as_str()) == parent_key && node.is_leaf());
            if wrapper {
                if let Some((_, leaf)) = entries.pop() {
                    return leaf;
                }
            }
            Node::Map(entries)
        }
        Node::Seq(items) => Node::Seq(
            items
                .into_iter()
                .enumerate()
                .map(|(index, node)| collapse(node, Some(&index.to_string())))
                .collect(),
        ),
        leaf => leaf,
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use og_reflect::{DynamicObject, Heap, Value};
    use og_serde::{Encoder, Node};
    use serde_json::json;

    use super::project;
    use crate::fixtures;

    fn plain(heap: &Heap, value: &Value) -> serde_json::Value {
        project(&Encoder::default(), heap, value).unwrap().to_native()
    }

    #[test]
    fn objects_become_property_maps() {
        let mut heap = Heap::new();
        let value = fixtures::post(&mut heap);
        assert_eq!(
            plain(&heap, &value).to_string(),
            r#"{"postId":9,"title":"Hello World","author":{"userId":1,"name":"Post Author"}}"#
        );
    }

    #[test]
    fn containers_lose_their_wrappers() {
        let heap = Heap::new();
        let value = Value::map([
            ("list", Value::Sequence(vec![Value::from(1), Value::from(17.0), Value::Null])),
            ("empty", Value::Sequence(vec![])),
        ]);
        assert_eq!(plain(&heap, &value), json!({"list": [1, 17, null], "empty": []}));
    }

    #[test]
    fn back_references_become_empty_maps() {
        let mut heap = Heap::new();
        let c1 = heap.insert(DynamicObject::new("T").with_field("n", Value::from(1)));
        heap.downcast_mut::<DynamicObject>(c1)
            .unwrap()
            .insert("mirror", Value::Object(c1));
        assert_eq!(plain(&heap, &Value::Object(c1)), json!({"n": 1, "mirror": {}}));
    }

    #[test]
    fn single_entry_wrappers_collapse_on_matching_key() {
        let heap = Heap::new();
        let value = Value::map([
            ("name", Value::map([("name", Value::from("inner"))])),
            ("other", Value::map([("name", Value::from("kept"))])),
            ("nested", Value::map([("nested", Value::Sequence(vec![Value::from(1)]))])),
        ]);
        assert_eq!(
            plain(&heap, &value),
            json!({
                "name": "inner",
                "other": {"name": "kept"},
                "nested": {"nested": [1]},
            })
        );
    }

    #[test]
    fn root_never_collapses() {
        let heap = Heap::new();
        let value = Value::map([("value", Value::from(true))]);
        let node = project(&Encoder::default(), &heap, &value).unwrap();
        assert!(matches!(node, Node::Map(_)));

        let scalar = project(&Encoder::default(), &heap, &Value::from("x")).unwrap();
        assert!(scalar.is_leaf());
    }
}
