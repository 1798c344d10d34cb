use alloc::string::String;

use og_reflect::{Heap, ObjectId, Value};
use og_utils::OrderedMap;
use og_utils::hash::HashMap;

use super::DepthGuard;
use crate::envelope::RESERVED_TAGS;
use crate::{CodecConfig, Envelope, MapBody, Scalar, SerdeError};

// -----------------------------------------------------------------------------
// ReferenceTable

/// Object identity to first-encounter index, for one encode call.
#[derive(Default)]
struct ReferenceTable {
    indices: HashMap<ObjectId, usize>,
}

impl ReferenceTable {
    #[inline]
    fn get(&self, id: ObjectId) -> Option<usize> {
        self.indices.get(&id).copied()
    }

    /// Gives `id` the next index. `id` must not be registered yet.
    #[inline]
    fn register(&mut self, id: ObjectId) -> usize {
        let index = self.indices.len();
        self.indices.insert(id, index);
        index
    }

    #[inline]
    fn len(&self) -> usize {
        self.indices.len()
    }
}

// -----------------------------------------------------------------------------
// Encoder

/// Turns a [`Value`] graph into an [`Envelope`].
///
/// Each [`encode`](Self::encode) call starts from an empty reference table,
/// so indices never leak between calls.
///
/// # Examples
///
/// ```
/// use og_reflect::{Heap, Value};
/// use og_serde::{CodecConfig, Encoder, SerdeError};
///
/// let heap = Heap::new();
/// let encoder = Encoder::new(CodecConfig::default());
///
/// let envelope = encoder.encode(&heap, &Value::Sequence(vec![1.into(), 2.into(), 3.into()]));
/// assert_eq!(
///     envelope.unwrap().to_native().to_string(),
///     concat!(
///         r#"{"@map":"array","@value":["#,
///         r#"{"@scalar":"integer","@value":1},"#,
///         r#"{"@scalar":"integer","@value":2},"#,
///         r#"{"@scalar":"integer","@value":3}]}"#,
///     )
/// );
///
/// let err = encoder.encode(&heap, &Value::callable("main")).unwrap_err();
/// assert!(matches!(err, SerdeError::UnsupportedValue { .. }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    config: CodecConfig,
}

impl Encoder {
    #[inline]
    pub const fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Encodes `value`, reading objects from `heap`.
    ///
    /// # Errors
    ///
    /// - [`SerdeError::UnsupportedValue`] for resource handles, callables and
    ///   generators anywhere in the graph.
    /// - [`SerdeError::ReservedKey`] for a map key or property name equal to
    ///   a reserved tag such as `@type`.
    /// - [`SerdeError::MissingObject`] for an id the heap does not hold.
    /// - [`SerdeError::DepthExceeded`] past [`CodecConfig::max_depth`].
    pub fn encode(&self, heap: &Heap, value: &Value) -> Result<Envelope, SerdeError> {
        let mut state = EncodeState {
            heap,
            table: ReferenceTable::default(),
            guard: DepthGuard::new(self.config.max_depth),
        };
        let envelope = state.encode(value)?;
        log::debug!("encoded value graph with {} objects", state.table.len());
        Ok(envelope)
    }
}

// -----------------------------------------------------------------------------
// EncodeState

struct EncodeState<'a> {
    heap: &'a Heap,
    table: ReferenceTable,
    guard: DepthGuard,
}

impl EncodeState<'_> {
    fn encode(&mut self, value: &Value) -> Result<Envelope, SerdeError> {
        self.guard.enter()?;
        let output = self.encode_inner(value);
        self.guard.leave();
        output
    }

    fn encode_inner(&mut self, value: &Value) -> Result<Envelope, SerdeError> {
        match value {
            Value::Sequence(items) => {
                let mut elements = alloc::vec::Vec::with_capacity(items.len());
                for item in items {
                    elements.push(self.encode(item)?);
                }
                Ok(Envelope::Map(MapBody::Sequence(elements)))
            }
            Value::Map(entries) => {
                let mut elements = OrderedMap::default();
                for (key, item) in entries {
                    check_key(key)?;
                    elements.insert(key.clone(), self.encode(item)?);
                }
                Ok(Envelope::Map(MapBody::Associative(elements)))
            }
            Value::Object(id) => self.encode_object(*id),
            Value::Opaque(opaque) => Err(SerdeError::UnsupportedValue {
                kind: opaque.kind,
                label: opaque.label.clone(),
            }),
            Value::Null => Ok(Envelope::Scalar(Scalar::Null)),
            Value::Bool(v) => Ok(Envelope::Scalar(Scalar::Boolean(*v))),
            Value::Integer(v) => Ok(Envelope::Scalar(Scalar::Integer(*v))),
            Value::Float(v) => Ok(Envelope::Scalar(Scalar::Float(*v))),
            Value::String(v) => Ok(Envelope::Scalar(Scalar::String(v.clone()))),
        }
    }

    fn encode_object(&mut self, id: ObjectId) -> Result<Envelope, SerdeError> {
        if let Some(index) = self.table.get(id) {
            log::trace!("object {id} seen before, writing back-reference @{index}");
            return Ok(Envelope::BackReference(index));
        }

        let heap = self.heap;
        let object = heap.get(id).ok_or(SerdeError::MissingObject(id))?;
        let index = self.table.register(id);
        log::trace!("object {id} of type `{}` registered as @{index}", object.type_name());

        let mut properties = OrderedMap::default();
        for (name, field) in object.fields() {
            check_key(name)?;
            properties.insert(String::from(name), self.encode(&field)?);
        }

        Ok(Envelope::Object {
            type_name: String::from(object.type_name()),
            properties,
        })
    }
}

#[inline]
fn check_key(key: &str) -> Result<(), SerdeError> {
    if RESERVED_TAGS.contains(&key) {
        return Err(SerdeError::ReservedKey(String::from(key)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use og_reflect::{DynamicObject, Heap, ObjectId, OpaqueKind, Value};

    use super::Encoder;
    use crate::{CodecConfig, Envelope, MapBody, SerdeError};

    fn encode(heap: &Heap, value: &Value) -> Result<Envelope, SerdeError> {
        Encoder::default().encode(heap, value)
    }

    #[test]
    fn self_reference_collapses_to_back_reference() {
        let mut heap = Heap::new();
        let c1 = heap.insert(DynamicObject::new("T"));
        heap.downcast_mut::<DynamicObject>(c1)
            .unwrap()
            .insert("mirror", Value::Object(c1));

        let envelope = encode(&heap, &Value::Object(c1)).unwrap();
        assert_eq!(
            envelope.to_native().to_string(),
            r#"{"@type":"T","mirror":{"@type":"@0"}}"#
        );
    }

    #[test]
    fn shared_objects_across_sequence_elements() {
        let mut heap = Heap::new();
        let shared = heap.insert(DynamicObject::new("User").with_field("name", "ann".into()));
        let value = Value::Sequence(vec![Value::Object(shared), Value::Object(shared)]);

        let Envelope::Map(MapBody::Sequence(items)) = encode(&heap, &value).unwrap() else {
            panic!("expected a sequence envelope");
        };
        assert!(matches!(items[0], Envelope::Object { .. }));
        assert_eq!(items[1], Envelope::BackReference(0));
    }

    #[test]
    fn indices_follow_pre_order_field_order() {
        let mut heap = Heap::new();
        let leaf_a = heap.insert(DynamicObject::new("Leaf"));
        let leaf_b = heap.insert(DynamicObject::new("Leaf"));
        let root = heap.insert(
            DynamicObject::new("Root")
                .with_field("b", Value::Object(leaf_b))
                .with_field("a", Value::Object(leaf_a))
                .with_field("again", Value::Object(leaf_a)),
        );

        let native = encode(&heap, &Value::Object(root)).unwrap().to_native();
        // root = @0, leaf_b = @1, leaf_a = @2
        assert_eq!(native["again"]["@type"], "@2");
    }

    #[test]
    fn each_call_has_its_own_table() {
        let mut heap = Heap::new();
        let obj = heap.insert(DynamicObject::new("T"));

        let first = encode(&heap, &Value::Object(obj)).unwrap();
        let second = encode(&heap, &Value::Object(obj)).unwrap();
        assert_eq!(first, second);
        assert!(matches!(second, Envelope::Object { .. }));
    }

    #[test]
    fn unsupported_values_fail_fast() {
        let heap = Heap::new();
        let cases = [
            (Value::resource("/tmp/log"), OpaqueKind::Resource),
            (Value::callable("handler"), OpaqueKind::Callable),
            (Value::generator("naturals"), OpaqueKind::Generator),
        ];
        for (value, kind) in cases {
            let nested = Value::map([("ok", Value::Integer(1)), ("bad", value)]);
            assert!(matches!(
                encode(&heap, &nested),
                Err(SerdeError::UnsupportedValue { kind: k, .. }) if k == kind
            ));
        }
    }

    #[test]
    fn missing_object_is_reported() {
        let heap = Heap::new();
        let ghost = ObjectId::from_index(7);
        assert_eq!(
            encode(&heap, &Value::Object(ghost)),
            Err(SerdeError::MissingObject(ghost))
        );
    }

    #[test]
    fn reserved_keys_are_refused() {
        let mut heap = Heap::new();
        let tagged = heap.insert(DynamicObject::new("T").with_field("@scalar", Value::from(1)));
        assert_eq!(
            encode(&heap, &Value::Object(tagged)),
            Err(SerdeError::ReservedKey("@scalar".into()))
        );

        for tag in ["@type", "@value", "@map"] {
            let map = Value::map([("plain", Value::Null), (tag, Value::Null)]);
            assert_eq!(encode(&heap, &map), Err(SerdeError::ReservedKey(tag.into())));
        }

        let near_misses = Value::map([("type", Value::Null), ("@types", Value::Null)]);
        assert!(encode(&heap, &near_misses).is_ok());
    }

    #[test]
    fn depth_limit() {
        let heap = Heap::new();
        let mut value = Value::Integer(0);
        for _ in 0..10 {
            value = Value::Sequence(vec![value]);
        }

        let shallow = Encoder::new(CodecConfig::new().with_max_depth(5));
        assert_eq!(shallow.encode(&heap, &value), Err(SerdeError::DepthExceeded(5)));

        let deep = Encoder::new(CodecConfig::new().with_max_depth(11));
        assert!(deep.encode(&heap, &value).is_ok());
    }
}
