use alloc::vec::Vec;

use og_reflect::{Heap, ObjectId, TypeRegistry, Value};

use super::DepthGuard;
use crate::{CodecConfig, Envelope, MapBody, SerdeError};

// -----------------------------------------------------------------------------
// Decoder

/// Rebuilds a [`Value`] graph from an [`Envelope`].
///
/// Objects are allocated blank through the [`TypeRegistry`] and stored in
/// the heap passed to [`decode`](Self::decode).
///
/// # Examples
///
/// ```
/// use og_reflect::{Heap, TypeRegistry, Value};
/// use og_serde::{CodecConfig, Decoder, Envelope, SerdeError};
/// use serde_json::json;
///
/// let registry = TypeRegistry::new();
/// let decoder = Decoder::new(&registry, CodecConfig::default());
/// let mut heap = Heap::new();
///
/// let dangling = Envelope::from_native(&json!({"@type": "@3"})).unwrap();
/// assert_eq!(
///     decoder.decode(&dangling, &mut heap),
///     Err(SerdeError::UnknownReference(3))
/// );
///
/// let unknown = Envelope::from_native(&json!({"@type": "Ghost"})).unwrap();
/// assert_eq!(
///     decoder.decode(&unknown, &mut heap),
///     Err(SerdeError::UnknownType("Ghost".into()))
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r TypeRegistry,
    config: CodecConfig,
}

impl<'r> Decoder<'r> {
    #[inline]
    pub const fn new(registry: &'r TypeRegistry, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    /// Decodes `envelope`, allocating its objects in `heap`.
    ///
    /// On failure every object allocated by this call is removed from the
    /// heap again; objects that were already there are left untouched.
    ///
    /// # Errors
    ///
    /// - [`SerdeError::UnknownType`] for a type name missing from the registry.
    /// - [`SerdeError::UnknownReference`] for a back-reference to an index
    ///   not yet registered in this call.
    /// - [`SerdeError::Property`] when an object rejects a decoded field.
    /// - [`SerdeError::DepthExceeded`] past [`CodecConfig::max_depth`].
    pub fn decode(&self, envelope: &Envelope, heap: &mut Heap) -> Result<Value, SerdeError> {
        let start = heap.len();
        let output = {
            let mut state = DecodeState {
                registry: self.registry,
                heap: &mut *heap,
                table: Vec::new(),
                guard: DepthGuard::new(self.config.max_depth),
            };
            state.decode(envelope)
        };

        match &output {
            Ok(_) => log::debug!("decoded value graph with {} objects", heap.len() - start),
            Err(e) => {
                log::debug!("decode failed, discarding {} objects: {e}", heap.len() - start);
                heap.truncate(start);
            }
        }
        output
    }
}

// -----------------------------------------------------------------------------
// DecodeState

struct DecodeState<'a> {
    registry: &'a TypeRegistry,
    heap: &'a mut Heap,
    /// Reference index to the rebuilt object.
    table: Vec<ObjectId>,
    guard: DepthGuard,
}

impl DecodeState<'_> {
    fn decode(&mut self, envelope: &Envelope) -> Result<Value, SerdeError> {
        self.guard.enter()?;
        let output = self.decode_inner(envelope);
        self.guard.leave();
        output
    }

    fn decode_inner(&mut self, envelope: &Envelope) -> Result<Value, SerdeError> {
        match envelope {
            Envelope::Scalar(scalar) => Ok(scalar.clone().into_value()),
            Envelope::Map(MapBody::Sequence(items)) => items
                .iter()
                .map(|item| self.decode(item))
                .collect::<Result<_, _>>()
                .map(Value::Sequence),
            Envelope::Map(MapBody::Associative(entries)) => {
                let mut map = og_utils::OrderedMap::default();
                for (key, item) in entries {
                    map.insert(key.clone(), self.decode(item)?);
                }
                Ok(Value::Map(map))
            }
            Envelope::BackReference(index) => self
                .table
                .get(*index)
                .copied()
                .map(Value::Object)
                .ok_or(SerdeError::UnknownReference(*index)),
            Envelope::Object {
                type_name,
                properties,
            } => {
                let blank = self
                    .registry
                    .allocate(type_name)
                    .ok_or_else(|| SerdeError::UnknownType(type_name.clone()))?;

                // Registered before hydration: fields may refer back to it.
                let id = self.heap.insert_boxed(blank);
                log::trace!("allocated `{type_name}` as {id}, registered as @{}", self.table.len());
                self.table.push(id);

                for (property, item) in properties {
                    let field = self.decode(item)?;
                    self.heap
                        .get_mut(id)
                        .ok_or(SerdeError::MissingObject(id))?
                        .set_field(property, field)
                        .map_err(|source| SerdeError::Property {
                            type_name: type_name.clone(),
                            property: property.clone(),
                            source,
                        })?;
                }
                Ok(Value::Object(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use og_reflect::{
        DynamicObject, Heap, ObjectId, Reflect, ReflectError, TypeRegistry, Value, impl_reflect,
    };
    use serde_json::json;

    use super::Decoder;
    use crate::{CodecConfig, Encoder, Envelope, SerdeError};

    #[derive(Debug, Default)]
    struct Person {
        name: String,
        friend: Option<ObjectId>,
    }

    impl_reflect!(Person as "Person" {
        "name" => name,
        "friend" => friend,
    });

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Person>();
        registry.register_dynamic("T");
        registry
    }

    fn decode(native: serde_json::Value, heap: &mut Heap) -> Result<Value, SerdeError> {
        let registry = registry();
        let envelope = Envelope::from_native(&native)?;
        Decoder::new(&registry, CodecConfig::default()).decode(&envelope, heap)
    }

    #[test]
    fn mutual_references_are_rebuilt() {
        let native = json!({
            "@type": "Person",
            "name": {"@scalar": "string", "@value": "ann"},
            "friend": {
                "@type": "Person",
                "name": {"@scalar": "string", "@value": "bob"},
                "friend": {"@type": "@0"},
            },
        });

        let mut heap = Heap::new();
        let ann = decode(native, &mut heap).unwrap().as_object().unwrap();

        let bob = heap.downcast_ref::<Person>(ann).unwrap().friend.unwrap();
        assert_eq!(heap.downcast_ref::<Person>(bob).unwrap().name, "bob");
        assert_eq!(heap.downcast_ref::<Person>(bob).unwrap().friend, Some(ann));
    }

    #[test]
    fn containers_are_rebuilt_in_order() {
        let native = json!({"@map": "array", "@value": {
            "z": {"@scalar": "integer", "@value": 1},
            "a": {"@map": "array", "@value": [{"@scalar": "boolean", "@value": true}]},
        }});

        let mut heap = Heap::new();
        let value = decode(native, &mut heap).unwrap();
        assert_eq!(
            value,
            Value::map([
                ("z", Value::Integer(1)),
                ("a", Value::Sequence(vec![Value::Bool(true)])),
            ])
        );
    }

    #[test]
    fn forward_reference_fails() {
        let native = json!({"@map": "array", "@value": [
            {"@type": "@1"},
            {"@type": "T"},
        ]});

        let mut heap = Heap::new();
        assert_eq!(decode(native, &mut heap), Err(SerdeError::UnknownReference(1)));
    }

    #[test]
    fn failure_discards_partial_objects() {
        let mut heap = Heap::new();
        let existing = heap.insert(DynamicObject::new("Kept"));

        let native = json!({
            "@type": "T",
            "child": {"@type": "T"},
            "broken": {"@type": "Unregistered"},
        });
        assert_eq!(
            decode(native, &mut heap),
            Err(SerdeError::UnknownType(String::from("Unregistered")))
        );
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.get(existing).unwrap().type_name(), "Kept");
    }

    #[test]
    fn property_errors_name_type_and_key() {
        let native = json!({
            "@type": "Person",
            "name": {"@scalar": "integer", "@value": 5},
        });

        let mut heap = Heap::new();
        assert_eq!(
            decode(native, &mut heap),
            Err(SerdeError::Property {
                type_name: String::from("Person"),
                property: String::from("name"),
                source: ReflectError::TypeMismatch {
                    expected: "string",
                    found: "integer",
                },
            })
        );
    }

    #[test]
    fn round_trip_preserves_identity_pattern() {
        let mut heap = Heap::new();
        let a = heap.insert(DynamicObject::new("T"));
        let b = heap.insert(DynamicObject::new("T").with_field("back", Value::Object(a)));
        heap.downcast_mut::<DynamicObject>(a)
            .unwrap()
            .insert("next", Value::Object(b));
        let value = Value::Sequence(vec![Value::Object(a), Value::Object(b), Value::Float(0.5)]);

        let registry = registry();
        let encoder = Encoder::default();
        let envelope = encoder.encode(&heap, &value).unwrap();

        let mut copy = Heap::new();
        let rebuilt = Decoder::new(&registry, CodecConfig::default())
            .decode(&envelope, &mut copy)
            .unwrap();

        assert_eq!(copy.len(), 2);
        assert_eq!(encoder.encode(&copy, &rebuilt), Ok(envelope));
    }
}
