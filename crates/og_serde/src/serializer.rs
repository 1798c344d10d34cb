use alloc::string::String;

use og_reflect::{Heap, TypeRegistry, Value};

use crate::{
    CodecConfig, Envelope, GraphCodec, JsonStrategy, NativeValue, NullStrategy, SerdeError,
    Strategy, XmlStrategy,
};

// -----------------------------------------------------------------------------
// Serializer

/// A [`GraphCodec`] paired with a wire [`Strategy`].
///
/// # Examples
///
/// ```
/// use og_reflect::{DynamicObject, Heap, TypeRegistry, Value};
/// use og_serde::JsonSerializer;
///
/// let mut registry = TypeRegistry::new();
/// registry.register_dynamic("T");
///
/// let mut heap = Heap::new();
/// let shared = heap.insert(DynamicObject::new("T").with_field("n", Value::from(1)));
/// let pair = Value::Sequence(vec![Value::Object(shared), Value::Object(shared)]);
///
/// let serializer = JsonSerializer::json(&registry);
/// let text = serializer.serialize(&heap, &pair).unwrap();
///
/// let mut copy = Heap::new();
/// let Value::Sequence(items) = serializer.unserialize(&text, &mut copy).unwrap() else {
///     unreachable!()
/// };
/// assert_eq!(copy.len(), 1);
/// assert_eq!(items[0], items[1]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'r, S: Strategy> {
    codec: GraphCodec<'r>,
    strategy: S,
}

/// Serializer writing JSON text.
pub type JsonSerializer<'r> = Serializer<'r, JsonStrategy>;

/// Serializer writing XML text.
pub type XmlSerializer<'r> = Serializer<'r, XmlStrategy>;

/// Serializer writing YAML text.
#[cfg(feature = "yaml")]
pub type YamlSerializer<'r> = Serializer<'r, crate::YamlStrategy>;

/// Serializer whose way back takes the native structure, for deep copies.
pub type DeepCopySerializer<'r> = Serializer<'r, NullStrategy>;

impl<'r, S: Strategy> Serializer<'r, S> {
    #[inline]
    pub const fn new(registry: &'r TypeRegistry, strategy: S) -> Self {
        Self {
            codec: GraphCodec::new(registry),
            strategy,
        }
    }

    #[inline]
    pub const fn with_config(registry: &'r TypeRegistry, strategy: S, config: CodecConfig) -> Self {
        Self {
            codec: GraphCodec::with_config(registry, config),
            strategy,
        }
    }

    #[inline]
    pub const fn codec(&self) -> &GraphCodec<'r> {
        &self.codec
    }

    #[inline]
    pub const fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Encodes `value` to its native envelope structure.
    pub fn to_native(&self, heap: &Heap, value: &Value) -> Result<NativeValue, SerdeError> {
        self.codec.serialize(heap, value).map(|envelope| envelope.to_native())
    }

    /// Rebuilds a value from a native envelope structure.
    ///
    /// The codec's [`CodecConfig::max_depth`] bounds the envelope nesting.
    pub fn from_native(&self, native: &NativeValue, heap: &mut Heap) -> Result<Value, SerdeError> {
        let envelope = Envelope::from_native_with_depth(native, self.codec.config().max_depth)?;
        self.codec.unserialize(&envelope, heap)
    }

    /// Encodes `value` and writes it as wire text.
    pub fn serialize(&self, heap: &Heap, value: &Value) -> Result<String, SerdeError> {
        let native = self.to_native(heap, value)?;
        let text = self.strategy.serialize(&native)?;
        log::debug!("{} serializer wrote {} bytes", self.strategy.name(), text.len());
        Ok(text)
    }

    /// Reads wire input and rebuilds its value, allocating objects in `heap`.
    ///
    /// # Errors
    ///
    /// Any error of [`Strategy::unserialize`],
    /// [`Envelope::from_native_with_depth`] or [`GraphCodec::unserialize`].
    /// The heap is left as it was on failure.
    pub fn unserialize<'a>(&self, wire: S::Wire<'a>, heap: &mut Heap) -> Result<Value, SerdeError> {
        let native = self.strategy.unserialize(wire)?;
        self.from_native(&native, heap)
    }
}

impl<'r> JsonSerializer<'r> {
    #[inline]
    pub const fn json(registry: &'r TypeRegistry) -> Self {
        Self::new(registry, JsonStrategy)
    }
}

impl<'r> XmlSerializer<'r> {
    #[inline]
    pub const fn xml(registry: &'r TypeRegistry) -> Self {
        Self::new(registry, XmlStrategy)
    }
}

#[cfg(feature = "yaml")]
impl<'r> YamlSerializer<'r> {
    #[inline]
    pub const fn yaml(registry: &'r TypeRegistry) -> Self {
        Self::new(registry, crate::YamlStrategy)
    }
}

impl<'r> DeepCopySerializer<'r> {
    #[inline]
    pub const fn deep_copy_of(registry: &'r TypeRegistry) -> Self {
        Self::new(registry, NullStrategy)
    }

    /// Copies `value` from `src` into `dst`.
    ///
    /// Every object reachable from `value` is copied once; sharing and
    /// cycles among them are kept.
    pub fn deep_copy(&self, src: &Heap, value: &Value, dst: &mut Heap) -> Result<Value, SerdeError> {
        let native = self.to_native(src, value)?;
        self.unserialize(native, dst)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use og_reflect::{DynamicObject, Heap, ObjectId, TypeRegistry, Value, impl_reflect};
    use serde_json::json;

    use super::{DeepCopySerializer, JsonSerializer, XmlSerializer};
    use crate::{CodecConfig, Envelope, SerdeError, Serializer, Strategy, XmlStrategy};

    #[derive(Debug, Default)]
    struct Author {
        user_id: i64,
        name: String,
    }

    impl_reflect!(Author as "Author" {
        "userId" => user_id,
        "name" => name,
    });

    #[derive(Debug, Default)]
    struct Post {
        post_id: i64,
        title: String,
        score: f64,
        author: Option<ObjectId>,
        related: Vec<ObjectId>,
    }

    impl_reflect!(Post as "Post" {
        "postId" => post_id,
        "title" => title,
        "score" => score,
        "author" => author,
        "related" => related,
    });

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<Author>();
        registry.register::<Post>();
        registry.register_dynamic("T");
        registry
    }

    /// Two posts by one author; the first lists itself and the second as related.
    fn blog(heap: &mut Heap) -> Value {
        let author = heap.insert(Author {
            user_id: 1,
            name: String::from("Post Author"),
        });
        let second = heap.insert(Post {
            post_id: 10,
            title: String::from("Second"),
            score: 17.0,
            author: Some(author),
            related: vec![],
        });
        let first = heap.insert(Post {
            post_id: 9,
            title: String::from("Hello World"),
            score: 2.5,
            author: Some(author),
            related: vec![],
        });
        heap.downcast_mut::<Post>(first).unwrap().related = vec![first, second];
        Value::Sequence(vec![Value::Object(first), Value::Object(second)])
    }

    fn assert_blog(heap: &Heap, value: &Value) {
        let Value::Sequence(items) = value else {
            panic!("expected a sequence, got {value:?}");
        };
        let first = items[0].as_object().unwrap();
        let second = items[1].as_object().unwrap();
        assert_eq!(heap.len(), 3);

        let post = heap.downcast_ref::<Post>(first).unwrap();
        assert_eq!(post.post_id, 9);
        assert_eq!(post.title, "Hello World");
        assert_eq!(post.score, 2.5);
        assert_eq!(post.related, vec![first, second]);

        let other = heap.downcast_ref::<Post>(second).unwrap();
        assert_eq!(other.score, 17.0);
        assert_eq!(other.author, post.author);

        let author = heap.downcast_ref::<Author>(post.author.unwrap()).unwrap();
        assert_eq!(author.user_id, 1);
        assert_eq!(author.name, "Post Author");
    }

    #[test]
    fn json_round_trip() {
        let registry = registry();
        let mut heap = Heap::new();
        let value = blog(&mut heap);

        let serializer = JsonSerializer::json(&registry);
        let text = serializer.serialize(&heap, &value).unwrap();
        assert!(text.contains(r#""score":{"@scalar":"float","@value":17}"#));

        let mut copy = Heap::new();
        let rebuilt = serializer.unserialize(&text, &mut copy).unwrap();
        assert_blog(&copy, &rebuilt);
    }

    #[test]
    fn xml_round_trip() {
        let registry = registry();
        let mut heap = Heap::new();
        let value = blog(&mut heap);

        let serializer = XmlSerializer::xml(&registry);
        let text = serializer.serialize(&heap, &value).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><data>"));

        let mut copy = Heap::new();
        let rebuilt = serializer.unserialize(&text, &mut copy).unwrap();
        assert_blog(&copy, &rebuilt);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_round_trip() {
        let registry = registry();
        let mut heap = Heap::new();
        let value = blog(&mut heap);

        let serializer = super::YamlSerializer::yaml(&registry);
        let text = serializer.serialize(&heap, &value).unwrap();

        let mut copy = Heap::new();
        let rebuilt = serializer.unserialize(&text, &mut copy).unwrap();
        assert_blog(&copy, &rebuilt);
    }

    #[test]
    fn xml_numeric_keys_keep_their_type() {
        let registry = registry();
        let heap = Heap::new();
        let serializer = XmlSerializer::xml(&registry);

        let list = Value::Sequence(vec![Value::from("a"), Value::from(2), Value::from(false)]);
        let text = serializer.serialize(&heap, &list).unwrap();
        assert!(text.contains("<serializer_element_integer_2>"));
        assert_eq!(serializer.unserialize(&text, &mut Heap::new()), Ok(list));

        let map = Value::map([("0", Value::from("a")), ("10", Value::from(2.5))]);
        let text = serializer.serialize(&heap, &map).unwrap();
        assert!(text.contains("<serializer_element_string_10>"));
        assert_eq!(serializer.unserialize(&text, &mut Heap::new()), Ok(map));
    }

    #[test]
    fn xml_scalars_keep_their_type() {
        let registry = registry();
        let heap = Heap::new();
        let serializer = XmlSerializer::xml(&registry);

        for value in [
            Value::Null,
            Value::from(true),
            Value::from(0),
            Value::from(-17.25),
            Value::Float(f64::INFINITY),
            Value::from(""),
            Value::from("  spaced  "),
            Value::from("42"),
        ] {
            let text = serializer.serialize(&heap, &value).unwrap();
            assert_eq!(serializer.unserialize(&text, &mut Heap::new()), Ok(value));
        }
    }

    #[test]
    fn negative_zero_round_trips() {
        let registry = registry();
        let heap = Heap::new();
        let json = JsonSerializer::json(&registry);
        let xml = XmlSerializer::xml(&registry);

        let text = json.serialize(&heap, &Value::Float(-0.0)).unwrap();
        assert_eq!(text, r#"{"@scalar":"float","@value":-0.0}"#);
        let back = json.unserialize(&text, &mut Heap::new());
        assert!(matches!(back, Ok(Value::Float(f)) if f == 0.0 && f.is_sign_negative()));

        let text = xml.serialize(&heap, &Value::Float(-0.0)).unwrap();
        let back = xml.unserialize(&text, &mut Heap::new());
        assert!(matches!(back, Ok(Value::Float(f)) if f == 0.0 && f.is_sign_negative()));
    }

    #[test]
    fn deep_copy_keeps_cycles() {
        let registry = registry();
        let mut heap = Heap::new();
        let c1 = heap.insert(DynamicObject::new("T"));
        heap.downcast_mut::<DynamicObject>(c1)
            .unwrap()
            .insert("mirror", Value::Object(c1));

        let serializer = DeepCopySerializer::deep_copy_of(&registry);
        assert_eq!(
            serializer.strategy().serialize(&serializer.to_native(&heap, &Value::Object(c1)).unwrap()),
            Ok(String::from(
                "{\n  \"@type\": \"T\",\n  \"mirror\": {\n    \"@type\": \"@0\"\n  }\n}"
            ))
        );

        let mut copy = Heap::new();
        copy.insert(DynamicObject::new("Existing"));
        let id = serializer
            .deep_copy(&heap, &Value::Object(c1), &mut copy)
            .unwrap()
            .as_object()
            .unwrap();
        assert_eq!(copy.len(), 2);
        let mirror = copy.downcast_ref::<DynamicObject>(id).unwrap().get("mirror");
        assert_eq!(mirror, Some(&Value::Object(id)));
    }

    #[test]
    fn from_native_rejects_unknown_types() {
        let registry = registry();
        let serializer = JsonSerializer::json(&registry);
        let mut heap = Heap::new();
        assert_eq!(
            serializer.from_native(&json!({"@type": "Comment"}), &mut heap),
            Err(SerdeError::UnknownType(String::from("Comment")))
        );
        assert!(heap.is_empty());
    }

    #[test]
    fn depth_limit_applies_to_both_directions() {
        let registry = registry();
        let config = CodecConfig::default().with_max_depth(3);
        let serializer = Serializer::with_config(&registry, XmlStrategy, config);

        let nested = Value::Sequence(vec![Value::Sequence(vec![Value::Sequence(vec![
            Value::Null,
        ])])]);
        assert_eq!(
            serializer.serialize(&Heap::new(), &nested),
            Err(SerdeError::DepthExceeded(3))
        );

        let text = XmlSerializer::xml(&registry)
            .serialize(&Heap::new(), &nested)
            .unwrap();
        assert_eq!(
            serializer.unserialize(&text, &mut Heap::new()),
            Err(SerdeError::DepthExceeded(3))
        );
    }

    /// `levels` values deep: nested sequences around an integer.
    fn nested(levels: usize) -> Value {
        (1..levels).fold(Value::from(1), |inner, _| Value::Sequence(vec![inner]))
    }

    #[test]
    fn deepest_accepted_graph_round_trips() {
        let registry = registry();
        let heap = Heap::new();
        let deepest = nested(CodecConfig::DEFAULT_MAX_DEPTH);

        let json = JsonSerializer::json(&registry);
        let text = json.serialize(&heap, &deepest).unwrap();
        assert_eq!(json.unserialize(&text, &mut Heap::new()), Ok(deepest.clone()));

        let xml = XmlSerializer::xml(&registry);
        let text = xml.serialize(&heap, &deepest).unwrap();
        assert_eq!(xml.unserialize(&text, &mut Heap::new()), Ok(deepest.clone()));

        let copy = DeepCopySerializer::deep_copy_of(&registry);
        assert_eq!(copy.deep_copy(&heap, &deepest, &mut Heap::new()), Ok(deepest));

        let too_deep = nested(CodecConfig::DEFAULT_MAX_DEPTH + 1);
        assert_eq!(
            json.serialize(&heap, &too_deep),
            Err(SerdeError::DepthExceeded(CodecConfig::DEFAULT_MAX_DEPTH))
        );
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_refuses_graphs_it_cannot_read_back() {
        let registry = registry();
        let heap = Heap::new();
        let yaml = super::YamlSerializer::yaml(&registry);

        let readable = nested(crate::YAML_MAX_NESTING / 2);
        let text = yaml.serialize(&heap, &readable).unwrap();
        assert_eq!(yaml.unserialize(&text, &mut Heap::new()), Ok(readable));

        assert_eq!(
            yaml.serialize(&heap, &nested(crate::YAML_MAX_NESTING / 2 + 1)),
            Err(SerdeError::DepthExceeded(crate::YAML_MAX_NESTING))
        );
    }

    #[test]
    fn deep_native_input_is_refused() {
        let registry = registry();
        let native = (0..600).fold(json!({"@scalar": "NULL", "@value": null}), |inner, _| {
            json!({"@map": "array", "@value": [inner]})
        });

        assert_eq!(
            Envelope::from_native(&native),
            Err(SerdeError::DepthExceeded(CodecConfig::DEFAULT_MAX_DEPTH))
        );

        let config = CodecConfig::default().with_max_depth(40);
        let serializer = Serializer::with_config(&registry, XmlStrategy, config);
        let mut heap = Heap::new();
        assert_eq!(
            serializer.from_native(&native, &mut heap),
            Err(SerdeError::DepthExceeded(40))
        );
        assert!(heap.is_empty());
    }

    #[test]
    fn malformed_wire_text() {
        let registry = registry();
        let serializer = JsonSerializer::json(&registry);
        let err = serializer.unserialize("{\"@type\":", &mut Heap::new()).unwrap_err();
        assert!(matches!(err, SerdeError::MalformedInput { format: "json", .. }));
    }
}
