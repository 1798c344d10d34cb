//! One-way projections of value graphs for presentation and export.
//!
//! A [`Transformer`] encodes a graph with the graph codec and then reduces
//! the envelope to a plain structure (see [`plain`]): scalars lose their
//! type tags, objects lose their type names and become maps of their
//! properties, and back-references become empty maps. The plain structure
//! is rendered as compact JSON ([`ArrayTransformer`]), a single-level map
//! of dot-joined paths ([`FlatArrayTransformer`]), pretty JSON
//! ([`JsonTransformer`]), typed XML ([`XmlTransformer`]) or YAML
//! ([`YamlTransformer`], `yaml` feature).
//!
//! Type names and identity are gone after the projection, so nothing here
//! can be read back: every [`Transformer::unserialize`] fails with
//! [`SerdeError::NotSupported`].

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod array;
mod flat_array;
mod json;
mod xml;

#[cfg(feature = "yaml")]
mod yaml;

pub mod plain;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use array::ArrayTransformer;
pub use flat_array::FlatArrayTransformer;
pub use json::JsonTransformer;
pub use xml::XmlTransformer;

#[cfg(feature = "yaml")]
pub use yaml::YamlTransformer;

use alloc::string::String;

use og_reflect::{Heap, Value};
use og_serde::SerdeError;

// -----------------------------------------------------------------------------
// Transformer

/// Renders a value graph as presentation text.
pub trait Transformer {
    /// Short identifier, also carried by [`SerdeError::NotSupported`].
    fn name(&self) -> &str;

    fn serialize(&self, heap: &Heap, value: &Value) -> Result<String, SerdeError>;

    /// Always fails: a projection cannot be reversed.
    fn unserialize(&self, _input: &str, _heap: &mut Heap) -> Result<Value, SerdeError> {
        Err(SerdeError::NotSupported(String::from(self.name())))
    }
}

// -----------------------------------------------------------------------------
// Shared test fixtures

#[cfg(test)]
pub(crate) mod fixtures {
    use alloc::string::String;

    use og_reflect::{Heap, ObjectId, Value, impl_reflect};

    #[derive(Debug, Default)]
    pub struct Author {
        pub user_id: i64,
        pub name: String,
    }

    impl_reflect!(Author as "Author" {
        "userId" => user_id,
        "name" => name,
    });

    #[derive(Debug, Default)]
    pub struct Post {
        pub post_id: i64,
        pub title: String,
        pub author: Option<ObjectId>,
    }

    impl_reflect!(Post as "Post" {
        "postId" => post_id,
        "title" => title,
        "author" => author,
    });

    /// `postId=9, title="Hello World", author={userId:1, name:"Post Author"}`.
    pub fn post(heap: &mut Heap) -> Value {
        let author = heap.insert(Author {
            user_id: 1,
            name: String::from("Post Author"),
        });
        let post = heap.insert(Post {
            post_id: 9,
            title: String::from("Hello World"),
            author: Some(author),
        });
        Value::Object(post)
    }
}
