use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Display;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::Map;

use super::{MAX_NESTING, Strategy, check_nesting};
use crate::xml::ElementWriter;
use crate::xml::keys::{self, DecodedKey, EMPTY_ATTRIBUTE, EMPTY_LIST, EMPTY_MAP};
use crate::{NativeValue, SerdeError};

const FORMAT: &str = "xml";

/// Name of the document element.
const ROOT: &str = "data";

/// XML text under a single `data` element.
///
/// Reserved envelope tags are written as their aliases (`@type` as
/// `serializer_type`), list indices as `serializer_element_integer_<i>` and
/// purely numeric map keys as `serializer_element_string_<key>`, so both
/// key types survive the round trip. Leaves carry their value as text; the
/// envelope's scalar tags restore the types on the way back.
///
/// An empty list or map is an empty element marked with a
/// `serializer_empty` attribute and reads back as `[]` or `{}`. Elements
/// nest at most one level deeper than [`MAX_NESTING`].
///
/// # Examples
///
/// ```
/// use og_serde::{Strategy, XmlStrategy};
/// use serde_json::json;
///
/// let text = XmlStrategy.serialize(&json!({"@scalar": "integer", "@value": 0})).unwrap();
/// assert_eq!(
///     text,
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
///      <data><serializer_scalar>integer</serializer_scalar>\
///      <serializer_value>0</serializer_value></data>"
/// );
/// assert_eq!(
///     XmlStrategy.unserialize(&text).unwrap(),
///     json!({"@scalar": "integer", "@value": "0"})
/// );
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct XmlStrategy;

impl Strategy for XmlStrategy {
    type Wire<'a> = &'a str;

    #[inline]
    fn name(&self) -> &str {
        FORMAT
    }

    fn serialize(&self, native: &NativeValue) -> Result<String, SerdeError> {
        check_nesting(native, MAX_NESTING)?;
        let mut out = ElementWriter::compact()?;
        write_value(&mut out, ROOT, native)?;
        out.finish()
    }

    fn unserialize<'a>(&self, wire: &'a str) -> Result<NativeValue, SerdeError> {
        read_document(wire)
    }
}

// -----------------------------------------------------------------------------
// Native -> XML

fn write_value(
    out: &mut ElementWriter,
    name: &str,
    native: &NativeValue,
) -> Result<(), SerdeError> {
    match native {
        NativeValue::Object(entries) if entries.is_empty() => {
            out.leaf(name, Some((EMPTY_ATTRIBUTE, EMPTY_MAP)), "")
        }
        NativeValue::Array(items) if items.is_empty() => {
            out.leaf(name, Some((EMPTY_ATTRIBUTE, EMPTY_LIST)), "")
        }
        NativeValue::Object(entries) => {
            out.start(name, None)?;
            for (key, value) in entries {
                write_value(out, &element_name(key), value)?;
            }
            out.end(name)
        }
        NativeValue::Array(items) => {
            out.start(name, None)?;
            for (index, value) in items.iter().enumerate() {
                write_value(out, &keys::index_name(index), value)?;
            }
            out.end(name)
        }
        NativeValue::Null => out.leaf(name, None, ""),
        NativeValue::Bool(v) => out.leaf(name, None, &v.to_string()),
        NativeValue::Number(v) => out.leaf(name, None, &v.to_string()),
        NativeValue::String(v) => out.leaf(name, None, v),
    }
}

fn element_name(key: &str) -> Cow<'_, str> {
    match keys::alias_of(key) {
        Some(alias) => Cow::Borrowed(alias),
        None if keys::is_numeric_key(key) => Cow::Owned(keys::numeric_key_name(key)),
        None => Cow::Borrowed(key),
    }
}

// -----------------------------------------------------------------------------
// XML -> native

/// An element whose end tag has not been read yet.
struct OpenElement {
    key: DecodedKey,
    empty: Option<String>,
    text: String,
    children: Vec<(DecodedKey, NativeValue)>,
}

impl OpenElement {
    fn new(start: &BytesStart<'_>) -> Result<Self, SerdeError> {
        let qname = start.name();
        let name = core::str::from_utf8(qname.as_ref()).map_err(malformed)?;
        let mut empty = None;
        for attribute in start.attributes() {
            let attribute = attribute.map_err(malformed)?;
            if attribute.key.as_ref() == EMPTY_ATTRIBUTE.as_bytes() {
                empty = Some(attribute.unescape_value().map_err(malformed)?.into_owned());
            }
        }
        Ok(Self {
            key: keys::decode_element_name(name),
            empty,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// A leaf is its text. Children named by consecutive indices from 0
    /// form a list; any other children form a map.
    fn into_native(self) -> NativeValue {
        if self.children.is_empty() {
            return match self.empty.as_deref() {
                Some(EMPTY_LIST) if self.text.is_empty() => NativeValue::Array(Vec::new()),
                Some(EMPTY_MAP) if self.text.is_empty() => NativeValue::Object(Map::new()),
                _ => NativeValue::String(self.text),
            };
        }

        let is_list = self
            .children
            .iter()
            .enumerate()
            .all(|(position, (key, _))| *key == DecodedKey::Index(position));
        if is_list {
            return NativeValue::Array(self.children.into_iter().map(|(_, value)| value).collect());
        }

        let mut map = Map::new();
        for (key, value) in self.children {
            let key = match key {
                DecodedKey::Index(index) => index.to_string(),
                DecodedKey::Name(name) => name,
            };
            map.insert(key, value);
        }
        NativeValue::Object(map)
    }
}

/// Reads the document element with an explicit stack of open elements.
///
/// Declarations, comments, processing instructions and doctypes are
/// skipped; CDATA counts as text.
fn read_document(wire: &str) -> Result<NativeValue, SerdeError> {
    let mut reader = Reader::from_str(wire);
    let mut open: Vec<OpenElement> = Vec::new();
    let mut root = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            malformed(format_args!("{e} at byte {}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(start) => {
                if open.len() > MAX_NESTING {
                    return Err(SerdeError::DepthExceeded(MAX_NESTING));
                }
                open.push(OpenElement::new(&start)?);
            }
            Event::Empty(start) => close(&mut open, &mut root, OpenElement::new(&start)?)?,
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| SerdeError::malformed(FORMAT, "unexpected end tag"))?;
                close(&mut open, &mut root, element)?;
            }
            Event::Text(text) => push_text(&mut open, &text.unescape().map_err(malformed)?)?,
            Event::CData(data) => {
                push_text(&mut open, core::str::from_utf8(&data).map_err(malformed)?)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(SerdeError::malformed(FORMAT, "document ends inside an element"));
    }
    root.ok_or_else(|| SerdeError::malformed(FORMAT, "no document element"))
}

fn close(
    open: &mut [OpenElement],
    root: &mut Option<NativeValue>,
    element: OpenElement,
) -> Result<(), SerdeError> {
    let key = element.key.clone();
    let value = element.into_native();
    match open.last_mut() {
        Some(parent) => parent.children.push((key, value)),
        None if root.is_some() => {
            return Err(SerdeError::malformed(FORMAT, "more than one document element"));
        }
        None => *root = Some(value),
    }
    Ok(())
}

fn push_text(open: &mut [OpenElement], text: &str) -> Result<(), SerdeError> {
    match open.last_mut() {
        Some(element) => element.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => return Err(SerdeError::malformed(FORMAT, "text outside the document element")),
    }
    Ok(())
}

#[inline]
fn malformed(e: impl Display) -> SerdeError {
    SerdeError::malformed(FORMAT, e.to_string())
}
