//! Escaping of keys that cannot be element names.
//!
//! Reserved envelope tags map to fixed aliases, and purely numeric keys are
//! written as `serializer_element_<type>_<key>`, where `<type>` records
//! whether the key was a list index (`integer`) or a map key (`string`).
//!
//! An empty element carries [`EMPTY_ATTRIBUTE`] when it stands for an empty
//! list or map, so neither reads back as an empty string.

use alloc::format;
use alloc::string::String;

use crate::envelope::{MAP_TAG, SCALAR_TAG, TYPE_TAG, VALUE_TAG};

/// Prefix of every escaped numeric key.
pub const ELEMENT_PREFIX: &str = "serializer_element_";

/// Reserved tags and the element names they are written as.
pub const RESERVED: [(&str, &str); 4] = [
    (TYPE_TAG, "serializer_type"),
    (SCALAR_TAG, "serializer_scalar"),
    (VALUE_TAG, "serializer_value"),
    (MAP_TAG, "serializer_map"),
];

/// Attribute marking an empty container; its value is [`EMPTY_LIST`] or
/// [`EMPTY_MAP`].
pub const EMPTY_ATTRIBUTE: &str = "serializer_empty";
pub const EMPTY_LIST: &str = "list";
pub const EMPTY_MAP: &str = "map";

const INTEGER_TYPES: [&str; 2] = ["integer", "int"];

/// Returns the alias of a reserved tag.
pub fn alias_of(key: &str) -> Option<&'static str> {
    RESERVED
        .iter()
        .find(|(tag, _)| *tag == key)
        .map(|(_, alias)| *alias)
}

/// Returns the reserved tag an alias stands for.
pub fn tag_of(alias: &str) -> Option<&'static str> {
    RESERVED
        .iter()
        .find(|(_, a)| *a == alias)
        .map(|(tag, _)| *tag)
}

/// Whether `key` is purely numeric: an optional `-`, then digits with at
/// most one `.`.
///
/// ```
/// use og_serde::xml::keys::is_numeric_key;
///
/// assert!(is_numeric_key("42"));
/// assert!(is_numeric_key("-1.5"));
/// assert!(!is_numeric_key("1e3"));
/// assert!(!is_numeric_key("-"));
/// ```
pub fn is_numeric_key(key: &str) -> bool {
    let digits = key.strip_prefix('-').unwrap_or(key);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

/// Element name of a list index.
#[inline]
pub fn index_name(index: usize) -> String {
    format!("{ELEMENT_PREFIX}integer_{index}")
}

/// Element name of a numeric map key.
#[inline]
pub fn numeric_key_name(key: &str) -> String {
    format!("{ELEMENT_PREFIX}string_{key}")
}

/// Whether `name` is usable as an element or attribute name.
///
/// Names start with a letter or `_` and continue with letters, digits,
/// `-`, `.` or `_`. Namespace prefixes are not supported.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_'))
}

/// A key recovered from an element name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedKey {
    Index(usize),
    Name(String),
}

/// Recovers the key an element name was written for.
///
/// ```
/// use og_serde::xml::keys::{DecodedKey, decode_element_name};
///
/// assert_eq!(decode_element_name("serializer_element_integer_3"), DecodedKey::Index(3));
/// assert_eq!(decode_element_name("serializer_element_string_3"), DecodedKey::Name("3".into()));
/// assert_eq!(decode_element_name("serializer_type"), DecodedKey::Name("@type".into()));
/// assert_eq!(decode_element_name("title"), DecodedKey::Name("title".into()));
/// ```
pub fn decode_element_name(name: &str) -> DecodedKey {
    let escaped = name
        .strip_prefix(ELEMENT_PREFIX)
        .and_then(|rest| rest.split_once('_'));
    if let Some((ty, token)) = escaped {
        return match token.parse::<usize>() {
            Ok(index) if INTEGER_TYPES.contains(&ty) => DecodedKey::Index(index),
            _ => DecodedKey::Name(String::from(token)),
        };
    }

    match tag_of(name) {
        Some(tag) => DecodedKey::Name(String::from(tag)),
        None => DecodedKey::Name(String::from(name)),
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{
        DecodedKey, alias_of, decode_element_name, index_name, is_valid_name, numeric_key_name,
        tag_of,
    };

    #[test]
    fn element_names() {
        assert!(is_valid_name("data"));
        assert!(is_valid_name("_x.y-z9"));
        assert!(is_valid_name("größe"));
        assert!(is_valid_name(&index_name(12)));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("0"));
        assert!(!is_valid_name("-a"));
        assert!(!is_valid_name("@type"));
        assert!(!is_valid_name("a b"));
        assert!(!is_valid_name("ns:tag"));
    }

    #[test]
    fn reserved_aliases_are_inverse() {
        for tag in ["@type", "@scalar", "@value", "@map"] {
            let alias = alias_of(tag).unwrap();
            assert!(alias.starts_with("serializer_"));
            assert_eq!(tag_of(alias), Some(tag));
        }
        assert_eq!(alias_of("type"), None);
    }

    #[test]
    fn numeric_names_keep_key_type() {
        assert_eq!(index_name(7), "serializer_element_integer_7");
        assert_eq!(decode_element_name(&index_name(7)), DecodedKey::Index(7));

        assert_eq!(numeric_key_name("7"), "serializer_element_string_7");
        assert_eq!(
            decode_element_name(&numeric_key_name("7")),
            DecodedKey::Name(String::from("7"))
        );

        assert_eq!(
            decode_element_name("serializer_element_int_2"),
            DecodedKey::Index(2)
        );
        assert_eq!(
            decode_element_name("serializer_element_integer_-2"),
            DecodedKey::Name(String::from("-2"))
        );
    }
}
