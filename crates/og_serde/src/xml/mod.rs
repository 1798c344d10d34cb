//! XML support shared by the XML strategy and transformer.
//!
//! Documents are written through [`quick_xml::Writer`]; [`keys`] turns keys
//! that are not valid element names into ones that are.

// -----------------------------------------------------------------------------
// Modules

pub mod keys;

// -----------------------------------------------------------------------------
// ElementWriter

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Display;

use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::SerdeError;
use keys::is_valid_name;

const FORMAT: &str = "xml";

/// Writes a document one element at a time, starting with the declaration.
///
/// Element and attribute names are checked with [`keys::is_valid_name`].
/// Text and attribute values are escaped; characters XML 1.0 cannot carry
/// at all (control characters other than tab, line feed and carriage
/// return, `U+FFFE` and `U+FFFF`) fail the write.
///
/// # Examples
///
/// ```
/// use og_serde::xml::ElementWriter;
///
/// let mut out = ElementWriter::compact().unwrap();
/// out.start("data", None).unwrap();
/// out.leaf("name", Some(("type", "string")), "a & b").unwrap();
/// out.leaf("empty", None, "").unwrap();
/// out.end("data").unwrap();
///
/// assert_eq!(
///     out.finish().unwrap(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
///      <data><name type=\"string\">a &amp; b</name><empty/></data>"
/// );
/// ```
pub struct ElementWriter {
    writer: Writer<Vec<u8>>,
}

impl ElementWriter {
    /// No whitespace between tags.
    pub fn compact() -> Result<Self, SerdeError> {
        Self::begin(Writer::new(Vec::new()))
    }

    /// Every element on its own line, indented by `indent` spaces per
    /// level. Text stays inline with its element.
    pub fn pretty(indent: usize) -> Result<Self, SerdeError> {
        Self::begin(Writer::new_with_indent(Vec::new(), b' ', indent))
    }

    fn begin(writer: Writer<Vec<u8>>) -> Result<Self, SerdeError> {
        let mut this = Self { writer };
        this.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(this)
    }

    /// Opens element `name`.
    pub fn start(&mut self, name: &str, attribute: Option<(&str, &str)>) -> Result<(), SerdeError> {
        let start = open_tag(name, attribute)?;
        self.write(Event::Start(start))
    }

    /// Closes element `name`.
    pub fn end(&mut self, name: &str) -> Result<(), SerdeError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Writes element `name` holding `text`; self-closing when `text` is
    /// empty.
    pub fn leaf(
        &mut self,
        name: &str,
        attribute: Option<(&str, &str)>,
        text: &str,
    ) -> Result<(), SerdeError> {
        let start = open_tag(name, attribute)?;
        if text.is_empty() {
            return self.write(Event::Empty(start));
        }
        let text = escape_text(text)?;
        self.write(Event::Start(start))?;
        self.write(Event::Text(BytesText::from_escaped(text)))?;
        self.end(name)
    }

    /// Returns the document text.
    pub fn finish(self) -> Result<String, SerdeError> {
        String::from_utf8(self.writer.into_inner()).map_err(write_failed)
    }

    #[inline]
    fn write(&mut self, event: Event<'_>) -> Result<(), SerdeError> {
        self.writer.write_event(event).map_err(write_failed)
    }
}

fn open_tag<'a>(
    name: &'a str,
    attribute: Option<(&'a str, &'a str)>,
) -> Result<BytesStart<'a>, SerdeError> {
    check_name(name)?;
    let mut start = BytesStart::new(name);
    if let Some((key, value)) = attribute {
        check_name(key)?;
        check_chars(value)?;
        start.push_attribute((key, value));
    }
    Ok(start)
}

#[inline]
fn check_name(name: &str) -> Result<(), SerdeError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(SerdeError::InvalidElementName(String::from(name)))
    }
}

/// Whether XML 1.0 can carry `c`, escaped or not.
#[inline]
const fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn check_chars(text: &str) -> Result<(), SerdeError> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(SerdeError::WriteFailed {
            format: FORMAT,
            reason: format!("U+{:04X} cannot appear in an XML 1.0 document", u32::from(c)),
        }),
        None => Ok(()),
    }
}

// Parsers fold a literal carriage return into a line feed; a character
// reference survives.
fn escape_text(text: &str) -> Result<Cow<'_, str>, SerdeError> {
    check_chars(text)?;
    let escaped = escape(text);
    if escaped.contains('\r') {
        Ok(Cow::Owned(escaped.replace('\r', "&#13;")))
    } else {
        Ok(escaped)
    }
}

#[inline]
fn write_failed(e: impl Display) -> SerdeError {
    SerdeError::WriteFailed {
        format: FORMAT,
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::ElementWriter;
    use crate::SerdeError;

    #[test]
    fn pretty_output_keeps_text_inline() {
        let mut out = ElementWriter::pretty(2).unwrap();
        out.start("data", None).unwrap();
        out.start("author", None).unwrap();
        out.leaf("name", Some(("type", "string")), "Ann").unwrap();
        out.end("author").unwrap();
        out.leaf("tags", None, "").unwrap();
        out.end("data").unwrap();

        assert_eq!(
            out.finish().unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <data>\n\
             \x20 <author>\n\
             \x20   <name type=\"string\">Ann</name>\n\
             \x20 </author>\n\
             \x20 <tags/>\n\
             </data>"
        );
    }

    #[test]
    fn escapes_markup_and_carriage_returns() {
        let mut out = ElementWriter::compact().unwrap();
        out.leaf("v", Some(("note", "\"q\"")), "<a>&\r\n").unwrap();
        let text = out.finish().unwrap();
        assert!(text.ends_with("<v note=\"&quot;q&quot;\">&lt;a&gt;&amp;&#13;\n</v>"));
    }

    #[test]
    fn rejects_what_xml_cannot_carry() {
        let mut out = ElementWriter::compact().unwrap();
        assert!(matches!(
            out.leaf("v", None, "bell \u{7}"),
            Err(SerdeError::WriteFailed { format: "xml", .. })
        ));
        assert!(matches!(
            out.leaf("v", Some(("note", "\u{FFFF}")), ""),
            Err(SerdeError::WriteFailed { format: "xml", .. })
        ));
        assert_eq!(
            out.start("1st", None),
            Err(SerdeError::InvalidElementName("1st".into()))
        );
        assert_eq!(
            out.leaf("v", Some(("a b", "x")), ""),
            Err(SerdeError::InvalidElementName("a b".into()))
        );
    }
}
