//! Small helpers over the `quick-xml` event writer.
//!
//! Every document nupack generates (nuspec, core properties, relationships,
//! content types) is a UTF-8 XML document with a declaration and two-space
//! indentation. Text and attribute values are escaped by `quick-xml`.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

/// Errors raised while rendering an XML document.
#[derive(Error, Debug)]
pub enum XmlError {
    /// The underlying buffer rejected a write.
    #[error("XML write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The XML writer rejected an event.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// In-memory XML document under construction.
pub struct XmlDocument {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl std::fmt::Debug for XmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlDocument")
            .field("len", &self.writer.get_ref().get_ref().len())
            .finish()
    }
}

impl XmlDocument {
    /// Start a new document and write the `<?xml ...?>` declaration.
    pub fn new() -> Result<Self, XmlError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(Self { writer })
    }

    /// Open an element with the given attributes.
    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), XmlError> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    /// Close an element previously opened with [`XmlDocument::start`].
    pub fn end(&mut self, name: &str) -> Result<(), XmlError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), XmlError> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    /// Write `<name>text</name>`.
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<(), XmlError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write `<name>text</name>` only when `text` is present.
    pub fn optional_element(&mut self, name: &str, text: Option<&str>) -> Result<(), XmlError> {
        match text {
            Some(text) => self.text_element(name, text),
            None => Ok(()),
        }
    }

    /// Consume the document and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner().into_inner()
    }
}
