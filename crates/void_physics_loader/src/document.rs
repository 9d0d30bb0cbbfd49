//! Element dispatcher
//!
//! Decodes a document into a flat sequence of "element started" events.
//! Closing tags and text are never delivered, so structure is carried only by
//! the order in which opening tags appear. Handlers receive elements whose
//! names were registered with the dispatcher and a single end-of-document
//! signal once the whole input decoded cleanly.

use crate::error::{LoaderError, Result};
use crate::tags::Tag;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashSet;
use std::fmt::Display;
use std::io::BufRead;

/// Attributes of one element, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Create an empty attribute list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Value of the first attribute with this name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no attributes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// An "element started" event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Attributes,
}

impl Element {
    /// Create an element event
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    /// Element name as written in the document
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Known tag, if the name is part of the vocabulary
    pub fn tag(&self) -> Option<Tag> {
        Tag::from_name(&self.name)
    }

    /// All attributes
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Required string attribute
    pub fn required_str(&self, attribute: &str) -> Result<&str> {
        self.attributes
            .get(attribute)
            .ok_or_else(|| LoaderError::missing_attribute(&self.name, attribute))
    }

    /// Required finite float attribute; `NaN` and infinities are rejected
    pub fn required_f32(&self, attribute: &str) -> Result<f32> {
        let raw = self.required_str(attribute)?;
        raw.trim()
            .parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| self.malformed_number(attribute, raw, "finite float"))
    }

    /// Required boolean attribute (`true`/`false`, any case)
    pub fn required_bool(&self, attribute: &str) -> Result<bool> {
        let raw = self.required_str(attribute)?;
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(LoaderError::MalformedFlag {
                element: self.name.clone(),
                attribute: attribute.to_string(),
                value: raw.to_string(),
            })
        }
    }

    /// Required 16-bit filter attribute.
    ///
    /// Accepts anything that fits into 16 bits, signed or unsigned; values
    /// above `i16::MAX` keep their bit pattern (`65535` becomes `-1`).
    pub fn required_filter_bits(&self, attribute: &str) -> Result<i16> {
        let raw = self.required_str(attribute)?;
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| self.malformed_number(attribute, raw, "16-bit integer"))?;

        if let Ok(signed) = i16::try_from(value) {
            return Ok(signed);
        }
        match u16::try_from(value) {
            Ok(bits) => Ok(bits as i16),
            Err(_) => Err(LoaderError::FilterBitsOverflow {
                element: self.name.clone(),
                attribute: attribute.to_string(),
                value,
            }),
        }
    }

    fn malformed_number(&self, attribute: &str, raw: &str, expected: &'static str) -> LoaderError {
        LoaderError::MalformedNumber {
            element: self.name.clone(),
            attribute: attribute.to_string(),
            value: raw.to_string(),
            expected,
        }
    }
}

/// Receiver of dispatched elements
pub trait ElementHandler {
    /// Called once per registered opening tag, in document order
    fn on_element(&mut self, element: &Element) -> Result<()>;

    /// Called once after the last element of a well-formed document
    fn on_end_document(&mut self) -> Result<()>;
}

/// Decodes documents and forwards registered elements to a handler
#[derive(Debug, Clone, Default)]
pub struct ElementDispatcher {
    registered: HashSet<String>,
}

impl ElementDispatcher {
    /// Create a dispatcher with nothing registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher with the given tags registered
    pub fn with_tags(tags: impl IntoIterator<Item = Tag>) -> Self {
        let mut dispatcher = Self::new();
        for tag in tags {
            dispatcher.register(tag.as_str());
        }
        dispatcher
    }

    /// Register an element name
    pub fn register(&mut self, name: &str) {
        self.registered.insert(name.to_string());
    }

    /// Whether elements with this name are delivered
    pub fn is_registered(&self, name: &str) -> bool {
        self.registered.contains(name)
    }

    /// Dispatch a document held in memory
    pub fn dispatch_str<H: ElementHandler + ?Sized>(&self, xml: &str, handler: &mut H) -> Result<()> {
        self.dispatch_reader(xml.as_bytes(), handler)
    }

    /// Dispatch a document from any buffered reader
    pub fn dispatch_reader<R, H>(&self, source: R, handler: &mut H) -> Result<()>
    where
        R: BufRead,
        H: ElementHandler + ?Sized,
    {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            let position = reader.buffer_position() as u64;
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    self.deliver(e, position, handler)?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(xml_error(reader.buffer_position() as u64, e)),
            }
            buf.clear();
        }

        handler.on_end_document()
    }

    fn deliver<H: ElementHandler + ?Sized>(&self, start: &BytesStart<'_>, position: u64, handler: &mut H) -> Result<()> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| xml_error(position, e))?
            .to_string();
        if !self.is_registered(&name) {
            return Ok(());
        }

        let mut attributes = Attributes::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| xml_error(position, e))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| xml_error(position, e))?
                .to_string();
            let value = attr.unescape_value().map_err(|e| xml_error(position, e))?;
            attributes.push(key, value.into_owned());
        }

        handler.on_element(&Element::new(name, attributes))
    }
}

fn xml_error(position: u64, error: impl Display) -> LoaderError {
    LoaderError::Xml {
        position,
        message: error.to_string(),
    }
}
