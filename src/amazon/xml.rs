//! Owned XML element tree with safe dotted-path lookups.
//!
//! Responses are parsed once into an [`Element`] tree. Views own the subtree
//! they wrap and read it through the `find*` accessors, which resolve a path
//! like `Offers.Offer.OfferListing` one child at a time and return `None` the
//! moment a segment is missing.

use crate::amazon::error::{ApiError, Result};
use chrono::NaiveDate;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::BTreeMap;

/// A parsed XML element. Namespace prefixes are dropped from names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Parses a complete XML document and returns its root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| ApiError::Xml("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape().map_err(xml_error)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ApiError::Xml(format!("unclosed element <{}>", open.name)));
        }

        root.ok_or_else(|| ApiError::Xml("document has no root element".to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = BTreeMap::new();

        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(xml_error)?.into_owned();
            attributes.insert(key, value);
        }

        Ok(Self { name, attributes, ..Default::default() })
    }

    /// Element name without namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed text content; `None` when empty.
    pub fn text(&self) -> Option<&str> {
        let text = self.text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name, in document order.
    pub fn children_named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Element> + use<'a, 'n> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Resolves a dotted path one direct child at a time.
    ///
    /// Returns `Ok(None)` as soon as a segment does not resolve. Only a
    /// malformed path (empty, or with an empty segment) is an error.
    pub fn lookup(&self, path: &str) -> Result<Option<&Element>> {
        let mut node = self;
        for segment in split_path(path)? {
            match node.child(segment) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        Ok(Some(node))
    }

    /// Lenient form of [`Element::lookup`] for literal paths; a malformed
    /// path is treated as absent.
    pub fn find(&self, path: &str) -> Option<&Element> {
        self.lookup(path).ok().flatten()
    }

    /// Every element matching the last segment under the resolved parent.
    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        let Ok(segments) = split_path(path) else {
            return Vec::new();
        };
        let Some((last, parents)) = segments.split_last() else {
            return Vec::new();
        };

        let mut node = self;
        for segment in parents {
            match node.child(segment) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }
        node.children_named(last).collect()
    }

    /// Text at `path`. Missing and empty both map to `None`.
    pub fn find_text(&self, path: &str) -> Option<&str> {
        self.find(path).and_then(Element::text)
    }

    /// Owned text at `path`.
    pub fn find_string(&self, path: &str) -> Option<String> {
        self.find_text(path).map(str::to_string)
    }

    /// Texts of every element matching `path`, skipping empty ones.
    pub fn find_all_text(&self, path: &str) -> Vec<String> {
        self.find_all(path).into_iter().filter_map(Element::text).map(str::to_string).collect()
    }

    /// Date at `path`; unparseable values map to `None`.
    pub fn find_date(&self, path: &str) -> Option<NaiveDate> {
        self.find_text(path).and_then(parse_date)
    }

    /// Date at `path`, surfacing unparseable values as [`ApiError::InvalidDate`].
    pub fn find_date_strict(&self, path: &str) -> Result<Option<NaiveDate>> {
        match self.lookup(path)?.and_then(Element::text) {
            None => Ok(None),
            Some(value) => parse_date(value).map(Some).ok_or_else(|| ApiError::InvalidDate {
                path: path.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Serializes this subtree back to indented XML.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_to(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(xml_error)
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let start = BytesStart::new(self.name.as_str())
            .with_attributes(self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        if self.children.is_empty() && self.text.is_empty() {
            writer.write_event(Event::Empty(start)).map_err(xml_error)?;
            return Ok(());
        }

        writer.write_event(Event::Start(start)).map_err(xml_error)?;
        if !self.text.is_empty() {
            writer.write_event(Event::Text(BytesText::new(&self.text))).map_err(xml_error)?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str()))).map_err(xml_error)?;
        Ok(())
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ApiError::Xml("multiple root elements".to_string()));
    }
    *root = Some(element);
    Ok(())
}

fn split_path(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ApiError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

fn xml_error(err: impl std::fmt::Display) -> ApiError {
    ApiError::Xml(err.to_string())
}

/// Parses a `YYYY-MM-DD` date. Partial dates such as `1992-05` are rejected.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
