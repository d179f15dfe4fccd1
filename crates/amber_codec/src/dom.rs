//! A small writable document tree over `quick-xml`.
//!
//! The tree codec works on whole documents rather than event streams: the
//! serializer builds [`Node`]s bottom-up, the deserializer selects children
//! by tag while resolving types, and both sides may hop around a document
//! more than once. [`parse_document`] reads text into owned nodes;
//! [`Node::to_document_string`] writes a tree back out as a single line,
//! the form the library itself produces.

use quick_xml::Reader;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

// -----------------------------------------------------------------------------
// DomError

/// An error produced while reading a document into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The underlying reader rejected the input.
    #[error("malformed document: {0}")]
    Parse(String),

    /// The input contains no element at all.
    #[error("document has no root node")]
    NoRoot,

    /// The input contains more than one top-level element.
    #[error("document has more than one root node")]
    MultipleRoots,

    /// The input ended while a node was still open.
    #[error("document ended inside an open node")]
    UnexpectedEof,
}

// -----------------------------------------------------------------------------
// Node

/// One element of a document tree: a tag, its attributes, its text content
/// and its child nodes.
///
/// Text is kept per node, before any children when written back out.
/// Attribute order is preserved, and an attribute with an empty value is
/// treated as absent, matching how the wire format omits attributes it has
/// nothing to say in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
    text: String,
}

impl Node {
    /// Creates an empty node with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The node's own text content, without descendant text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the node's text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Looks up an attribute by name.
    ///
    /// Returns `None` when the attribute is missing or empty; the format
    /// never distinguishes the two.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    /// Sets an attribute, replacing any existing value under the same name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Appends a child node.
    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// The node's children in document order.
    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The first child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// All children with the given tag, in document order.
    pub fn children_tagged<'n>(&'n self, tag: &'n str) -> impl Iterator<Item = &'n Node> {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// The node's text together with all descendant text, in document
    /// order.
    pub fn inner_text(&self) -> String {
        if self.children.is_empty() {
            return self.text.clone();
        }
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.inner_text());
        }
        out
    }

    /// Writes the tree as a complete single-line document.
    pub fn to_document_string(&self) -> String {
        let mut out = String::from(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_attr(value, out);
            out.push('"');
        }
        if self.text.is_empty() && self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        escape_text(&self.text, out);
        for child in &self.children {
            child.write_into(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn escape_text(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

// -----------------------------------------------------------------------------
// Parsing

/// Reads a document into a [`Node`] tree.
///
/// Declarations, comments and processing instructions are skipped.
/// Whitespace-only text is dropped, so documents that were pretty-printed
/// elsewhere read the same as the single-line form this module writes.
pub fn parse_document(text: &str) -> Result<Node, DomError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(start) => stack.push(node_from_start(&start)?),
            Event::Empty(start) => {
                let node = node_from_start(&start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                // The reader has already verified the tag matches.
                let node = stack
                    .pop()
                    .ok_or_else(|| DomError::Parse("closing tag without an open node".into()))?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                let text = text.decode().map_err(parse_error)?;
                if let Some(open) = stack.last_mut() {
                    if !text.trim().is_empty() {
                        open.text.push_str(&text);
                    }
                }
            }
            Event::CData(data) => {
                let text = std::str::from_utf8(data.as_ref()).map_err(parse_error)?;
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(text);
                }
            }
            Event::GeneralRef(reference) => {
                let raw = reference.decode().map_err(parse_error)?;
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&resolve_reference(&raw)?);
                }
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if !stack.is_empty() {
        return Err(DomError::UnexpectedEof);
    }
    root.ok_or(DomError::NoRoot)
}

fn parse_error(cause: impl std::fmt::Display) -> DomError {
    DomError::Parse(cause.to_string())
}

fn node_from_start(start: &BytesStart<'_>) -> Result<Node, DomError> {
    let name = start.name();
    let tag = std::str::from_utf8(name.as_ref()).map_err(parse_error)?;
    let mut node = Node::new(tag);
    for attr in start.attributes() {
        let attr = attr.map_err(parse_error)?;
        let name = std::str::from_utf8(attr.key.as_ref()).map_err(parse_error)?;
        let value = attr.unescape_value().map_err(parse_error)?;
        node.attrs.push((name.to_string(), value.into_owned()));
    }
    Ok(node)
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> Result<(), DomError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_some() => return Err(DomError::MultipleRoots),
        None => *root = Some(node),
    }
    Ok(())
}

/// Expands a general entity reference: the predefined five, then numeric
/// character references. Unknown references are kept literally.
fn resolve_reference(raw: &str) -> Result<String, DomError> {
    if let Some(resolved) = resolve_xml_entity(raw) {
        return Ok(resolved.to_string());
    }
    if let Some(rest) = raw.strip_prefix('#') {
        let code = match rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16)
                .map_err(|_| DomError::Parse(format!("invalid character reference `&#{rest};`")))?,
            None => rest
                .parse::<u32>()
                .map_err(|_| DomError::Parse(format!("invalid character reference `&#{rest};`")))?,
        };
        let ch = char::from_u32(code)
            .ok_or_else(|| DomError::Parse(format!("character reference `&#{rest};` is out of range")))?;
        return Ok(ch.to_string());
    }
    Ok(format!("&{raw};"))
}

// -----------------------------------------------------------------------------
// Tests
