//! Namespace-resolved XML element tree.
//!
//! Multi-status bodies are small, so the parser reads them into a tree
//! first and walks it afterwards.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::error::{ParseError, ParseResult};

/// An element with its namespace URI resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Namespace URI, `None` for unqualified elements.
    pub namespace: Option<String>,
    /// Local name without prefix.
    pub local_name: String,
    /// Character content, `None` when empty.
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Returns whether this element is `{namespace}local_name`.
    #[must_use]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }

    /// First child named `{namespace}local_name`.
    #[must_use]
    pub fn child(&self, namespace: &str, local_name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.is(namespace, local_name))
    }

    /// All children named `{namespace}local_name`.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children
            .iter()
            .filter(move |c| c.is(namespace, local_name))
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Clark notation, `{uri}name`.
    #[must_use]
    pub fn tag(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{ns}}}{}", self.local_name),
            None => self.local_name.clone(),
        }
    }
}

/// ## Summary
/// Parses an XML document into its root element.
///
/// Whitespace-only text of elements with children is discarded.
///
/// ## Errors
/// Returns an error if the XML is malformed, an element is left open or
/// the document has no root element.
#[tracing::instrument(skip(xml), fields(xml_len = xml.len()))]
pub fn parse_document(xml: &[u8]) -> ParseResult<XmlElement> {
    let mut reader = Reader::from_reader(xml);

    let mut buf = Vec::new();
    let mut scopes: Vec<Vec<(String, String)>> = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                scopes.push(namespace_declarations(e)?);
                stack.push(open_element(e, &scopes)?);
            }
            Ok(Event::Empty(ref e)) => {
                scopes.push(namespace_declarations(e)?);
                let element = open_element(e, &scopes)?;
                scopes.pop();
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                scopes.pop();
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, close_element(element));
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(current) = stack.last_mut() {
                    let decoded = reader.decoder().decode(e.as_ref())?;
                    push_text(current, &decoded);
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = std::str::from_utf8(e.as_ref())?;
                    push_text(current, text);
                }
            }
            Ok(Event::GeneralRef(ref e)) => {
                if let Some(current) = stack.last_mut() {
                    let name = reader.decoder().decode(e)?;
                    push_text(current, &resolve_entity(&name)?);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::Malformed {
                    position: reader.error_position(),
                    message: e.to_string(),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Unclosed {
            element: open.local_name.clone(),
        });
    }

    root.ok_or(ParseError::NoRoot)
}

/// Collects `xmlns` / `xmlns:prefix` declarations of one element.
fn namespace_declarations(e: &BytesStart<'_>) -> ParseResult<Vec<(String, String)>> {
    let mut declared = Vec::new();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        if let Some(prefix) = key.strip_prefix("xmlns:") {
            declared.push((prefix.to_string(), value.to_string()));
        } else if key == "xmlns" {
            declared.push((String::new(), value.to_string()));
        } else {
            // Other attributes ignored
        }
    }
    Ok(declared)
}

fn open_element(e: &BytesStart<'_>, scopes: &[Vec<(String, String)>]) -> ParseResult<XmlElement> {
    let name_bytes = e.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?;

    let (prefix, local_name) = name.split_once(':').unwrap_or(("", name));

    let namespace = scopes
        .iter()
        .rev()
        .flat_map(|scope| scope.iter().rev())
        .find(|(p, _)| p == prefix)
        .map(|(_, uri)| uri.clone())
        .filter(|uri| !uri.is_empty());

    if namespace.is_none() && !prefix.is_empty() {
        tracing::warn!(prefix, local_name, "Unbound namespace prefix");
    }

    Ok(XmlElement {
        namespace,
        local_name: local_name.to_string(),
        text: None,
        children: Vec::new(),
    })
}

fn push_text(element: &mut XmlElement, text: &str) {
    match &mut element.text {
        Some(existing) => existing.push_str(text),
        None => element.text = Some(text.to_string()),
    }
}

fn close_element(mut element: XmlElement) -> XmlElement {
    let blank = element
        .text
        .as_deref()
        .is_some_and(|t| t.is_empty() || (!element.children.is_empty() && t.trim().is_empty()));
    if blank {
        element.text = None;
    }
    element
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => tracing::warn!(element = %element.tag(), "Ignoring element after document root"),
    }
}

/// Resolves a predefined or numeric character entity.
fn resolve_entity(name: &str) -> ParseResult<String> {
    let resolved = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()
            } else {
                None
            };
            code.and_then(char::from_u32)
                .ok_or_else(|| ParseError::UnknownEntity(name.to_string()))?
        }
    };
    Ok(resolved.to_string())
}
