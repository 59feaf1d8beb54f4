//! Request body serialization for PROPFIND, REPORT and PROPPATCH.

mod query;
mod update;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde_json::Value;
use thiserror::Error;

use crate::dav::core::{Namespace, kind_of};

pub use query::{
    DEFAULT_INSTRUCTION, FILTER_RULES_ELEMENT, FieldSelection, QueryOptions, build_query,
};
pub use update::build_update;

/// Errors raised while writing a request document.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML write error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrays and objects have no XML text form.
    #[error("cannot write {kind} value of `{key}` as XML text")]
    UnsupportedValue { key: String, kind: &'static str },
}

pub type BuildResult<T> = Result<T, BuildError>;

/// ## Summary
/// Renders a value as XML text content.
///
/// Strings are written unchanged and numbers are stringified. `null`
/// produces an empty element.
///
/// Booleans become `1`/`0`, the form the server's boolean properties
/// (`oc:favorite` and the tag flags) accept; `true`/`false` text is not
/// understood by every property handler.
///
/// ## Errors
/// Returns `BuildError::UnsupportedValue` for arrays and objects.
pub fn xml_text(key: &str, value: &Value) -> BuildResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(BuildError::UnsupportedValue {
            key: key.to_string(),
            kind: kind_of(value),
        }),
    }
}

/// Opens `name` declaring each namespace as `xmlns:<code>`.
fn start_with_namespaces<'a, W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    namespaces: impl IntoIterator<Item = &'a Namespace>,
) -> BuildResult<()> {
    let mut elem = BytesStart::new(name);
    for namespace in namespaces {
        let attr = namespace.xmlns_attribute();
        elem.push_attribute((attr.as_str(), namespace.uri()));
    }
    writer.write_event(Event::Start(elem))?;
    Ok(())
}

/// Writes `<name>text</name>`, or `<name/>` when the value is `null`.
fn write_value_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
) -> BuildResult<()> {
    match xml_text(name, value)? {
        Some(text) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        None => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
    }
    Ok(())
}
