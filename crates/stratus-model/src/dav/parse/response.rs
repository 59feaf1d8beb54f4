//! Response parsing: multi-status XML and OCS JSON into resources.

use std::sync::Arc;

use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

use crate::dav::core::{DAV_NS, RawValue, Resource, ResourceSchema, ResultSet, SABREDAV_NS};
use crate::error::ModelResult;

use super::error::ParseError;
use super::tree::{XmlElement, parse_document};

/// Decoded body of an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    /// Raw text, typically a multi-status document.
    Text(String),
    /// Decoded JSON (the OCS `data` member for OCS endpoints).
    Json(Value),
    Empty,
}

impl ResponseData {
    /// Whether the body is shaped like a list of resources.
    #[must_use]
    pub fn looks_multi(&self) -> bool {
        match self {
            Self::Json(Value::Array(_)) => true,
            Self::Text(text) => is_xml(text),
            Self::Json(_) | Self::Empty => false,
        }
    }
}

/// Anything the parser can read a body and a success flag from.
pub trait MappableResponse {
    fn data(&self) -> &ResponseData;

    /// Whether the protocol reported success.
    fn is_ok(&self) -> bool;

    fn status_code(&self) -> i64;
}

/// Plain in-memory response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub data: ResponseData,
    pub is_ok: bool,
    pub status_code: i64,
}

impl RawResponse {
    /// A successful multi-status response.
    #[must_use]
    pub fn multistatus(xml: impl Into<String>) -> Self {
        Self {
            data: ResponseData::Text(xml.into()),
            is_ok: true,
            status_code: 207,
        }
    }

    /// A successful JSON response.
    #[must_use]
    pub fn json(value: Value) -> Self {
        Self {
            data: ResponseData::Json(value),
            is_ok: true,
            status_code: 200,
        }
    }

    /// A failed response with the given status and no usable body.
    #[must_use]
    pub fn failed(status_code: i64) -> Self {
        Self {
            data: ResponseData::Empty,
            is_ok: false,
            status_code,
        }
    }
}

impl MappableResponse for RawResponse {
    fn data(&self) -> &ResponseData {
        &self.data
    }

    fn is_ok(&self) -> bool {
        self.is_ok
    }

    fn status_code(&self) -> i64 {
        self.status_code
    }
}

/// Caller-supplied resource predicate.
pub type Filter<'a> = &'a dyn Fn(&Resource) -> bool;

/// Parse options.
#[derive(Clone, Copy, Default)]
pub struct ParseOptions<'a> {
    /// Force single (`Some(false)`) or multi (`Some(true)`) output.
    pub is_multi: Option<bool>,
    pub filter: Option<Filter<'a>>,
}

impl<'a> ParseOptions<'a> {
    #[must_use]
    pub fn single() -> Self {
        Self {
            is_multi: Some(false),
            filter: None,
        }
    }

    #[must_use]
    pub fn multi() -> Self {
        Self {
            is_multi: Some(true),
            filter: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Filter<'a>) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl std::fmt::Debug for ParseOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseOptions")
            .field("is_multi", &self.is_multi)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// Parser output.
#[derive(Debug, Clone)]
pub enum Parsed {
    Single(Option<Resource>),
    Multi(ResultSet),
}

impl Parsed {
    /// The single resource; for a multi result, its first element.
    #[must_use]
    pub fn into_single(self) -> Option<Resource> {
        match self {
            Self::Single(resource) => resource,
            Self::Multi(set) => set.into_iter().next(),
        }
    }

    #[must_use]
    pub fn into_multi(self, resource_type: &str) -> ResultSet {
        match self {
            Self::Single(resource) => ResultSet::new(resource_type, resource.into_iter().collect()),
            Self::Multi(set) => set,
        }
    }
}

/// ## Summary
/// Maps a response body onto resources of `schema`.
///
/// JSON objects parse as one resource, JSON arrays and XML text as a
/// list. `options.is_multi` overrides the shape of the output. A failed
/// response yields `Single(None)` or an empty set without looking at the
/// body.
///
/// ## Errors
/// Returns an error for malformed XML, a body that is neither XML nor
/// JSON, or a failing value transform.
#[tracing::instrument(skip_all, fields(schema = %schema.name(), status = response.status_code()))]
pub fn parse_response<R>(
    schema: &Arc<ResourceSchema>,
    response: &R,
    options: ParseOptions<'_>,
) -> ModelResult<Parsed>
where
    R: MappableResponse + ?Sized,
{
    let data = response.data();
    let is_multi = options.is_multi.unwrap_or_else(|| data.looks_multi());

    if !response.is_ok() {
        tracing::debug!(is_multi, "Response not successful, returning empty result");
        return Ok(if is_multi {
            Parsed::Multi(ResultSet::empty(schema.name()))
        } else {
            Parsed::Single(None)
        });
    }

    let mut resources = match data {
        ResponseData::Json(Value::Object(map)) => vec![resource_from_json(schema, map)?],
        ResponseData::Json(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(|map| resource_from_json(schema, map))
            .collect::<ModelResult<Vec<_>>>()?,
        ResponseData::Json(Value::Null) | ResponseData::Empty => Vec::new(),
        ResponseData::Json(other) => {
            return Err(ParseError::UnsupportedBody(format!(
                "expected a JSON object or array, got {other}"
            ))
            .into());
        }
        ResponseData::Text(text) if is_xml(text) => parse_multistatus(schema, text.as_bytes())?,
        ResponseData::Text(text) => {
            return Err(ParseError::UnsupportedBody(format!(
                "body is neither XML nor JSON ({} bytes)",
                text.len()
            ))
            .into());
        }
    };

    if let Some(filter) = options.filter {
        resources.retain(|resource| filter(resource));
    }

    tracing::debug!(count = resources.len(), is_multi, "Parsed response");

    Ok(if is_multi {
        Parsed::Multi(ResultSet::new(schema.name(), resources))
    } else {
        Parsed::Single(resources.into_iter().next())
    })
}

/// ## Summary
/// Parses a response expecting at most one resource.
///
/// ## Errors
/// See [`parse_response`].
pub fn parse_one<R>(schema: &Arc<ResourceSchema>, response: &R) -> ModelResult<Option<Resource>>
where
    R: MappableResponse + ?Sized,
{
    parse_response(schema, response, ParseOptions::single()).map(Parsed::into_single)
}

/// ## Summary
/// Parses a response into a result set, optionally filtered.
///
/// ## Errors
/// See [`parse_response`].
pub fn parse_many<R>(
    schema: &Arc<ResourceSchema>,
    response: &R,
    filter: Option<Filter<'_>>,
) -> ModelResult<ResultSet>
where
    R: MappableResponse + ?Sized,
{
    let options = ParseOptions {
        is_multi: Some(true),
        filter,
    };
    parse_response(schema, response, options).map(|parsed| parsed.into_multi(schema.name()))
}

/// ## Summary
/// Parses every `{DAV:}response` of a multi-status document.
///
/// Only propstat blocks whose status equals the schema's success status
/// are applied; other blocks are skipped.
///
/// ## Errors
/// Returns an error for malformed XML or a failing value transform.
#[tracing::instrument(skip_all, fields(schema = %schema.name(), xml_len = xml.len()))]
pub fn parse_multistatus(schema: &Arc<ResourceSchema>, xml: &[u8]) -> ModelResult<Vec<Resource>> {
    let root = parse_document(xml)?;

    root.children_named(DAV_NS, "response")
        .map(|response| resource_from_xml(schema, response))
        .collect()
}

fn resource_from_xml(schema: &Arc<ResourceSchema>, response: &XmlElement) -> ModelResult<Resource> {
    let mut resource = Resource::new(Arc::clone(schema));

    if let Some(href) = response.child(DAV_NS, "href").and_then(XmlElement::text) {
        resource.set_dav_href(decode_href(href.trim()));
    }

    for propstat in response.children_named(DAV_NS, "propstat") {
        let status = propstat
            .child(DAV_NS, "status")
            .and_then(XmlElement::text)
            .map(str::trim);

        if status != Some(schema.success_status()) {
            tracing::debug!(
                href = resource.dav_href().unwrap_or_default(),
                status = status.unwrap_or_default(),
                "Skipping propstat block"
            );
            continue;
        }

        let Some(prop) = propstat.child(DAV_NS, "prop") else {
            continue;
        };

        for property in &prop.children {
            for (index, descriptor) in schema.by_xml_key(&property.local_name) {
                let value = descriptor.get_value(RawValue::Xml(property))?;
                resource.set_at(index, value);
            }
        }
    }

    Ok(resource)
}

fn resource_from_json(
    schema: &Arc<ResourceSchema>,
    map: &Map<String, Value>,
) -> ModelResult<Resource> {
    let mut resource = Resource::new(Arc::clone(schema));

    for (key, raw) in map {
        for (index, descriptor) in schema.by_json_key(key) {
            let value = descriptor.get_value(RawValue::Json(raw))?;
            resource.set_at(index, value);
        }
    }

    Ok(resource)
}

/// Percent-decodes an href.
#[must_use]
pub fn decode_href(href: &str) -> String {
    percent_decode_str(href).decode_utf8_lossy().into_owned()
}

/// Whether text begins with an XML declaration.
#[must_use]
pub fn is_xml(text: &str) -> bool {
    text.trim_start().starts_with("<?xml")
}

/// ## Summary
/// Extracts the `{http://sabredav.org/ns}message` of a `{DAV:}error` body.
///
/// Returns `None` for anything else, including malformed XML.
#[must_use]
pub fn error_message(xml: &str) -> Option<String> {
    let root = parse_document(xml.as_bytes()).ok()?;
    if !root.is(DAV_NS, "error") {
        return None;
    }
    root.child(SABREDAV_NS, "message")
        .and_then(XmlElement::text)
        .map(str::to_owned)
}
