//! Value transforms attached to property descriptors.
//!
//! Transforms are plain function pointers so schemas can be declared as
//! data and stay `Send + Sync`.

use percent_encoding::percent_decode_str;
use serde_json::Value;
use thiserror::Error;

use crate::dav::parse::XmlElement;

use super::value::kind_of;

/// A transform rejected its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert {found} value `{value}` to {target}")]
pub struct TransformError {
    pub target: &'static str,
    pub found: &'static str,
    pub value: String,
}

impl TransformError {
    #[must_use]
    pub fn new(target: &'static str, value: &Value) -> Self {
        Self {
            target,
            found: kind_of(value),
            value: value.to_string(),
        }
    }
}

/// Post-processing applied to a truthy extracted value.
pub type ValueTransform = fn(Value) -> Result<Value, TransformError>;

/// Custom extraction from a raw XML property node.
pub type XmlTransform = fn(&XmlElement) -> Result<Value, TransformError>;

/// Custom extraction from a raw JSON value.
pub type JsonTransform = fn(&Value) -> Result<Value, TransformError>;

/// ## Summary
/// Converts numeric text (or a number) to an integer.
///
/// ## Errors
/// Fails for non-numeric strings, fractional numbers and containers.
pub fn to_int(value: Value) -> Result<Value, TransformError> {
    match &value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_err| TransformError::new("integer", &value)),
        Value::Bool(b) => Ok(Value::from(i64::from(*b))),
        _ => Err(TransformError::new("integer", &value)),
    }
}

/// ## Summary
/// Percent-decodes a URL-encoded string.
///
/// ## Errors
/// Fails for non-string values.
pub fn unquote(value: Value) -> Result<Value, TransformError> {
    match &value {
        Value::String(s) => Ok(Value::String(
            percent_decode_str(s).decode_utf8_lossy().into_owned(),
        )),
        _ => Err(TransformError::new("string", &value)),
    }
}

/// ## Summary
/// Extracts the local name of the first child of `<d:resourcetype>`.
///
/// An empty resource type (a plain file) yields `null`.
///
/// ## Errors
/// Never fails; the signature matches [`XmlTransform`].
pub fn resource_type(element: &XmlElement) -> Result<Value, TransformError> {
    Ok(element
        .children
        .first()
        .map_or(Value::Null, |child| Value::String(child.local_name.clone())))
}
