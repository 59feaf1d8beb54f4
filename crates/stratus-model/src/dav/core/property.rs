//! Property descriptors: how one resource field maps onto XML and JSON.

use serde_json::Value;
use stratus_core::util::naming::{field_to_json, field_to_xml, xml_to_field};

use crate::dav::parse::XmlElement;
use crate::error::SchemaError;

use super::transform::{JsonTransform, TransformError, ValueTransform, XmlTransform};
use super::value::is_truthy;

/// Default for a field that was not present in a response.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// `null`.
    Null,
    /// A fixed value.
    Literal(Value),
    /// Produced on every call.
    Computed(fn() -> Value),
}

impl DefaultValue {
    #[must_use]
    pub fn resolve(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Literal(value) => value.clone(),
            Self::Computed(f) => f(),
        }
    }
}

/// Raw data handed to [`PropertyDescriptor::get_value`].
#[derive(Debug, Clone, Copy)]
pub enum RawValue<'a> {
    Xml(&'a XmlElement),
    Json(&'a Value),
}

/// The resolved mapping of one field.
///
/// Descriptors are produced by [`Property::build`] when a schema is
/// registered and never change afterwards.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    namespace: String,
    xml_key: String,
    json_key: String,
    field_name: String,
    default: DefaultValue,
    required: bool,
    disabled: bool,
    value_transform: Option<ValueTransform>,
    xml_transform: Option<XmlTransform>,
    json_transform: Option<JsonTransform>,
}

impl PropertyDescriptor {
    /// Namespace code, e.g. `oc`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn xml_key(&self) -> &str {
        &self.xml_key
    }

    #[must_use]
    pub fn json_key(&self) -> &str {
        &self.json_key
    }

    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// `ns:xml_key`, as written in request documents.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace, self.xml_key)
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[must_use]
    pub fn default_value(&self) -> Value {
        self.default.resolve()
    }

    /// ## Summary
    /// Extracts the field value from a raw XML node or JSON value.
    ///
    /// XML nodes yield their text unless an XML transform is set; JSON
    /// values pass through unless a JSON transform is set. The value
    /// transform then runs on truthy results only.
    ///
    /// ## Errors
    /// Propagates any transform failure.
    pub fn get_value(&self, raw: RawValue<'_>) -> Result<Value, TransformError> {
        let value = match raw {
            RawValue::Xml(element) => match self.xml_transform {
                Some(transform) => transform(element)?,
                None => element
                    .text()
                    .map_or(Value::Null, |text| Value::String(text.to_owned())),
            },
            RawValue::Json(value) => match self.json_transform {
                Some(transform) => transform(value)?,
                None => value.clone(),
            },
        };

        match self.value_transform {
            Some(transform) if is_truthy(&value) => transform(value),
            _ => Ok(value),
        }
    }
}

/// Declarative builder for a [`PropertyDescriptor`].
///
/// ```
/// use stratus_model::dav::core::{Property, transform};
///
/// let file_id = Property::oc().xml("fileid").parse_value(transform::to_int).required();
/// let etag = Property::dav().xml("getetag").field("etag");
/// # let _ = (file_id, etag);
/// ```
#[derive(Debug, Clone)]
pub struct Property {
    namespace: String,
    xml_key: Option<String>,
    json_key: Option<String>,
    field_name: Option<String>,
    default: DefaultValue,
    required: bool,
    disabled: bool,
    value_transform: Option<ValueTransform>,
    xml_transform: Option<XmlTransform>,
    json_transform: Option<JsonTransform>,
}

impl Property {
    /// Starts a property in the given namespace code.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            xml_key: None,
            json_key: None,
            field_name: None,
            default: DefaultValue::Null,
            required: false,
            disabled: false,
            value_transform: None,
            xml_transform: None,
            json_transform: None,
        }
    }

    /// `DAV:` property.
    #[must_use]
    pub fn dav() -> Self {
        Self::new("d")
    }

    /// ownCloud property.
    #[must_use]
    pub fn oc() -> Self {
        Self::new("oc")
    }

    /// Nextcloud property.
    #[must_use]
    pub fn nc() -> Self {
        Self::new("nc")
    }

    /// XML local name. A `code:name` form also overrides the namespace.
    #[must_use]
    pub fn xml(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        match name.split_once(':') {
            Some((code, local)) => {
                self.namespace = code.to_string();
                self.xml_key = Some(local.to_string());
            }
            None => self.xml_key = Some(name),
        }
        self
    }

    #[must_use]
    pub fn json(mut self, key: impl Into<String>) -> Self {
        self.json_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = DefaultValue::Literal(value.into());
        self
    }

    #[must_use]
    pub fn with_default_fn(mut self, f: fn() -> Value) -> Self {
        self.default = DefaultValue::Computed(f);
        self
    }

    /// Included in queries that ask for default fields.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Never emitted in queries, even when selected explicitly.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    #[must_use]
    pub fn parse_value(mut self, transform: ValueTransform) -> Self {
        self.value_transform = Some(transform);
        self
    }

    #[must_use]
    pub fn parse_xml(mut self, transform: XmlTransform) -> Self {
        self.xml_transform = Some(transform);
        self
    }

    #[must_use]
    pub fn parse_json(mut self, transform: JsonTransform) -> Self {
        self.json_transform = Some(transform);
        self
    }

    /// ## Summary
    /// Resolves the three names and freezes the descriptor.
    ///
    /// The field name comes from, in order: the explicit name, the XML
    /// name, the JSON key. Missing XML and JSON names are derived from the
    /// field name.
    ///
    /// ## Errors
    /// Returns `SchemaError::Unaddressable` if no name was given at all.
    pub fn build(self, resource: &str) -> Result<PropertyDescriptor, SchemaError> {
        let field_name = self
            .field_name
            .clone()
            .or_else(|| self.xml_key.as_deref().map(xml_to_field))
            .or_else(|| self.json_key.clone())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| SchemaError::Unaddressable {
                resource: resource.to_string(),
            })?;

        let xml_key = self.xml_key.unwrap_or_else(|| field_to_xml(&field_name));
        let json_key = self.json_key.unwrap_or_else(|| field_to_json(&field_name));

        Ok(PropertyDescriptor {
            namespace: self.namespace,
            xml_key,
            json_key,
            field_name,
            default: self.default,
            required: self.required,
            disabled: self.disabled,
            value_transform: self.value_transform,
            xml_transform: self.xml_transform,
            json_transform: self.json_transform,
        })
    }
}
