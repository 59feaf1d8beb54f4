//! Resource objects: one instance of a schema with a value per field.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{ModelError, ModelResult};

use super::schema::ResourceSchema;

/// Names of [`Resource`] accessors; a schema field may not use them.
pub const RESERVED_NAMES: &[&str] = &[
    "get",
    "value",
    "set",
    "delete",
    "copy",
    "as_mapping",
    "schema",
    "identity",
    "dav_href",
    "set_dav_href",
    "fields",
];

/// Name of the pseudo-field holding the response href.
pub const HREF: &str = "href";

static NULL: Value = Value::Null;

/// A schema instance.
///
/// Values are kept in descriptor order. Every field exists from
/// construction, starting as `null`.
#[derive(Debug, Clone)]
pub struct Resource {
    schema: Arc<ResourceSchema>,
    dav_href: Value,
    values: Vec<Value>,
}

impl Resource {
    /// Creates a resource with every field `null`.
    #[must_use]
    pub fn new(schema: Arc<ResourceSchema>) -> Self {
        let values = vec![Value::Null; schema.properties().len()];
        Self {
            schema,
            dav_href: Value::Null,
            values,
        }
    }

    /// ## Summary
    /// Creates a resource from `(field name, value)` pairs.
    ///
    /// ## Errors
    /// Returns `ModelError::UnknownField` for a name the schema lacks.
    pub fn from_fields<I, K>(schema: Arc<ResourceSchema>, fields: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut resource = Self::new(schema);
        for (name, value) in fields {
            resource.set(name.as_ref(), value)?;
        }
        Ok(resource)
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<ResourceSchema> {
        &self.schema
    }

    /// Field value, or `None` for a name the schema does not define.
    ///
    /// `href` falls back to the response href when the schema has no
    /// `href` field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self.schema.position(field) {
            Some(index) => self.values.get(index),
            None if field == HREF => Some(&self.dav_href),
            None => None,
        }
    }

    /// Like [`get`](Self::get) but unknown fields read as `null`.
    #[must_use]
    pub fn value(&self, field: &str) -> &Value {
        self.get(field).unwrap_or(&NULL)
    }

    /// ## Summary
    /// Assigns a field.
    ///
    /// ## Errors
    /// Returns `ModelError::UnknownField` for a name the schema lacks.
    pub fn set(&mut self, field: &str, value: Value) -> ModelResult<()> {
        if let Some(index) = self.schema.position(field) {
            self.values[index] = value;
            return Ok(());
        }
        if field == HREF {
            self.dav_href = value;
            return Ok(());
        }
        Err(ModelError::UnknownField {
            resource: self.schema.name().to_string(),
            field: field.to_string(),
        })
    }

    /// Resets a field to `null`. Unknown names are ignored.
    pub fn delete(&mut self, field: &str) {
        if let Some(index) = self.schema.position(field) {
            self.values[index] = Value::Null;
        } else if field == HREF {
            self.dav_href = Value::Null;
        }
    }

    /// Independent duplicate sharing the same schema.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// `field name → value` for every schema field, in declaration order.
    #[must_use]
    pub fn as_mapping(&self) -> Map<String, Value> {
        self.fields()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .properties()
            .iter()
            .map(|p| p.field_name())
            .zip(self.values.iter())
    }

    /// Identity field value, `None` while it is `null`.
    #[must_use]
    pub fn identity(&self) -> Option<&Value> {
        self.get(self.schema.identity_field())
            .filter(|value| !value.is_null())
    }

    /// Decoded `<d:href>` of the response this resource was parsed from.
    #[must_use]
    pub fn dav_href(&self) -> Option<&str> {
        self.dav_href.as_str()
    }

    /// Records the response href; also fills an `href` field if declared.
    pub fn set_dav_href(&mut self, href: impl Into<String>) {
        let href = href.into();
        if let Some(index) = self.schema.position(HREF) {
            self.values[index] = Value::String(href.clone());
        }
        self.dav_href = Value::String(href);
    }

    pub(crate) fn set_at(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }
}

impl PartialEq for Resource {
    /// Resources are equal when their identity values are equal; two unset
    /// identities compare equal.
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.schema.name())?;
        let mut first = true;
        for field in self.schema.display_fields() {
            let value = self.value(field);
            if value.is_null() {
                continue;
            }
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            match value {
                Value::String(s) => write!(f, "'{field}': '{s}'")?,
                other => write!(f, "'{field}': {other}")?,
            }
        }
        write!(f, "}}")
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_mapping().serialize(serializer)
    }
}
