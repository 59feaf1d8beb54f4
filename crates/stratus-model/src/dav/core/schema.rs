//! Resource schemas: the ordered set of property descriptors of one
//! resource type plus its identity and display metadata.

use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};
use stratus_core::constants::SUCCESS_STATUS;

use super::namespace::NamespaceMap;
use super::property::{Property, PropertyDescriptor};

/// Which spelling to use as mapping keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    Xml,
    Json,
}

/// Field used for equality when a schema does not name one.
pub const DEFAULT_IDENTITY_FIELD: &str = "href";

/// Unvalidated schema declaration, consumed by
/// [`SchemaRegistryBuilder::schema`](super::SchemaRegistryBuilder::schema).
#[derive(Debug, Clone)]
pub struct SchemaDefinition {
    pub(crate) name: String,
    pub(crate) parent: Option<String>,
    pub(crate) identity_field: Option<String>,
    pub(crate) display_fields: Option<Vec<String>>,
    pub(crate) success_status: Option<String>,
    pub(crate) properties: Vec<Property>,
}

impl SchemaDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            identity_field: None,
            display_fields: None,
            success_status: None,
            properties: Vec::new(),
        }
    }

    /// Inherits the properties (and unset metadata) of an already
    /// registered schema.
    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn identity(mut self, field: impl Into<String>) -> Self {
        self.identity_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn display<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.display_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Status line a propstat must carry to be applied.
    #[must_use]
    pub fn success_status(mut self, status: impl Into<String>) -> Self {
        self.success_status = Some(status.into());
        self
    }

    #[must_use]
    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A registered, immutable resource schema.
#[derive(Debug)]
pub struct ResourceSchema {
    name: String,
    identity_field: String,
    display_fields: Vec<String>,
    success_status: String,
    properties: Vec<PropertyDescriptor>,
    namespaces: Arc<NamespaceMap>,
    qualified: OnceLock<Vec<(String, String)>>,
    field_names: OnceLock<Vec<String>>,
}

impl ResourceSchema {
    pub(crate) fn new(
        definition: &SchemaDefinition,
        parent: Option<&ResourceSchema>,
        properties: Vec<PropertyDescriptor>,
        namespaces: Arc<NamespaceMap>,
    ) -> Self {
        let identity_field = definition
            .identity_field
            .clone()
            .or_else(|| parent.map(|p| p.identity_field.clone()))
            .unwrap_or_else(|| DEFAULT_IDENTITY_FIELD.to_string());
        let display_fields = definition
            .display_fields
            .clone()
            .or_else(|| parent.map(|p| p.display_fields.clone()))
            .unwrap_or_else(|| vec![identity_field.clone()]);
        let success_status = definition
            .success_status
            .clone()
            .or_else(|| parent.map(|p| p.success_status.clone()))
            .unwrap_or_else(|| SUCCESS_STATUS.to_string());

        Self {
            name: definition.name.clone(),
            identity_field,
            display_fields,
            success_status,
            properties,
            namespaces,
            qualified: OnceLock::new(),
            field_names: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn identity_field(&self) -> &str {
        &self.identity_field
    }

    #[must_use]
    pub fn display_fields(&self) -> &[String] {
        &self.display_fields
    }

    #[must_use]
    pub fn success_status(&self) -> &str {
        &self.success_status
    }

    /// Descriptors in declaration order, inherited ones first.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    #[must_use]
    pub fn namespaces(&self) -> &NamespaceMap {
        &self.namespaces
    }

    /// `(namespace code, xml name)` for every descriptor.
    #[must_use]
    pub fn qualified_properties(&self) -> &[(String, String)] {
        self.qualified.get_or_init(|| {
            self.properties
                .iter()
                .map(|p| (p.namespace().to_string(), p.xml_key().to_string()))
                .collect()
        })
    }

    /// Field names in declaration order.
    #[must_use]
    pub fn field_names(&self) -> &[String] {
        self.field_names.get_or_init(|| {
            self.properties
                .iter()
                .map(|p| p.field_name().to_string())
                .collect()
        })
    }

    #[must_use]
    pub fn property(&self, field: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.field_name() == field)
    }

    #[must_use]
    pub fn position(&self, field: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.field_name() == field)
    }

    /// Descriptors (with their slot index) whose XML name is `key`.
    pub fn by_xml_key<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = (usize, &'a PropertyDescriptor)> + 'a {
        self.properties
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.xml_key() == key)
    }

    /// Descriptors (with their slot index) whose JSON key is `key`.
    pub fn by_json_key<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = (usize, &'a PropertyDescriptor)> + 'a {
        self.properties
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.json_key() == key)
    }

    /// ## Summary
    /// Builds a default-valued mapping for creation payloads.
    ///
    /// Keys are XML names or JSON keys per `format`; values come from
    /// `overrides` (keyed by field name) or the descriptor default.
    #[must_use]
    pub fn default_values(
        &self,
        format: KeyFormat,
        overrides: &Map<String, Value>,
    ) -> Map<String, Value> {
        self.properties
            .iter()
            .map(|p| {
                let key = match format {
                    KeyFormat::Xml => p.xml_key(),
                    KeyFormat::Json => p.json_key(),
                };
                let value = overrides
                    .get(p.field_name())
                    .cloned()
                    .unwrap_or_else(|| p.default_value());
                (key.to_string(), value)
            })
            .collect()
    }
}
