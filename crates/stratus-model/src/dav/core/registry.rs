//! Schema registry.
//!
//! Schemas are declared as data, validated once in
//! [`SchemaRegistryBuilder::build`] and immutable afterwards.

use std::sync::Arc;

use crate::error::SchemaError;

use super::namespace::{Namespace, NamespaceMap};
use super::resource::RESERVED_NAMES;
use super::schema::{ResourceSchema, SchemaDefinition};

/// Validated, read-only set of resource schemas sharing one namespace map.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    namespaces: Arc<NamespaceMap>,
    schemas: Vec<Arc<ResourceSchema>>,
}

impl SchemaRegistry {
    /// Starts a registry with the standard `d`, `oc` and `nc` namespaces.
    #[must_use]
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<ResourceSchema>> {
        self.schemas.iter().find(|schema| schema.name() == name)
    }

    #[must_use]
    pub fn namespaces(&self) -> &NamespaceMap {
        &self.namespaces
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ResourceSchema>> {
        self.schemas.iter()
    }
}

/// Collects namespaces and schema definitions for a [`SchemaRegistry`].
#[derive(Debug, Clone)]
pub struct SchemaRegistryBuilder {
    namespaces: Vec<Namespace>,
    definitions: Vec<SchemaDefinition>,
}

impl Default for SchemaRegistryBuilder {
    fn default() -> Self {
        Self {
            namespaces: NamespaceMap::standard().iter().cloned().collect(),
            definitions: Vec::new(),
        }
    }
}

impl SchemaRegistryBuilder {
    #[must_use]
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    /// Schemas are registered in call order; a parent must come first.
    #[must_use]
    pub fn schema(mut self, definition: SchemaDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// ## Summary
    /// Validates every definition and freezes the registry.
    ///
    /// ## Errors
    /// Returns the first `SchemaError` found: a conflicting namespace, an
    /// unknown parent or namespace code, a duplicate schema or field, a
    /// reserved field name, or a property without any name.
    #[tracing::instrument(skip(self), fields(schemas = self.definitions.len()))]
    pub fn build(self) -> Result<SchemaRegistry, SchemaError> {
        let mut map = NamespaceMap::new();
        for namespace in self.namespaces {
            map.register(namespace)?;
        }
        let namespaces = Arc::new(map);

        let mut schemas: Vec<Arc<ResourceSchema>> = Vec::with_capacity(self.definitions.len());
        for definition in self.definitions {
            if schemas.iter().any(|s| s.name() == definition.name) {
                return Err(SchemaError::DuplicateSchema {
                    resource: definition.name,
                });
            }

            let parent = match &definition.parent {
                Some(parent) => Some(
                    schemas
                        .iter()
                        .find(|s| s.name() == parent)
                        .cloned()
                        .ok_or_else(|| SchemaError::UnknownParent {
                            resource: definition.name.clone(),
                            parent: parent.clone(),
                        })?,
                ),
                None => None,
            };

            let mut properties = parent
                .as_ref()
                .map(|p| p.properties().to_vec())
                .unwrap_or_default();

            for property in definition.properties.iter().cloned() {
                let descriptor = property.build(&definition.name)?;
                let field = descriptor.field_name();

                if !namespaces.contains(descriptor.namespace()) {
                    return Err(SchemaError::UnknownNamespace {
                        code: descriptor.namespace().to_string(),
                    });
                }
                if RESERVED_NAMES.contains(&field) {
                    return Err(SchemaError::ReservedName {
                        resource: definition.name.clone(),
                        field: field.to_string(),
                    });
                }
                if properties.iter().any(|p| p.field_name() == field) {
                    return Err(SchemaError::DuplicateField {
                        resource: definition.name.clone(),
                        field: field.to_string(),
                    });
                }

                properties.push(descriptor);
            }

            tracing::debug!(
                schema = %definition.name,
                parent = ?definition.parent,
                properties = properties.len(),
                "Registered resource schema"
            );

            let schema = ResourceSchema::new(
                &definition,
                parent.as_deref(),
                properties,
                Arc::clone(&namespaces),
            );
            schemas.push(Arc::new(schema));
        }

        Ok(SchemaRegistry {
            namespaces,
            schemas,
        })
    }
}
