//! Mapping-layer core types.
//!
//! This module defines namespaces, property descriptors, resource schemas
//! and their registry, resource objects and result sets.

mod namespace;
mod property;
mod registry;
mod resource;
mod result_set;
mod schema;
pub mod transform;
mod value;

pub use namespace::{
    ALWAYS_DECLARED, DAV_NS, NC_NS, Namespace, NamespaceMap, OC_NS, SABREDAV_NS,
};
pub use property::{DefaultValue, Property, PropertyDescriptor, RawValue};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
pub use resource::{HREF, RESERVED_NAMES, Resource};
pub use result_set::{Cardinality, ResultSet};
pub use schema::{DEFAULT_IDENTITY_FIELD, KeyFormat, ResourceSchema, SchemaDefinition};
pub use transform::{JsonTransform, TransformError, ValueTransform, XmlTransform};
pub use value::{NamespacedValues, is_truthy, kind_of};
