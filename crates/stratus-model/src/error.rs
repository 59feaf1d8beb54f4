use thiserror::Error;

use crate::dav::build::BuildError;
use crate::dav::core::TransformError;
use crate::dav::parse::ParseError;

/// Configuration errors raised while registering resource schemas.
///
/// These are fatal: a registry that fails to build is never partially usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("`{field}` of `{resource}` collides with a reserved resource method name")]
    ReservedName { resource: String, field: String },

    #[error("`{resource}` declares field `{field}` more than once")]
    DuplicateField { resource: String, field: String },

    #[error("a property of `{resource}` has neither a field name, an XML name nor a JSON key")]
    Unaddressable { resource: String },

    #[error("namespace code `{code}` is not registered")]
    UnknownNamespace { code: String },

    #[error("namespace code `{code}` is already bound to `{existing}`, cannot rebind to `{uri}`")]
    ConflictingNamespace {
        code: String,
        existing: String,
        uri: String,
    },

    #[error("`{resource}` extends unregistered schema `{parent}`")]
    UnknownParent { resource: String, parent: String },

    #[error("schema `{resource}` is registered twice")]
    DuplicateSchema { resource: String },
}

/// Mapping-layer errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("no schema named `{name}` is registered")]
    UnknownSchema { name: String },

    #[error("`{resource}` has no field `{field}`")]
    UnknownField { resource: String, field: String },

    #[error("expected exactly {expected} resource(s), found {found}")]
    Cardinality { expected: usize, found: usize },
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;
