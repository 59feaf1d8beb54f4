//! Standard resource schemas.

pub mod file;
pub mod tag;

use std::sync::{Arc, LazyLock};

use crate::dav::core::{ResourceSchema, SchemaRegistry};
use crate::error::{ModelError, ModelResult, SchemaError};

pub use file::{FILE, FileResource, file_schema, strip_root};
pub use tag::{TAG, TagResource, tag_schema};

static STANDARD_REGISTRY: LazyLock<Result<SchemaRegistry, SchemaError>> = LazyLock::new(|| {
    SchemaRegistry::builder()
        .schema(file_schema())
        .schema(tag_schema())
        .build()
});

/// ## Summary
/// The process-wide registry holding the `File` and `Tag` schemas.
///
/// Built on first use and read-only afterwards.
///
/// ## Errors
/// Returns the `SchemaError` raised while building it.
pub fn standard_registry() -> Result<&'static SchemaRegistry, SchemaError> {
    STANDARD_REGISTRY.as_ref().map_err(Clone::clone)
}

/// ## Summary
/// Looks up a schema of the standard registry.
///
/// ## Errors
/// Returns an error if the registry failed to build or has no schema
/// named `name`.
pub fn standard_schema(name: &str) -> ModelResult<Arc<ResourceSchema>> {
    standard_registry()?
        .get(name)
        .cloned()
        .ok_or_else(|| ModelError::UnknownSchema {
            name: name.to_string(),
        })
}
