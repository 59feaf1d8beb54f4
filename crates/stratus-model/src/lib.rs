//! Mapping between Nextcloud WebDAV/OCS payloads and resource objects.

pub mod dav;
pub mod error;
pub mod resources;

pub use dav::core::{Resource, ResourceSchema, ResultSet, SchemaRegistry};
pub use error::{ModelError, ModelResult, SchemaError};
