//! Stratus integration test support.
//!
//! Re-exports the workspace crates so integration tests can use
//! `stratus_test::` paths.

pub use stratus_client as client;
pub use stratus_core as common;
pub use stratus_model as model;
