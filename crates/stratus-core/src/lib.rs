//! Shared building blocks for the stratus client crates.
//!
//! Holds the error type, configuration loading, endpoint constants, protocol
//! status codes and small pure utilities (naming, timestamps) that the
//! mapping layer and the HTTP client both depend on.

pub mod codes;
pub mod config;
pub mod constants;
pub mod error;
pub mod util;
