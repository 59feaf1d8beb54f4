//! Thin HTTP client over the stratus mapping layer.
//!
//! [`NextCloud`] holds one wrapper per endpoint family. Wrappers send
//! requests through a [`Requester`](requester::Requester), classify the
//! answer into an [`ApiResponse`](response::ApiResponse) and let
//! `stratus_model` turn it into resources.

pub mod client;
pub mod error;
pub mod requester;
pub mod response;
pub mod telemetry;
pub mod wrappers;

pub use client::NextCloud;
pub use error::{ClientError, ClientResult};
pub use response::ApiResponse;
