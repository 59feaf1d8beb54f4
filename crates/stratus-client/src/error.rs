use stratus_core::error::CoreError;
use stratus_model::ModelError;
use thiserror::Error;

/// Client-level errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Not a collection: {0}")]
    NotACollection(String),

    #[error("Request to {url} failed with status {status}: {message}")]
    Request {
        status: i64,
        url: String,
        message: String,
    },
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
