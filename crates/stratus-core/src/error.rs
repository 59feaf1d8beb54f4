use thiserror::Error;

/// Invalid settings detected before any request is made.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Server URL must start with http:// or https://, got `{0}`")]
    InvalidServerUrl(String),

    #[error("Missing server {0}")]
    MissingCredential(&'static str),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
