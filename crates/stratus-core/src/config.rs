use std::time::Duration;

use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    pub user: String,
    pub password: String,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the server URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// ## Summary
    /// Checks that the URL has an HTTP scheme and a host, and that both
    /// credentials are set.
    ///
    /// ## Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> CoreResult<()> {
        let host = self
            .url
            .strip_prefix("https://")
            .or_else(|| self.url.strip_prefix("http://"))
            .unwrap_or_default();
        if host.trim_start_matches('/').is_empty() {
            return Err(CoreError::InvalidServerUrl(self.url.clone()));
        }
        if self.user.is_empty() {
            return Err(CoreError::MissingCredential("user"));
        }
        if self.password.is_empty() {
            return Err(CoreError::MissingCredential("password"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Ask OCS endpoints for JSON (`format=json`) instead of XML.
    pub json: bool,
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            json: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables (`STRATUS_` prefix) and an
    /// optional `stratus.toml` file into a `Settings`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let raw = Self::defaults(Config::builder())?
            // Env file
            .add_source(
                config::Environment::with_prefix("STRATUS")
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("stratus.toml").required(false))
            .build()?;

        Self::from_config(raw)
    }

    /// ## Summary
    /// Deserializes a `Settings` from an already-built configuration.
    ///
    /// ## Errors
    /// Returns an error if a required key is missing or has the wrong type.
    pub fn from_config(raw: Config) -> Result<Self> {
        Ok(raw.try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Applies the built-in defaults to a configuration builder.
    ///
    /// ## Errors
    /// Returns an error if a default cannot be registered.
    pub fn defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(builder
            .set_default("http.timeout", 30)?
            .set_default("http.json", true)?
            .set_default("logging.level", "info")?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
