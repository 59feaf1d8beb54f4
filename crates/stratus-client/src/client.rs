//! The `NextCloud` facade composing every wrapper.

use reqwest::Client;
use stratus_core::config::{HttpConfig, ServerConfig, Settings};
use stratus_core::constants::{
    CAPABILITIES_ROUTE, FILES_ROUTE_PREFIX, SYSTEMTAGS_RELATIONS_ROUTE_PREFIX,
    SYSTEMTAGS_ROUTE_PREFIX,
};

use crate::error::ClientResult;
use crate::requester::{ApiKind, Requester};
use crate::wrappers::{Capabilities, SystemTags, SystemTagsRelation, WebDav};

/// Client for one server and user.
///
/// Every wrapper shares the same connection pool.
#[derive(Debug, Clone)]
pub struct NextCloud {
    pub webdav: WebDav,
    pub systemtags: SystemTags,
    pub systemtags_relation: SystemTagsRelation,
    pub capabilities: Capabilities,
}

impl NextCloud {
    /// ## Summary
    /// Builds a client from loaded settings.
    ///
    /// ## Errors
    /// Returns an error if the settings are invalid, the HTTP client cannot
    /// be built or a standard schema is invalid.
    pub fn new(settings: &Settings) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(settings.http.timeout())
            .gzip(true)
            .build()?;

        Self::with_client(http, &settings.server, &settings.http)
    }

    /// ## Summary
    /// Builds a client around an existing `reqwest` client.
    ///
    /// ## Errors
    /// Returns an error if the server settings are invalid or a standard
    /// schema is invalid.
    #[tracing::instrument(skip_all, fields(url = %server.url, user = %server.user))]
    pub fn with_client(
        http: Client,
        server: &ServerConfig,
        config: &HttpConfig,
    ) -> ClientResult<Self> {
        server.validate()?;

        let webdav =
            |route: &str| Requester::new(http.clone(), server, route, ApiKind::WebDav, config.json);

        let client = Self {
            webdav: WebDav::new(webdav(FILES_ROUTE_PREFIX))?,
            systemtags: SystemTags::new(webdav(SYSTEMTAGS_ROUTE_PREFIX))?,
            systemtags_relation: SystemTagsRelation::new(webdav(
                SYSTEMTAGS_RELATIONS_ROUTE_PREFIX,
            ))?,
            capabilities: Capabilities::new(Requester::new(
                http.clone(),
                server,
                CAPABILITIES_ROUTE,
                ApiKind::Ocs,
                config.json,
            )),
        };

        tracing::debug!("Client ready");

        Ok(client)
    }
}
