//! Verb-level HTTP plumbing shared by the API wrappers.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use stratus_core::config::ServerConfig;
use stratus_core::constants::{
    DESTINATION_HEADER, MTIME_HEADER, OCS_API_REQUEST_HEADER, OVERWRITE_HEADER,
};

use crate::error::{ClientError, ClientResult};
use crate::response::ApiResponse;

/// Bytes escaped in a path segment: all but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Which response classification an endpoint family uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    WebDav,
    Ocs,
}

/// ## Summary
/// Percent-encodes each segment of a relative path, keeping the `/`
/// separators.
#[must_use]
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// ## Summary
/// Splits a server URL into its origin and the path it is mounted under.
///
/// `https://host/nextcloud/` gives `("https://host", "/nextcloud")`.
#[must_use]
pub fn split_server_url(url: &str) -> (&str, &str) {
    let url = url.trim_end_matches('/');
    let authority_start = url.find("://").map_or(0, |index| index + 3);
    match url[authority_start..].find('/') {
        Some(index) => url.split_at(authority_start + index),
        None => (url, ""),
    }
}

/// Sends requests below one API root and classifies the answers.
#[derive(Clone)]
pub struct Requester {
    http: Client,
    origin: String,
    api_url: String,
    user: String,
    password: String,
    kind: ApiKind,
    json: bool,
}

impl Requester {
    /// ## Summary
    /// Creates a requester for the API mounted at `api_route` on `server`.
    ///
    /// A path in the server URL is prepended to the route.
    #[must_use]
    pub fn new(
        http: Client,
        server: &ServerConfig,
        api_route: &str,
        kind: ApiKind,
        json: bool,
    ) -> Self {
        let (origin, mount) = split_server_url(&server.url);
        Self {
            http,
            origin: origin.to_string(),
            api_url: format!("{mount}{api_route}"),
            user: server.user.clone(),
            password: server.password.clone(),
            kind,
            json,
        }
    }

    /// Path of the API root as it appears in hrefs, e.g.
    /// `/remote.php/dav/systemtags`.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn kind(&self) -> ApiKind {
        self.kind
    }

    /// ## Summary
    /// Builds the absolute URL of `path` below the API root.
    ///
    /// OCS URLs get `?format=json` when JSON output is enabled.
    #[must_use]
    pub fn full_url(&self, path: &str) -> String {
        let mut url = format!("{}{}", self.origin, self.api_url);
        if !path.is_empty() {
            if !path.starts_with('/') {
                url.push('/');
            }
            url.push_str(&encode_path(path));
        }
        if self.kind == ApiKind::Ocs && self.json {
            url.push_str("?format=json");
        }
        url
    }

    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn get(&self, path: &str) -> ClientResult<ApiResponse> {
        let url = self.full_url(path);
        let builder = self.builder("GET", &url)?;
        self.execute("GET", url, builder).await
    }

    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn delete(&self, path: &str) -> ClientResult<ApiResponse> {
        let url = self.full_url(path);
        let builder = self.builder("DELETE", &url)?;
        self.execute("DELETE", url, builder).await
    }

    /// ## Errors
    /// Returns an error if `body` cannot be serialized or on transport failure.
    pub async fn post_json(&self, path: &str, body: &Value) -> ClientResult<ApiResponse> {
        let url = self.full_url(path);
        let builder = self
            .builder("POST", &url)?
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(body)?);
        self.execute("POST", url, builder).await
    }

    /// ## Summary
    /// Uploads `body`, sending `X-OC-MTIME` when a modification time is given.
    ///
    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn put(
        &self,
        path: &str,
        body: Vec<u8>,
        mtime: Option<i64>,
    ) -> ClientResult<ApiResponse> {
        let url = self.full_url(path);
        let mut builder = self.builder("PUT", &url)?.body(body);
        if let Some(mtime) = mtime {
            builder = builder.header(MTIME_HEADER, mtime);
        }
        self.execute("PUT", url, builder).await
    }

    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn propfind(
        &self,
        path: &str,
        depth: Option<u32>,
        body: Option<Vec<u8>>,
    ) -> ClientResult<ApiResponse> {
        let url = self.full_url(path);
        let mut builder = self.builder("PROPFIND", &url)?;
        if let Some(depth) = depth {
            builder = builder.header("Depth", depth);
        }
        if let Some(body) = body {
            builder = builder.header(header::CONTENT_TYPE, XML_CONTENT_TYPE).body(body);
        }
        self.execute("PROPFIND", url, builder).await
    }

    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn proppatch(&self, path: &str, body: Vec<u8>) -> ClientResult<ApiResponse> {
        let url = self.full_url(path);
        let builder = self
            .builder("PROPPATCH", &url)?
            .header(header::CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body);
        self.execute("PROPPATCH", url, builder).await
    }

    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn report(&self, path: &str, body: Vec<u8>) -> ClientResult<ApiResponse> {
        let url = self.full_url(path);
        let builder = self
            .builder("REPORT", &url)?
            .header(header::CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body);
        self.execute("REPORT", url, builder).await
    }

    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn make_collection(&self, path: &str) -> ClientResult<ApiResponse> {
        let url = self.full_url(path);
        let builder = self.builder("MKCOL", &url)?;
        self.execute("MKCOL", url, builder).await
    }

    /// ## Summary
    /// Sends a `MOVE` or `COPY` of `path` to `destination`, both relative to
    /// the API root.
    ///
    /// `Overwrite` is `T` or `F`; the `Destination` header carries the
    /// absolute URL of the target.
    ///
    /// ## Errors
    /// Returns an error for a verb the HTTP client rejects or on transport
    /// failure.
    pub async fn transfer(
        &self,
        verb: &str,
        path: &str,
        destination: &str,
        overwrite: bool,
    ) -> ClientResult<ApiResponse> {
        let url = self.full_url(path);
        let builder = self
            .builder(verb, &url)?
            .header(DESTINATION_HEADER, self.full_url(destination))
            .header(OVERWRITE_HEADER, if overwrite { "T" } else { "F" });
        self.execute(verb, url, builder).await
    }

    fn builder(&self, verb: &str, url: &str) -> ClientResult<RequestBuilder> {
        let method = Method::from_bytes(verb.as_bytes())
            .map_err(|e| ClientError::InvalidMethod(format!("{verb}: {e}")))?;

        let mut builder = self
            .http
            .request(method, url)
            .basic_auth(&self.user, Some(&self.password));

        if self.kind == ApiKind::Ocs {
            builder = builder
                .header(OCS_API_REQUEST_HEADER, "true")
                .header(header::ACCEPT, "application/json");
        }

        Ok(builder)
    }

    #[tracing::instrument(skip(self, builder), fields(kind = ?self.kind))]
    async fn execute(
        &self,
        verb: &str,
        url: String,
        builder: RequestBuilder,
    ) -> ClientResult<ApiResponse> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        let response = match self.kind {
            ApiKind::WebDav => ApiResponse::webdav(verb, status, headers, url, body),
            ApiKind::Ocs => ApiResponse::ocs(status, headers, url, body),
        };

        tracing::debug!(
            status,
            is_ok = response.is_ok,
            status_code = response.status_code,
            "Received response"
        );

        Ok(response)
    }
}

impl std::fmt::Debug for Requester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Requester")
            .field("origin", &self.origin)
            .field("api_url", &self.api_url)
            .field("user", &self.user)
            .field("kind", &self.kind)
            .field("json", &self.json)
            .finish_non_exhaustive()
    }
}
