//! Classification of raw HTTP answers into [`ApiResponse`]s.

use reqwest::header::HeaderMap;
use serde_json::Value;
use stratus_core::codes::{OcsCode, WebDavCode};
use stratus_model::dav::parse::{MappableResponse, ResponseData, error_message};

use crate::error::{ClientError, ClientResult};

/// Status code given to OCS bodies without the `ocs` envelope.
pub const NO_ENVELOPE_STATUS: i64 = -1;

const UNPARSABLE_JSON: &str = "Unable to parse JSON response";

/// A server answer with its success flag already decided.
///
/// For `WebDAV` endpoints `status_code` is the HTTP status; for OCS endpoints
/// it is `meta.statuscode` of the envelope and `data` holds the unwrapped
/// `ocs.data` member.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub data: ResponseData,
    pub status_code: i64,
    pub is_ok: bool,
    pub http_status: u16,
    pub headers: HeaderMap,
    pub url: String,
    message: Option<String>,
}

impl ApiResponse {
    /// ## Summary
    /// Classifies a `WebDAV` answer using the success codes of `method`.
    ///
    /// A failed answer keeps its body so the `{DAV:}error` message stays
    /// available through [`ApiResponse::error_message`].
    #[must_use]
    pub fn webdav(
        method: &str,
        http_status: u16,
        headers: HeaderMap,
        url: impl Into<String>,
        body: String,
    ) -> Self {
        let is_ok = WebDavCode::success_codes(method)
            .iter()
            .any(|code| code.code() == http_status);
        let message = if is_ok { None } else { error_message(&body) };

        Self {
            data: text_data(body),
            status_code: i64::from(http_status),
            is_ok,
            http_status,
            headers,
            url: url.into(),
            message,
        }
    }

    /// ## Summary
    /// Classifies an OCS answer by unwrapping its `{"ocs": {"meta", "data"}}`
    /// envelope.
    ///
    /// Bodies without the envelope keep their JSON as data and get
    /// [`NO_ENVELOPE_STATUS`]; bodies that are not JSON keep their text.
    #[must_use]
    pub fn ocs(http_status: u16, headers: HeaderMap, url: impl Into<String>, body: String) -> Self {
        let (data, status_code, message) = match serde_json::from_str::<Value>(&body) {
            Ok(value) => match split_envelope(value) {
                Ok((meta, data)) => {
                    let status = meta
                        .get("statuscode")
                        .and_then(Value::as_i64)
                        .unwrap_or(NO_ENVELOPE_STATUS);
                    (ResponseData::Json(data), status, message_of(&meta))
                }
                Err(bare) => {
                    let message = message_of(&bare);
                    (ResponseData::Json(bare), NO_ENVELOPE_STATUS, message)
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, http_status, "OCS body is not JSON");
                (text_data(body), NO_ENVELOPE_STATUS, Some(UNPARSABLE_JSON.to_string()))
            }
        };

        Self {
            data,
            status_code,
            is_ok: status_code == OcsCode::SUCCESS_V1 || status_code == OcsCode::SUCCESS_V2,
            http_status,
            headers,
            url: url.into(),
            message,
        }
    }

    /// Server-provided error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// ## Summary
    /// Turns a failed response into [`ClientError::Request`].
    ///
    /// ## Errors
    /// Returns the request error when `is_ok` is false.
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.is_ok {
            return Ok(self);
        }
        Err(ClientError::Request {
            status: self.status_code,
            message: self
                .message
                .unwrap_or_else(|| format!("unexpected HTTP status {}", self.http_status)),
            url: self.url,
        })
    }
}

impl MappableResponse for ApiResponse {
    fn data(&self) -> &ResponseData {
        &self.data
    }

    fn is_ok(&self) -> bool {
        self.is_ok
    }

    fn status_code(&self) -> i64 {
        self.status_code
    }
}

fn text_data(body: String) -> ResponseData {
    if body.trim().is_empty() {
        ResponseData::Empty
    } else {
        ResponseData::Text(body)
    }
}

/// Splits an OCS envelope into `(meta, data)`, handing back anything else.
fn split_envelope(value: Value) -> Result<(Value, Value), Value> {
    let Value::Object(mut root) = value else {
        return Err(value);
    };
    match root.remove("ocs") {
        Some(Value::Object(mut ocs)) => Ok((
            ocs.remove("meta").unwrap_or_default(),
            ocs.remove("data").unwrap_or_default(),
        )),
        Some(other) => {
            root.insert("ocs".to_string(), other);
            Err(Value::Object(root))
        }
        None => Err(Value::Object(root)),
    }
}

fn message_of(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}
