//! Status codes returned by the server APIs.

use std::fmt;

/// HTTP status codes used by the `WebDAV` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebDavCode {
    Ok,
    /// File or folder creation succeeded.
    Created,
    NoContent,
    MultiStatus,
    NotAuthenticated,
    /// The folder already exists.
    AlreadyExists,
    /// The parent folder does not exist.
    Conflict,
    PreconditionFailed,
}

impl WebDavCode {
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::MultiStatus => 207,
            Self::NotAuthenticated => 401,
            Self::AlreadyExists => 405,
            Self::Conflict => 409,
            Self::PreconditionFailed => 412,
        }
    }

    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(Self::Ok),
            201 => Some(Self::Created),
            204 => Some(Self::NoContent),
            207 => Some(Self::MultiStatus),
            401 => Some(Self::NotAuthenticated),
            405 => Some(Self::AlreadyExists),
            409 => Some(Self::Conflict),
            412 => Some(Self::PreconditionFailed),
            _ => None,
        }
    }

    /// ## Summary
    /// Returns the status codes that count as success for a `WebDAV` method.
    ///
    /// Unknown methods have no success code, so every response to them is
    /// classified as failed.
    #[must_use]
    pub fn success_codes(method: &str) -> &'static [Self] {
        match method.to_ascii_uppercase().as_str() {
            "PROPFIND" | "PROPPATCH" | "REPORT" => &[Self::MultiStatus],
            "MKCOL" | "PUT" | "POST" => &[Self::Created],
            "COPY" | "MOVE" => &[Self::Created, Self::NoContent],
            "GET" => &[Self::Ok],
            "DELETE" => &[Self::NoContent],
            _ => &[],
        }
    }
}

impl fmt::Display for WebDavCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Status codes carried in the `meta.statuscode` field of OCS responses.
pub struct OcsCode;

impl OcsCode {
    pub const SUCCESS_V1: i64 = 100;
    pub const SUCCESS_V2: i64 = 200;
}
