use stratus_core::constants::CAPABILITIES_ROUTE;

use crate::error::ClientResult;
use crate::requester::Requester;
use crate::response::ApiResponse;

/// Server and app capabilities (OCS v1).
#[derive(Debug, Clone)]
pub struct Capabilities {
    requester: Requester,
}

impl Capabilities {
    #[must_use]
    pub fn new(requester: Requester) -> Self {
        Self { requester }
    }

    #[must_use]
    pub fn route() -> &'static str {
        CAPABILITIES_ROUTE
    }

    /// ## Summary
    /// Fetches the capabilities document; `data` holds the unwrapped OCS
    /// payload (`version` and `capabilities`).
    ///
    /// ## Errors
    /// Returns an error on transport failure.
    pub async fn get_capabilities(&self) -> ClientResult<ApiResponse> {
        self.requester.get("").await
    }
}
