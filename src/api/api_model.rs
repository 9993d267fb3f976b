use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shape every endpoint answers with.
///
/// A present `error` or `code` marks the call as failed regardless of the
/// HTTP status it arrived with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            data: Some(data),
            error: None,
            code: None,
        }
    }

    /// Success with no payload.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failure(error: &str) -> Self {
        Self {
            data: None,
            error: Some(error.to_string()),
            code: None,
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some() || self.code.is_some()
    }
}

/// Endpoint paths used by the pages.
pub mod endpoints {
    pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
    pub const LOGIN: &str = "/auth/login";
    pub const LOGOUT: &str = "/auth/logout";
    pub const REFRESH_TOKEN: &str = "/auth/refresh-token";
}
