use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};

use crate::api::api_model::{ApiResponse, endpoints};
use crate::api::error::{ApiError, TransportError};
use crate::storage::store::KeyValueStore;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

pub const TOKEN_EXPIRED: &str = "TokenExpired";
pub const SESSION_EXPIRED: &str = "Session expired. Please login again.";
pub const REQUEST_FAILED: &str = "Request failed";

/// Networking capability handed to pages.
pub trait ApiClient {
    fn call(&self, endpoint: &str, payload: &Value) -> Result<ApiResponse, TransportError>;
}

// ============================================================================
// HTTP backend
// ============================================================================

pub struct HttpApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
    store: Arc<dyn KeyValueStore>,
}

impl HttpApiClient {
    pub fn new(
        base_url: &str,
        timeout_ms: u64,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;

        Ok(Self {
            base_url: base_url.to_string(),
            client,
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(
        &self,
        endpoint: &str,
        payload: &Value,
        is_retry: bool,
    ) -> Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.client.post(&url).json(payload);
        if let Some(token) = self.store.get(ACCESS_TOKEN_KEY) {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| TransportError::from_reqwest(endpoint, &e))?;
        let status = response.status();

        if status.is_success() {
            let body: Value = response
                .json()
                .map_err(|e| TransportError::from_reqwest(endpoint, &e))?;
            return Ok(success_response(body));
        }

        // Error bodies are best effort; a non-JSON error page is still an error.
        let body: Value = response.json().unwrap_or(Value::Null);

        if status.as_u16() == 401 && !is_retry && body["error"].as_str() == Some(TOKEN_EXPIRED) {
            if self.refresh_access_token() {
                return self.request(endpoint, payload, true);
            }
            self.clear_tokens();
            return Ok(ApiResponse::failure(SESSION_EXPIRED));
        }

        Ok(error_response(&body))
    }

    /// Swap the stored refresh token for a new token pair.
    fn refresh_access_token(&self) -> bool {
        let refresh_token = match self.store.get(REFRESH_TOKEN_KEY) {
            Some(t) => t,
            None => return false,
        };

        let url = format!("{}{}", self.base_url, endpoints::REFRESH_TOKEN);
        let response = match self
            .client
            .post(&url)
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
        {
            Ok(r) if r.status().is_success() => r,
            Ok(_) => return false,
            Err(e) => {
                eprintln!("Warning: token refresh failed: {}", e);
                return false;
            }
        };

        let body: Value = match response.json() {
            Ok(b) => b,
            Err(_) => return false,
        };

        match (body["accessToken"].as_str(), body["refreshToken"].as_str()) {
            (Some(access), Some(refresh)) => store_tokens(self.store.as_ref(), access, refresh),
            _ => false,
        }
    }

    fn clear_tokens(&self) {
        clear_tokens(self.store.as_ref());
    }
}

impl ApiClient for HttpApiClient {
    fn call(&self, endpoint: &str, payload: &Value) -> Result<ApiResponse, TransportError> {
        self.request(endpoint, payload, false)
    }
}

/// Map a 2xx JSON body onto the response shape.
///
/// A body carrying `error` or `code` is still a failure.
pub fn success_response(body: Value) -> ApiResponse {
    if body["error"].is_string() || body["code"].is_string() {
        return error_response(&body);
    }
    ApiResponse::ok(body)
}

/// Map a non-2xx JSON body onto the response shape.
pub fn error_response(body: &Value) -> ApiResponse {
    let error = body["error"]
        .as_str()
        .filter(|e| !e.is_empty())
        .unwrap_or(REQUEST_FAILED);

    let mut response = ApiResponse::failure(error);
    if let Some(code) = body["code"].as_str() {
        response = response.with_code(code);
    }
    response
}

pub fn store_tokens(store: &dyn KeyValueStore, access: &str, refresh: &str) -> bool {
    store.set(ACCESS_TOKEN_KEY, access).is_ok() && store.set(REFRESH_TOKEN_KEY, refresh).is_ok()
}

pub fn clear_tokens(store: &dyn KeyValueStore) {
    for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
        if let Err(e) = store.remove(key) {
            eprintln!("Warning: could not clear {}: {}", key, e);
        }
    }
}

// ============================================================================
// Scripted backend (offline runs and tests)
// ============================================================================

/// Replays queued responses in order and records every call it receives.
#[derive(Default)]
pub struct ScriptedApiClient {
    responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    calls: Mutex<Vec<(String, Value)>>,
    fallback: Option<ApiResponse>,
}

impl ScriptedApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every unscripted call with `response` instead of failing.
    pub fn answering(response: ApiResponse) -> Self {
        Self {
            fallback: Some(response),
            ..Self::default()
        }
    }

    pub fn push(&self, response: ApiResponse) -> &Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Ok(response));
        }
        self
    }

    pub fn push_transport_error(&self, error: TransportError) -> &Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Err(error));
        }
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl ApiClient for ScriptedApiClient {
    fn call(&self, endpoint: &str, payload: &Value) -> Result<ApiResponse, TransportError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((endpoint.to_string(), payload.clone()));
        }

        let next = self.responses.lock().ok().and_then(|mut q| q.pop_front());
        match (next, &self.fallback) {
            (Some(result), _) => result,
            (None, Some(response)) => Ok(response.clone()),
            (None, None) => Err(TransportError::Exhausted {
                endpoint: endpoint.to_string(),
            }),
        }
    }
}
