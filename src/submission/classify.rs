use serde_json::Value;

use crate::api::{api_model::ApiResponse, client::REQUEST_FAILED, error::TransportError};
use crate::submission::submission_model::{NOT_FOUND_CODE, NOT_FOUND_ERRORS, Resolution};

/// Not-found detection checks the code first, then the known error strings.
pub fn is_not_found(response: &ApiResponse) -> bool {
    if response.code.as_deref() == Some(NOT_FOUND_CODE) {
        return true;
    }

    response
        .error
        .as_deref()
        .map(|e| NOT_FOUND_ERRORS.contains(&e))
        .unwrap_or(false)
}

pub fn classify_response(response: ApiResponse) -> Resolution<Option<Value>> {
    if !response.is_failure() {
        return Resolution::Success(response.data);
    }

    if is_not_found(&response) {
        return Resolution::NotFound;
    }

    Resolution::Recoverable(response.error.unwrap_or_else(|| REQUEST_FAILED.to_string()))
}

/// Fold a transport failure into the same outcome space as a response.
pub fn classify_outcome(outcome: Result<ApiResponse, TransportError>) -> Resolution<Option<Value>> {
    match outcome {
        Ok(response) => classify_response(response),
        Err(e) => Resolution::Recoverable(e.user_message().to_string()),
    }
}
