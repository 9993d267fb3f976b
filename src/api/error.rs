use std::fmt;

pub const NETWORK_ERROR: &str = "Network error";
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";

/// The request never produced a structured response.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// No answer within the configured timeout
    Timeout { endpoint: String },

    /// Connection refused, DNS failure, TLS failure, ...
    Connect { endpoint: String, message: String },

    /// Response body was not the JSON we expected
    Decode { endpoint: String, message: String },

    /// Scripted client ran out of responses
    Exhausted { endpoint: String },
}

impl TransportError {
    pub fn from_reqwest(endpoint: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        } else {
            TransportError::Connect {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Message shown to the user. Never leaks transport details.
    pub fn user_message(&self) -> &'static str {
        match self {
            TransportError::Timeout { .. } => TIMEOUT_MESSAGE,
            _ => NETWORK_ERROR,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout { endpoint } => {
                write!(f, "Request to {} timed out", endpoint)
            }
            TransportError::Connect { endpoint, message } => {
                write!(f, "Request to {} failed: {}", endpoint, message)
            }
            TransportError::Decode { endpoint, message } => {
                write!(f, "Could not decode response from {}: {}", endpoint, message)
            }
            TransportError::Exhausted { endpoint } => {
                write!(f, "No scripted response left for {}", endpoint)
            }
        }
    }
}

impl std::error::Error for TransportError {}

#[derive(Debug)]
pub enum ApiError {
    /// HTTP client could not be constructed
    ClientBuild { source: reqwest::Error },

    /// Base URL is empty or not http(s)
    InvalidBaseUrl(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ClientBuild { source } => {
                write!(f, "Failed to build HTTP client: {}", source)
            }
            ApiError::InvalidBaseUrl(url) => {
                write!(f, "Invalid API base URL '{}'", url)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::ClientBuild { source } => Some(source),
            _ => None,
        }
    }
}
