use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One line of the JSONL transition trace.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub form: String,
    pub from: String,
    pub to: String,

    pub endpoint: Option<String>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, form: &str, from: impl ToString, to: impl ToString) -> Self {
        Self {
            timestamp_ms: now_ms(),
            step,
            form: form.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            endpoint: None,
            detail: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
