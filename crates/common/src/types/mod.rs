use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Envelope wrapping every JSON body both services return.
///
/// `service`/`source` are only filled in by the gateway on forwarded
/// responses; `details` only on errors that carry a lower-level cause.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope<T = Value> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful envelope without a payload.
    pub fn ok() -> Self {
        Self {
            status: Status::Success,
            service: None,
            source: None,
            message: None,
            data: None,
            count: None,
            details: None,
        }
    }

    pub fn success(data: T) -> Self {
        Self { data: Some(data), ..Self::ok() }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Tag a forwarded response with the service answering and the one it came from.
    pub fn with_provenance(mut self, service: &str, source: &str) -> Self {
        self.service = Some(service.to_string());
        self.source = Some(source.to_string());
        self
    }
}

impl Envelope<Value> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            ..Self::ok()
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Liveness payload returned by `/health`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Health {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

impl Health {
    pub fn healthy(service: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            service: service.to_string(),
            timestamp: now_rfc3339(),
        }
    }
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
