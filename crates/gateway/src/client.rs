//! HTTP client for the item store. Every call goes through the retry policy.

use axum::http::StatusCode;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ProxyConfig;
use crate::observability::{
    REQUESTS_TOTAL, REQUEST_DURATION, TRANSIENT_FAILURES_TOTAL, UPSTREAM_ATTEMPTS_TOTAL,
};
use crate::retry::{call_with_retry, CallOutcome, RetryPolicy, TransientFailure, TransientKind};

#[derive(Debug, Clone)]
pub struct ItemStoreClient {
    http: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
}

impl ItemStoreClient {
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.upstream_base_url(),
            policy: RetryPolicy::new(config.retry.max_attempts, config.retry_delay()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn list(&self) -> CallOutcome<Value> {
        self.call(Method::GET, "/items", None).await
    }

    pub async fn get(&self, id: i32) -> CallOutcome<Value> {
        self.call(Method::GET, &format!("/items/{id}"), None).await
    }

    pub async fn create(&self, body: &Value) -> CallOutcome<Value> {
        self.call(Method::POST, "/items", Some(body)).await
    }

    pub async fn update(&self, id: i32, body: &Value) -> CallOutcome<Value> {
        self.call(Method::PUT, &format!("/items/{id}"), Some(body)).await
    }

    pub async fn delete(&self, id: i32) -> CallOutcome<Value> {
        self.call(Method::DELETE, &format!("/items/{id}"), None).await
    }

    pub async fn health(&self) -> CallOutcome<Value> {
        self.call(Method::GET, "/health", None).await
    }

    /// One logical call: up to `max_attempts` HTTP exchanges with a fixed pause between them.
    pub async fn call(&self, method: Method, path: &str, body: Option<&Value>) -> CallOutcome<Value> {
        REQUESTS_TOTAL.inc();
        let _timer = REQUEST_DURATION.start_timer();
        call_with_retry(&self.policy, move || self.call_once(method.clone(), path, body)).await
    }

    async fn call_once(&self, method: Method, path: &str, body: Option<&Value>) -> CallOutcome<Value> {
        UPSTREAM_ATTEMPTS_TOTAL.inc();
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "calling item store");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return classify(e),
        };
        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return classify(e),
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) if status.is_success() => CallOutcome::Success(body),
            Ok(body) => CallOutcome::ApplicationFailure { status, body },
            Err(_) if status.is_success() => CallOutcome::ApplicationFailure {
                status: StatusCode::BAD_GATEWAY,
                body: json!({ "message": "item store returned a body that is not JSON" }),
            },
            Err(_) => CallOutcome::ApplicationFailure { status, body: Value::Null },
        }
    }
}

/// Connect errors and timeouts are transient; any other transport error is not.
fn classify(e: reqwest::Error) -> CallOutcome<Value> {
    let kind = if e.is_connect() {
        TransientKind::Connect
    } else if e.is_timeout() {
        TransientKind::Timeout
    } else {
        return CallOutcome::ApplicationFailure {
            status: StatusCode::BAD_GATEWAY,
            body: json!({ "message": format!("item store request failed: {e}") }),
        };
    };

    let label = match kind {
        TransientKind::Connect => "connect",
        TransientKind::Timeout => "timeout",
    };
    TRANSIENT_FAILURES_TOTAL.with_label_values(&[label]).inc();
    CallOutcome::TransientFailure(TransientFailure { kind, message: e.to_string() })
}
