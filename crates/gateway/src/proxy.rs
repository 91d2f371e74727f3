use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use common::types::now_rfc3339;
use common::{ApiError, Envelope, Health};

use crate::client::ItemStoreClient;
use crate::config::ProxyConfig;
use crate::observability::encode_metrics;
use crate::retry::CallOutcome;

pub const SERVICE_NAME: &str = "item-gateway";
/// Provenance tag on forwarded responses.
pub const SOURCE: &str = "item-store";

#[derive(Clone)]
pub struct GatewayState {
    pub client: Arc<ItemStoreClient>,
    pub config: Arc<ProxyConfig>,
}

impl GatewayState {
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let client = ItemStoreClient::new(&config)?;
        Ok(Self { client: Arc::new(client), config: Arc::new(config) })
    }
}

type ProxyResult<T> = Result<T, ApiError>;

pub async fn health() -> Json<Health> {
    Json(Health::healthy(SERVICE_NAME))
}

/// Gateway is always healthy; the upstream is probed through the retry policy.
pub async fn status(State(state): State<GatewayState>) -> Json<Value> {
    let outcome = state.client.health().await;
    let upstream = if outcome.is_success() {
        "healthy"
    } else {
        warn!(?outcome, "item store health check failed");
        "unhealthy"
    };
    Json(json!({
        "service": SERVICE_NAME,
        "status": "healthy",
        "timestamp": now_rfc3339(),
        "upstream": {
            "name": SOURCE,
            "url": state.client.base_url(),
            "status": upstream,
        },
    }))
}

pub async fn proxy_info(State(state): State<GatewayState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "service": SERVICE_NAME,
        "upstream_url": state.client.base_url(),
        "upstream_host": config.upstream.host,
        "upstream_port": config.upstream.port,
        "request_timeout_ms": config.timeout.request_timeout_ms,
        "max_retries": state.client.policy().max_attempts(),
        "retry_delay_ms": config.retry.delay_ms,
    }))
}

pub async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}

pub async fn not_found() -> ApiError {
    ApiError::route_not_found()
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

pub async fn list(State(state): State<GatewayState>) -> ProxyResult<Json<Envelope>> {
    let body = settle(state.client.list().await)?;
    let count = body.get("count").and_then(Value::as_u64).unwrap_or(0) as usize;
    let data = body.get("data").cloned().unwrap_or_else(|| json!([]));
    Ok(Json(forwarded(data).with_count(count)))
}

pub async fn get_item(
    State(state): State<GatewayState>,
    id: Result<Path<i32>, PathRejection>,
) -> ProxyResult<Json<Envelope>> {
    let body = settle(state.client.get(item_id(id)?).await)?;
    Ok(Json(forwarded(data_of(body))))
}

pub async fn create(
    State(state): State<GatewayState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ProxyResult<(StatusCode, Json<Envelope>)> {
    let body = json_body(body)?;
    // only the presence check happens here; the store validates the rest
    if body.get("name").is_none() {
        return Err(ApiError::invalid_input("the \"name\" field is required"));
    }
    let created = settle(state.client.create(&body).await)?;
    info!(item = ?created.get("data").and_then(|d| d.get("id")), "item created through gateway");
    Ok((StatusCode::CREATED, Json(forwarded(data_of(created)).with_message("item created"))))
}

pub async fn update(
    State(state): State<GatewayState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ProxyResult<Json<Envelope>> {
    let id = item_id(id)?;
    let body = json_body(body)?;
    let updated = settle(state.client.update(id, &body).await)?;
    Ok(Json(forwarded(data_of(updated)).with_message("item updated")))
}

pub async fn delete(
    State(state): State<GatewayState>,
    id: Result<Path<i32>, PathRejection>,
) -> ProxyResult<Json<Envelope>> {
    settle(state.client.delete(item_id(id)?).await)?;
    Ok(Json(Envelope::ok().with_message("item deleted").with_provenance(SERVICE_NAME, SOURCE)))
}

fn item_id(path: Result<Path<i32>, PathRejection>) -> ProxyResult<i32> {
    path.map(|Path(id)| id).map_err(|_| ApiError::route_not_found())
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> ProxyResult<Value> {
    body.map(|Json(v)| v)
        .map_err(|e| ApiError::invalid_input(format!("request body must be a JSON object: {}", e.body_text())))
}

fn forwarded(data: Value) -> Envelope {
    Envelope::success(data).with_provenance(SERVICE_NAME, SOURCE)
}

fn data_of(mut body: Value) -> Value {
    body.get_mut("data").map(Value::take).unwrap_or(Value::Null)
}

/// Map the outcome of an upstream call onto the gateway's error taxonomy.
fn settle(outcome: CallOutcome<Value>) -> ProxyResult<Value> {
    match outcome {
        CallOutcome::Success(body) => Ok(body),
        CallOutcome::TransientFailure(failure) => {
            Err(ApiError::upstream_unavailable("item store is unavailable").with_details(failure.to_string()))
        }
        CallOutcome::ApplicationFailure { status, body } => {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("item store responded with status {}", status.as_u16()));
            Err(match status {
                StatusCode::BAD_REQUEST => ApiError::invalid_input(message),
                StatusCode::NOT_FOUND => ApiError::not_found(message),
                _ => ApiError::internal(message).with_details(format!("upstream status {}", status.as_u16())),
            })
        }
    }
}

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health).fallback(method_not_allowed))
        .route("/status", get(status).fallback(method_not_allowed))
        .route("/proxy/info", get(proxy_info).fallback(method_not_allowed))
        .route("/metrics", get(metrics).fallback(method_not_allowed))
        .route("/items", get(list).post(create).fallback(method_not_allowed))
        .route("/items/:id", get(get_item).put(update).delete(delete).fallback(method_not_allowed))
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
