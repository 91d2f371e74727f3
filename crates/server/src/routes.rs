use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::{ApiError, Health};
use service::ItemService;

pub mod items;

/// Name reported in health payloads.
pub const SERVICE_NAME: &str = "item-store";

#[derive(Clone)]
pub struct ServerState {
    pub items: ItemService,
}

/// Liveness only; the database is not probed.
pub async fn health() -> Json<Health> {
    Json(Health::healthy(SERVICE_NAME))
}

pub async fn not_found() -> ApiError {
    ApiError::route_not_found()
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Build the full application router.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health).fallback(method_not_allowed))
        .route("/items", get(items::list).post(items::create).fallback(method_not_allowed))
        .route(
            "/items/:id",
            get(items::get).put(items::update).delete(items::delete).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and friends
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
