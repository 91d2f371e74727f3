use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use common::{ApiError, Envelope};
use models::item::Model;
use serde_json::Value;

use super::ServerState;

type ItemResult<T> = Result<T, ApiError>;

/// Non-numeric ids never match a resource, same as an unknown route.
pub(crate) fn item_id(path: Result<Path<i32>, PathRejection>) -> ItemResult<i32> {
    path.map(|Path(id)| id).map_err(|_| ApiError::route_not_found())
}

pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> ItemResult<Value> {
    body.map(|Json(v)| v)
        .map_err(|e| ApiError::invalid_input(format!("request body must be a JSON object: {}", e.body_text())))
}

pub async fn list(State(state): State<ServerState>) -> ItemResult<Json<Envelope<Vec<Model>>>> {
    let items = state.items.list().await?;
    let count = items.len();
    Ok(Json(Envelope::success(items).with_count(count)))
}

pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> ItemResult<Json<Envelope<Model>>> {
    let item = state.items.get(item_id(id)?).await?;
    Ok(Json(Envelope::success(item)))
}

pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ItemResult<(StatusCode, Json<Envelope<Model>>)> {
    let body = json_body(body)?;
    let created = state.items.create(&body).await?;
    Ok((StatusCode::CREATED, Json(Envelope::success(created).with_message("item created"))))
}

pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ItemResult<Json<Envelope<Model>>> {
    let id = item_id(id)?;
    let body = json_body(body)?;
    let updated = state.items.update(id, &body).await?;
    Ok(Json(Envelope::success(updated).with_message("item updated")))
}

pub async fn delete(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> ItemResult<Json<Envelope>> {
    state.items.delete(item_id(id)?).await?;
    Ok(Json(Envelope::ok().with_message("item deleted")))
}
