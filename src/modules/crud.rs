//! Handlers shared by resources without extra request rules.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use shelf_http::{ApiJson, ApiResponse, AppResult};

use crate::service::{Resource, ResourceService};

pub type ServiceState<R> = State<Arc<ResourceService<R>>>;

pub async fn list<R: Resource>(State(service): ServiceState<R>) -> Json<ApiResponse<Vec<R>>> {
    Json(ApiResponse::ok(service.list_all().await))
}

pub async fn get<R: Resource>(
    State(service): ServiceState<R>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<R>>> {
    let record = service.get_by_id(&id).await?;
    Ok(Json(ApiResponse::ok(record)))
}

pub async fn create<R>(
    State(service): ServiceState<R>,
    ApiJson(input): ApiJson<R::Create>,
) -> AppResult<impl IntoResponse>
where
    R: Resource,
    R::Create: DeserializeOwned,
{
    let record = service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(record).with_message(format!("{} created successfully", R::LABEL))),
    ))
}

pub async fn update<R>(
    State(service): ServiceState<R>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<R::Update>,
) -> AppResult<Json<ApiResponse<R>>>
where
    R: Resource,
    R::Update: DeserializeOwned,
{
    let record = service.update(&id, patch).await?;
    Ok(Json(
        ApiResponse::ok(record).with_message(format!("{} updated successfully", R::LABEL)),
    ))
}

pub async fn delete<R: Resource>(
    State(service): ServiceState<R>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<R>>> {
    let record = service.remove(&id).await?;
    Ok(Json(
        ApiResponse::ok(record).with_message(format!("{} deleted successfully", R::LABEL)),
    ))
}
