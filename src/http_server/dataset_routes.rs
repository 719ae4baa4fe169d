//! Dataset and query HTTP routes
//!
//! - `PUT /dataset/:id/:kind` raw content body
//! - `DELETE /dataset/:id`
//! - `GET /datasets`
//! - `POST /query` JSON query body
//!
//! Ingestion and query execution are CPU-bound and take the registry lock,
//! so they run on the blocking pool rather than on a runtime worker.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::Value;

use crate::api::{ApiError, ApiResult, InsightService, SuccessResponse};
use crate::dataset::{DatasetKind, DatasetSummary};
use crate::executor::ResultRow;

use super::errors::{HttpError, HttpResult};

pub fn dataset_routes(service: Arc<InsightService>) -> Router {
    Router::new()
        .route("/dataset/:id/:kind", put(add_dataset))
        .route("/dataset/:id", delete(remove_dataset))
        .route("/datasets", get(list_datasets))
        .route("/query", post(perform_query))
        .with_state(service)
}

async fn add_dataset(
    State(service): State<Arc<InsightService>>,
    Path((id, kind)): Path<(String, String)>,
    body: Bytes,
) -> HttpResult<Json<SuccessResponse<Vec<String>>>> {
    let kind: DatasetKind = kind.parse().map_err(|_| HttpError::UnknownKind(kind))?;
    let ids = run_blocking(service, move |service| service.add_dataset(&id, &body, kind)).await?;
    Ok(Json(SuccessResponse::new(ids)))
}

async fn remove_dataset(
    State(service): State<Arc<InsightService>>,
    Path(id): Path<String>,
) -> HttpResult<Json<SuccessResponse<String>>> {
    let removed = service.remove_dataset(&id)?;
    Ok(Json(SuccessResponse::new(removed)))
}

async fn list_datasets(
    State(service): State<Arc<InsightService>>,
) -> HttpResult<Json<SuccessResponse<Vec<DatasetSummary>>>> {
    Ok(Json(SuccessResponse::new(service.list_datasets()?)))
}

async fn perform_query(
    State(service): State<Arc<InsightService>>,
    body: Bytes,
) -> HttpResult<Json<SuccessResponse<Vec<ResultRow>>>> {
    let raw: Value =
        serde_json::from_slice(&body).map_err(|e| HttpError::InvalidBody(e.to_string()))?;
    let rows = run_blocking(service, move |service| service.perform_query(&raw)).await?;
    Ok(Json(SuccessResponse::new(rows)))
}

/// Runs `work` on the blocking pool. A panicking task becomes an internal error.
async fn run_blocking<T, F>(service: Arc<InsightService>, work: F) -> HttpResult<T>
where
    T: Send + 'static,
    F: FnOnce(&InsightService) -> ApiResult<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || work(&service))
        .await
        .map_err(|e| ApiError::internal(format!("Worker task failed: {}", e)))?;
    Ok(result?)
}
