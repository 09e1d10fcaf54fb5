use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use label_core::{LabelFields, Record, RecordId, StoreError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedResponse {
    pub status: String,
    pub id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub status: String,
    #[serde(alias = "total_detectado")]
    pub total_detected: usize,
    #[serde(alias = "etiquetas")]
    pub labels: Vec<Record>,
}

fn store_error_response(err: StoreError) -> Response {
    match err {
        StoreError::NotFound(id) => {
            warn!(id, "label not found");
            (
                StatusCode::NOT_FOUND,
                Json(StatusResponse::error(err.to_string())),
            )
                .into_response()
        }
    }
}

pub(crate) async fn healthz_handler() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

pub(crate) async fn list_handler(State(state): State<AppState>) -> Json<Vec<Record>> {
    let store = state.store().read().await;
    Json(store.list().to_vec())
}

pub(crate) async fn add_handler(
    State(state): State<AppState>,
    Json(fields): Json<LabelFields>,
) -> Json<AddedResponse> {
    let id = state.store().write().await.create(fields);
    info!(id, "label added");
    Json(AddedResponse {
        status: "ok".to_string(),
        id,
    })
}

pub(crate) async fn edit_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(fields): Json<LabelFields>,
) -> Response {
    let result = state.store().write().await.update(id, fields);
    match result {
        Ok(()) => {
            info!(id, "label edited");
            Json(StatusResponse::ok()).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

pub(crate) async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Response {
    let result = state.store().write().await.delete(id);
    match result {
        Ok(_) => {
            info!(id, "label deleted");
            Json(StatusResponse::ok()).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

pub(crate) async fn clear_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let mut store = state.store().write().await;
    let removed = store.len();
    store.clear();
    info!(removed, "labels cleared");
    Json(StatusResponse::ok())
}

pub(crate) async fn import_handler(
    State(state): State<AppState>,
    Json(candidates): Json<Vec<LabelFields>>,
) -> Json<ImportResponse> {
    let labels = state.store().write().await.import(candidates);
    info!(count = labels.len(), "labels imported");
    Json(ImportResponse {
        status: "ok".to_string(),
        total_detected: labels.len(),
        labels,
    })
}
