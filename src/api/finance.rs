//! Finance record endpoints
//!
//! POST / (create, assigns id + created_at), GET /user/:user_id (filtered
//! listing), GET/PUT/DELETE /:record_id.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::{error_response, ApiResponse, ApiState};
use crate::models::{FinanceRecord, FinanceRecordDocument, TransactionType};

const DEFAULT_LIST_LIMIT: usize = 100;
const MAX_LIST_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct ListRecordsParams {
    pub transaction_type: Option<TransactionType>,
    pub limit: Option<usize>,
}

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/", post(create_finance_record))
        .route("/user/:user_id", get(list_user_finance_records))
        .route(
            "/:record_id",
            get(get_finance_record)
                .put(update_finance_record)
                .delete(delete_finance_record),
        )
}

async fn create_finance_record(
    State(state): State<ApiState>,
    Json(record): Json<FinanceRecord>,
) -> (StatusCode, Json<ApiResponse>) {
    if let Err(e) = record.validate() {
        return error_response(e);
    }

    let doc = FinanceRecordDocument {
        id: Uuid::new_v4(),
        record,
        created_at: Utc::now(),
        updated_at: None,
    };
    let id = doc.id;

    match state.store.create_record(doc).await {
        Ok(()) => {
            info!("Created finance record {}", id);
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "message": "Finance record created successfully",
                    "id": id,
                }))),
            )
        }
        Err(e) => error_response(e),
    }
}

async fn list_user_finance_records(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
    Query(params): Query<ListRecordsParams>,
) -> (StatusCode, Json<ApiResponse>) {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .min(MAX_LIST_LIMIT);

    match state
        .store
        .list_user_records(&user_id, params.transaction_type, limit)
        .await
    {
        Ok(records) => (StatusCode::OK, Json(ApiResponse::success(records))),
        Err(e) => error_response(e),
    }
}

async fn get_finance_record(
    State(state): State<ApiState>,
    Path(record_id): Path<Uuid>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.store.get_record(record_id).await {
        Ok(doc) => (StatusCode::OK, Json(ApiResponse::success(doc))),
        Err(e) => error_response(e),
    }
}

async fn update_finance_record(
    State(state): State<ApiState>,
    Path(record_id): Path<Uuid>,
    Json(record): Json<FinanceRecord>,
) -> (StatusCode, Json<ApiResponse>) {
    if let Err(e) = record.validate() {
        return error_response(e);
    }

    match state.store.update_record(record_id, record, Utc::now()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "message": "Finance record updated successfully",
                "id": record_id,
            }))),
        ),
        Err(e) => error_response(e),
    }
}

async fn delete_finance_record(
    State(state): State<ApiState>,
    Path(record_id): Path<Uuid>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.store.delete_record(record_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "message": "Finance record deleted successfully",
                "id": record_id,
            }))),
        ),
        Err(e) => error_response(e),
    }
}
