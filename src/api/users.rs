//! User profile endpoints
//!
//! POST / (create or overwrite), GET/PUT/DELETE /:user_id.
//! The API layer owns identifier assignment and timestamp stamping; the
//! store only persists documents.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::api::{error_response, ApiResponse, ApiState};
use crate::models::{UserProfile, UserProfileDocument};

#[derive(Debug, Deserialize)]
pub struct CreateProfileParams {
    pub user_id: String,
}

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/", post(create_user_profile))
        .route(
            "/:user_id",
            get(get_user_profile)
                .put(update_user_profile)
                .delete(delete_user_profile),
        )
}

/// Create or overwrite the profile stored for `user_id`.
async fn create_user_profile(
    State(state): State<ApiState>,
    Query(params): Query<CreateProfileParams>,
    Json(profile): Json<UserProfile>,
) -> (StatusCode, Json<ApiResponse>) {
    if let Err(e) = profile.validate() {
        return error_response(e);
    }

    let now = Utc::now();
    let doc = UserProfileDocument {
        user_id: params.user_id.clone(),
        profile,
        created_at: now,
        updated_at: now,
    };

    match state.store.upsert_profile(doc).await {
        Ok(()) => {
            info!("Created user profile {}", params.user_id);
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "message": "User profile created successfully",
                    "user_id": params.user_id,
                }))),
            )
        }
        Err(e) => error_response(e),
    }
}

async fn get_user_profile(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.store.get_profile(&user_id).await {
        Ok(doc) => (StatusCode::OK, Json(ApiResponse::success(doc))),
        Err(e) => error_response(e),
    }
}

async fn update_user_profile(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
    Json(profile): Json<UserProfile>,
) -> (StatusCode, Json<ApiResponse>) {
    if let Err(e) = profile.validate() {
        return error_response(e);
    }

    match state.store.update_profile(&user_id, profile, Utc::now()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "message": "User profile updated successfully",
                "user_id": user_id,
            }))),
        ),
        Err(e) => error_response(e),
    }
}

async fn delete_user_profile(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.store.delete_profile(&user_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "message": "User profile deleted successfully",
                "user_id": user_id,
            }))),
        ),
        Err(e) => error_response(e),
    }
}
