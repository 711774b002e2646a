//! REST API server for the finance planner
//!
//! Exposes profile storage, finance records and predictions via HTTP
//! endpoints. Handlers validate input, call the store or the predictor, and
//! shape the JSON response.

pub mod finance;
pub mod predictions;
pub mod users;

use axum::{http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::FinanceError;
use crate::store::FinanceStore;

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn FinanceStore>,
}

/// =============================
/// Error Mapping
/// =============================

fn status_for(error: &FinanceError) -> StatusCode {
    match error {
        FinanceError::NotFound(_) => StatusCode::NOT_FOUND,
        FinanceError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_response(error: FinanceError) -> (StatusCode, Json<ApiResponse>) {
    (
        status_for(&error),
        Json(ApiResponse::error(error.to_string())),
    )
}

/// =============================
/// Root + Health Endpoints
/// =============================

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Finance Planner API is running"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Router
/// =============================

pub fn create_router(store: Arc<dyn FinanceStore>) -> Router {
    let state = ApiState { store };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/users", users::router())
        .nest("/api/finance", finance::router())
        .nest("/api/predict", predictions::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    store: Arc<dyn FinanceStore>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(store);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_shape() {
        let response = ApiResponse::success(serde_json::json!({ "user_id": "u1" }));
        assert!(response.success);
        assert!(response.error.is_none());
        assert_eq!(response.data.unwrap()["user_id"], "u1");
    }

    #[test]
    fn test_error_response_shape() {
        let response = ApiResponse::error("boom".to_string());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&FinanceError::NotFound("User profile".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&FinanceError::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&FinanceError::InvalidPredictionType("astro".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&FinanceError::Store("down".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
