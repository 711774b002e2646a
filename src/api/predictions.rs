//! Prediction endpoints
//!
//! POST / dispatches on a prediction_type selector; the three named routes
//! take a bare profile. All computation happens in [`crate::predictor`];
//! handlers only validate, call, and shape the payload.

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::api::{error_response, ApiResponse, ApiState};
use crate::models::{PredictionRequest, PredictionResult, UserProfile};
use crate::predictor::{self, ProfileFields};
use crate::Result;

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/", post(get_financial_prediction))
        .route("/retirement", post(get_retirement_prediction))
        .route("/investment", post(get_investment_recommendation))
        .route("/risk-assessment", post(get_risk_assessment))
}

/// Wrap a prediction result with its selector and generation time.
fn prediction_payload(result: &PredictionResult) -> Result<Value> {
    let mut value = serde_json::to_value(result)?;

    if let Value::Object(map) = &mut value {
        map.insert(
            "prediction_type".to_string(),
            json!(result.prediction_type()),
        );
        map.insert("generated_at".to_string(), json!(Utc::now().to_rfc3339()));
    }

    Ok(value)
}

fn profile_fields(profile: &UserProfile) -> Result<ProfileFields> {
    profile.validate()?;
    ProfileFields::from_profile(profile)
}

/// Generic endpoint: dispatch by the prediction_type selector string.
async fn get_financial_prediction(
    Json(request): Json<PredictionRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!("Prediction request: {}", request.prediction_type);

    let fields = match profile_fields(&request.user_profile) {
        Ok(fields) => fields,
        Err(e) => return error_response(e),
    };

    let payload = predictor::predict(&fields, &request.prediction_type)
        .and_then(|result| prediction_payload(&result));

    match payload {
        Ok(payload) => (StatusCode::OK, Json(ApiResponse::success(payload))),
        Err(e) => error_response(e),
    }
}

async fn get_retirement_prediction(
    Json(profile): Json<UserProfile>,
) -> (StatusCode, Json<ApiResponse>) {
    let fields = match profile_fields(&profile) {
        Ok(fields) => fields,
        Err(e) => return error_response(e),
    };

    let plan = predictor::project_retirement(&fields);

    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({
            "prediction_type": "retirement",
            "retirement_corpus_needed": plan.corpus_needed,
            "monthly_sip_required": plan.monthly_sip,
            "years_to_retirement": plan.years_to_retirement,
            "recommendations": plan.recommendations,
            "generated_at": Utc::now().to_rfc3339(),
        }))),
    )
}

async fn get_investment_recommendation(
    Json(profile): Json<UserProfile>,
) -> (StatusCode, Json<ApiResponse>) {
    let fields = match profile_fields(&profile) {
        Ok(fields) => fields,
        Err(e) => return error_response(e),
    };

    let plan = PredictionResult::Allocation(predictor::recommend_allocation(&fields));

    match prediction_payload(&plan) {
        Ok(payload) => (StatusCode::OK, Json(ApiResponse::success(payload))),
        Err(e) => error_response(e),
    }
}

async fn get_risk_assessment(
    Json(profile): Json<UserProfile>,
) -> (StatusCode, Json<ApiResponse>) {
    let fields = match profile_fields(&profile) {
        Ok(fields) => fields,
        Err(e) => return error_response(e),
    };

    let assessment = PredictionResult::Risk(predictor::assess_financial_risk(&fields));

    match prediction_payload(&assessment) {
        Ok(payload) => (StatusCode::OK, Json(ApiResponse::success(payload))),
        Err(e) => error_response(e),
    }
}
