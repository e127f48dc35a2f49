use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::error::ApiError;
use crate::{
    app::AppState,
    model::{
        ExercisePlanRequest, ExercisePlanResponse, RecommendationRequest, RecommendationResponse,
    },
};

pub async fn fetch_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let Json(req) = payload.map_err(|rejection| invalid_body(&request_id, rejection))?;

    let query = req.validate().map_err(|missing| {
        warn!(request_id = request_id.as_str(), ?missing, "missing required fields");
        ApiError::MissingFields(missing)
    })?;

    let recommendation = state
        .advisor
        .diet_recommendation(&query)
        .instrument(info_span!("fetch_recommendations", request_id = request_id.as_str()))
        .await
        .map_err(|err| {
            error!(
                request_id = request_id.as_str(),
                %err,
                details = %err.details(),
                "failed to fetch recommendations"
            );
            ApiError::Upstream {
                message: "Failed to fetch recommendations",
                source: err,
            }
        })?;

    info!(
        request_id = request_id.as_str(),
        chars = recommendation.len(),
        "recommendation ready"
    );
    Ok(Json(RecommendationResponse {
        recommendation: Some(recommendation),
    }))
}

pub async fn fetch_exercise_plan(
    State(state): State<AppState>,
    payload: Result<Json<ExercisePlanRequest>, JsonRejection>,
) -> Result<Json<ExercisePlanResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let Json(req) = payload.map_err(|rejection| invalid_body(&request_id, rejection))?;

    let query = req.validate().map_err(|missing| {
        warn!(request_id = request_id.as_str(), ?missing, "missing required fields");
        ApiError::MissingFields(missing)
    })?;

    let plan = state
        .advisor
        .exercise_plan(&query)
        .instrument(info_span!("fetch_exercise_plan", request_id = request_id.as_str()))
        .await
        .map_err(|err| {
            error!(
                request_id = request_id.as_str(),
                %err,
                details = %err.details(),
                "failed to fetch exercise plan"
            );
            ApiError::Upstream {
                message: "Failed to fetch exercise plan",
                source: err,
            }
        })?;

    info!(
        request_id = request_id.as_str(),
        chars = plan.len(),
        "exercise plan ready"
    );
    Ok(Json(ExercisePlanResponse {
        exercise_plan: Some(plan),
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn invalid_body(request_id: &str, rejection: JsonRejection) -> ApiError {
    let reason = rejection.body_text();
    warn!(request_id, reason = reason.as_str(), "rejected request body");
    ApiError::InvalidBody(reason)
}
