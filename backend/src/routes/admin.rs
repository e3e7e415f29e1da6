//! Admin write endpoints: gym and gym-plan creation

use crate::error::ApiResult;
use crate::services::GymService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use gym_manager_shared::types::{GymCreatedResponse, GymPlanCreatedResponse};
use serde_json::Value;

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/add-gym", post(add_gym))
        .route("/add-gym-plans", post(add_gym_plans))
}

/// POST /add-gym - Validate and persist a new gym
async fn add_gym(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> ApiResult<(StatusCode, Json<GymCreatedResponse>)> {
    let gym_id = GymService::add_gym(state.store(), &payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(GymCreatedResponse {
            status: true,
            message: "Gym added successfully".to_string(),
            gym_id,
        }),
    ))
}

/// POST /add-gym-plans - Validate and persist a new gym plan
async fn add_gym_plans(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> ApiResult<(StatusCode, Json<GymPlanCreatedResponse>)> {
    let gym_plans_id = GymService::add_gym_plan(state.store(), &payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(GymPlanCreatedResponse {
            status: true,
            message: "Gym plans added successfully".to_string(),
            gym_plans_id,
        }),
    ))
}
