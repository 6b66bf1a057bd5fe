use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State as AxumState},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    error::AppError,
    models::{NewPantryItem, PantryItem, PlanMode, PlanRequest, PlanResponse},
    planner::plan_from_pantry,
    state::State,
};

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

pub async fn pantry_list_handler(
    AxumState(state): AxumState<Arc<State>>,
) -> Result<Json<Vec<PantryItem>>, AppError> {
    if state.pantry_failures.trip() {
        return Err(AppError::Unavailable);
    }

    Ok(Json(state.pantry.snapshot()))
}

pub async fn pantry_add_handler(
    AxumState(state): AxumState<Arc<State>>,
    body: Bytes,
) -> Result<Json<PantryItem>, AppError> {
    // Parse the body by hand so bad JSON maps to 400, not a 422 rejection.
    let payload: NewPantryItem =
        serde_json::from_slice(&body).map_err(|_| AppError::MalformedPayload)?;

    let now = Utc::now();
    let item = PantryItem {
        id: format!("p{}", now.timestamp_millis()),
        name: payload.name,
        quantity: payload.quantity,
        category: payload.category,
        added_at: now,
    };

    state.pantry.prepend(item.clone());
    info!(name = %item.name, id = %item.id, "pantry item added");

    Ok(Json(item))
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub async fn food_search_handler(
    AxumState(state): AxumState<Arc<State>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    if state.search_failures.trip() {
        return Err(AppError::UpstreamTimeout);
    }

    Ok(Json(state.catalog.search(&params.q)))
}

pub async fn diet_week_handler(body: Bytes) -> Result<Json<PlanResponse>, AppError> {
    diet_plan(PlanMode::Week, body)
}

pub async fn diet_month_handler(body: Bytes) -> Result<Json<PlanResponse>, AppError> {
    diet_plan(PlanMode::Month, body)
}

fn diet_plan(mode: PlanMode, body: Bytes) -> Result<Json<PlanResponse>, AppError> {
    let payload: PlanRequest =
        serde_json::from_slice(&body).map_err(|_| AppError::MalformedPayload)?;

    let plan = plan_from_pantry(&payload.pantry, mode);

    Ok(Json(PlanResponse {
        mode: mode.label(),
        plan,
    }))
}
