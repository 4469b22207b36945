use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{ComparisonActionRequest, ComparisonUpdateRequest},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use depotbook_core::portfolio::{ChartDataset, Comparison, ComparisonAction, ComparisonKind};

async fn list_comparisons(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Comparison>>> {
    let comparisons = state.comparison_service.list_comparisons()?;
    Ok(Json(comparisons))
}

async fn add_comparison(
    State(state): State<Arc<AppState>>,
    Json(kind): Json<ComparisonKind>,
) -> ApiResult<Json<Comparison>> {
    let comparison = state.comparison_service.add_comparison(kind)?;
    Ok(Json(comparison))
}

async fn apply_action(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ComparisonActionRequest>,
) -> ApiResult<Json<Vec<Comparison>>> {
    let action = payload
        .action
        .parse::<ComparisonAction>()
        .map_err(ApiError::BadRequest)?;
    let comparisons = state.comparison_service.apply_action(action)?;
    Ok(Json(comparisons))
}

async fn update_comparison(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ComparisonUpdateRequest>,
) -> ApiResult<Json<Comparison>> {
    let comparison = state
        .comparison_service
        .update_comparison(&id, &payload.value)?;
    Ok(Json(comparison))
}

async fn remove_comparison(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.comparison_service.remove_comparison(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_comparison_datasets(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ChartDataset>>> {
    let timeline = state.valuation_service.get_timeline()?;
    let datasets = state.comparison_service.materialize(&timeline)?;
    Ok(Json(datasets))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/depot/comparisons",
            get(list_comparisons).post(add_comparison),
        )
        .route("/depot/comparisons/action", post(apply_action))
        .route("/depot/comparisons/datasets", get(get_comparison_datasets))
        .route(
            "/depot/comparisons/{id}",
            put(update_comparison).delete(remove_comparison),
        )
}
