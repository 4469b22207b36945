use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState, models::PrognosisQuery};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use depotbook_core::portfolio::{parse_rate, AlltimeChart, ChartDataset, DepotOverview};
use rust_decimal::Decimal;

async fn get_overview(State(state): State<Arc<AppState>>) -> ApiResult<Json<DepotOverview>> {
    let overview = state.valuation_service.get_overview()?;
    Ok(Json(overview))
}

async fn get_alltime_labels(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    let labels = state.valuation_service.get_alltime_labels()?;
    Ok(Json(labels))
}

async fn get_alltime_datasets(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ChartDataset>>> {
    let datasets = state.valuation_service.get_alltime_datasets()?;
    Ok(Json(datasets))
}

/// Labels, depot datasets and every configured comparison in one payload.
async fn get_alltime_chart(State(state): State<Arc<AppState>>) -> ApiResult<Json<AlltimeChart>> {
    let chart = state.comparison_service.get_chart()?;
    Ok(Json(chart))
}

async fn get_prognosis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PrognosisQuery>,
) -> ApiResult<Json<Vec<Option<Decimal>>>> {
    let rate = parse_rate(&query.growth_rate)?;
    let prognosis = state.valuation_service.get_prognosis(rate)?;
    Ok(Json(prognosis))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/depot/overview", get(get_overview))
        .route("/depot/alltime/labels", get(get_alltime_labels))
        .route("/depot/alltime/datasets", get(get_alltime_datasets))
        .route("/depot/alltime/chart", get(get_alltime_chart))
        .route("/depot/alltime/prognosis", get(get_prognosis))
}
