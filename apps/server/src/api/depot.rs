use std::sync::Arc;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{CellQuery, CommandResult, NewEntryRequest, SetCellRequest},
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use depotbook_core::depot::{
    CellUpdate, DepotEntry, DepotEntrySummary, EntryTable, LedgerField, NewDepotEntry,
    SavingsPlanSection,
};
use depotbook_core::errors::Error as CoreError;
use depotbook_core::DepotError;
use rust_decimal::Decimal;

async fn list_entries(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<DepotEntrySummary>>> {
    let entries = state.depot_service.list_entries()?;
    Ok(Json(entries))
}

async fn create_entry(
    state: &AppState,
    payload: NewEntryRequest,
) -> Result<CommandResult, CoreError> {
    let new_entry = NewDepotEntry::try_from(payload)?;
    let entry = state.depot_service.add_entry(new_entry).await?;
    Ok(CommandResult::created(entry.id.as_str()))
}

async fn add_entry(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewEntryRequest>,
) -> Response {
    CommandResult::respond(create_entry(&state, payload).await)
}

async fn get_entry(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DepotEntry>> {
    let entry = state.depot_service.get_entry(&id)?;
    Ok(Json(entry))
}

async fn delete_entry(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let result = state
        .depot_service
        .delete_entry(&id)
        .await
        .map(|_| CommandResult::ok());
    CommandResult::respond(result)
}

async fn get_entry_table(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<EntryTable>> {
    let table = state.depot_service.get_entry_table(&id)?;
    Ok(Json(table))
}

async fn get_cell(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<CellQuery>,
) -> ApiResult<Json<Decimal>> {
    let field = query
        .field
        .parse::<LedgerField>()
        .map_err(|reason| DepotError::invalid_value("field", reason))?;
    let value = state
        .depot_service
        .get_cell(&id, field, query.year, query.month)?;
    Ok(Json(value))
}

async fn write_cell(
    state: &AppState,
    id: &str,
    payload: SetCellRequest,
) -> Result<CommandResult, CoreError> {
    let update = CellUpdate::try_from(payload)?;
    state.depot_service.set_cell(id, update).await?;
    Ok(CommandResult::ok())
}

async fn set_cell(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SetCellRequest>,
) -> Response {
    CommandResult::respond(write_cell(&state, &id, payload).await)
}

async fn add_previous_year(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state
        .depot_service
        .add_previous_year(&id)
        .await
        .map(|year_table| CommandResult {
            message: Some(format!("Added {}", year_table.year)),
            ..CommandResult::ok()
        });
    CommandResult::respond(result)
}

async fn get_savings_plan(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SavingsPlanSection>>> {
    let entry = state.depot_service.get_entry(&id)?;
    Ok(Json(entry.savings_plan))
}

async fn add_savings_plan_section(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(section): Json<SavingsPlanSection>,
) -> ApiResult<Json<SavingsPlanSection>> {
    let added = state
        .depot_service
        .add_savings_plan_section(&id, section)
        .await?;
    Ok(Json(added))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/depot/entries", get(list_entries).post(add_entry))
        .route("/depot/entries/{id}", get(get_entry).delete(delete_entry))
        .route("/depot/entries/{id}/table", get(get_entry_table))
        .route("/depot/entries/{id}/cells", get(get_cell).put(set_cell))
        .route("/depot/entries/{id}/previous-year", post(add_previous_year))
        .route(
            "/depot/entries/{id}/savings-plan",
            get(get_savings_plan).post(add_savings_plan_section),
        )
}
