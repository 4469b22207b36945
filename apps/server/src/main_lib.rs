use std::sync::Arc;

use depotbook_core::{
    depot::{DepotService, DepotServiceTrait},
    portfolio::{
        comparison::{ComparisonService, ComparisonServiceTrait},
        valuation::{ValuationService, ValuationServiceTrait},
    },
};
use depotbook_storage_sqlite::{db, depot::DepotRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub depot_service: Arc<dyn DepotServiceTrait>,
    pub valuation_service: Arc<dyn ValuationServiceTrait>,
    pub comparison_service: Arc<dyn ComparisonServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("DEPOT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let depot_repository = Arc::new(DepotRepository::new(pool.clone(), writer));
    let depot_service: Arc<dyn DepotServiceTrait> =
        Arc::new(DepotService::new(depot_repository)?);
    let valuation_service: Arc<dyn ValuationServiceTrait> =
        Arc::new(ValuationService::new(depot_service.clone()));
    let comparison_service: Arc<dyn ComparisonServiceTrait> = Arc::new(ComparisonService::new(
        valuation_service.clone(),
        config.default_growth_rate,
    ));

    tracing::info!(
        "Loaded {} depot entries",
        depot_service.list_entries()?.len()
    );

    Ok(Arc::new(AppState {
        depot_service,
        valuation_service,
        comparison_service,
    }))
}
