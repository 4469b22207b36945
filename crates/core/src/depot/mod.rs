//! Depot module - entry store, monthly ledger and savings plans.

mod depot_errors;
mod depot_model;
mod depot_service;
mod depot_traits;
mod ledger;
mod ledger_model;
mod savings_plan;

#[cfg(test)]
mod depot_service_tests;

// Re-export the public interface
pub use depot_errors::DepotError;
pub use depot_model::{
    CellUpdate, DepotEntry, DepotEntrySummary, EntryId, EntryTable, EntryTableRow,
    EntryTableYear, InvestmentVariant, NewDepotEntry,
};
pub use depot_service::DepotService;
pub use depot_traits::{DepotRepositoryTrait, DepotServiceTrait};
pub use ledger::{parse_cell_value, validate_ledger_year};
pub use ledger_model::{LedgerField, MonthlyObservation, YearTable};
pub use savings_plan::{planned_transactions, SavingsPlanInterval, SavingsPlanSection};
