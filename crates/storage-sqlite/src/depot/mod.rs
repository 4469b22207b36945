//! SQLite storage implementation for the depot.

mod model;
mod repository;

pub use model::{DepotEntryDB, DepotMonthDB, SavingsPlanSectionDB};
pub use repository::DepotRepository;
