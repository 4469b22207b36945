//! Depot repository and service traits.
//!
//! These traits define the contract for the entry store and the monthly ledger
//! without any database-specific types, allowing for different storage
//! implementations.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::depot_model::{CellUpdate, DepotEntry, DepotEntrySummary, EntryTable, NewDepotEntry};
use super::ledger_model::{LedgerField, MonthlyObservation, YearTable};
use super::savings_plan::SavingsPlanSection;
use crate::errors::Result;

/// Write-through persistence of the depot.
///
/// Every mutation of the in-memory depot is mirrored here before it becomes
/// visible to readers. Implementations must apply each call atomically.
#[async_trait]
pub trait DepotRepositoryTrait: Send + Sync {
    /// Loads every entry with its ledger and savings plan, ordered by creation sequence.
    fn load_entries(&self) -> Result<Vec<DepotEntry>>;

    /// The next unused creation sequence, including sequences of deleted entries.
    fn load_next_sequence(&self) -> Result<i64>;

    /// Stores a new entry together with its year tables and advances the
    /// stored sequence past the entry's.
    async fn insert_entry(&self, entry: DepotEntry) -> Result<()>;

    /// Removes an entry and its ledger.
    ///
    /// Returns the number of deleted entries.
    async fn delete_entry(&self, entry_id: String) -> Result<usize>;

    /// Stores one month of an existing year table.
    async fn upsert_observation(
        &self,
        entry_id: String,
        year: i32,
        observation: MonthlyObservation,
    ) -> Result<()>;

    /// Stores a complete new year table.
    async fn insert_year(&self, entry_id: String, year_table: YearTable) -> Result<()>;

    async fn insert_savings_plan_section(
        &self,
        entry_id: String,
        section: SavingsPlanSection,
    ) -> Result<()>;
}

/// Entry store and monthly ledger operations.
#[async_trait]
pub trait DepotServiceTrait: Send + Sync {
    /// Creates an entry seeded with one empty year.
    async fn add_entry(&self, new_entry: NewDepotEntry) -> Result<DepotEntry>;

    /// Deletes an entry and its ledger. Deleting twice reports `EntryNotFound`.
    async fn delete_entry(&self, entry_id: &str) -> Result<()>;

    /// Lists entries in insertion order.
    fn list_entries(&self) -> Result<Vec<DepotEntrySummary>>;

    fn get_entry(&self, entry_id: &str) -> Result<DepotEntry>;

    fn get_entry_table(&self, entry_id: &str) -> Result<EntryTable>;

    fn get_cell(&self, entry_id: &str, field: LedgerField, year: i32, month: u32)
        -> Result<Decimal>;

    /// Parses and writes one cell; nothing is written when any check fails.
    async fn set_cell(&self, entry_id: &str, update: CellUpdate) -> Result<Decimal>;

    /// Prepends the year before the entry's earliest year and returns it.
    async fn add_previous_year(&self, entry_id: &str) -> Result<YearTable>;

    async fn add_savings_plan_section(
        &self,
        entry_id: &str,
        section: SavingsPlanSection,
    ) -> Result<SavingsPlanSection>;

    /// A consistent copy of every entry, in insertion order.
    fn snapshot(&self) -> Result<Vec<DepotEntry>>;
}
