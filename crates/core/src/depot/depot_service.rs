use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use super::depot_errors::DepotError;
use super::depot_model::{CellUpdate, DepotEntry, DepotEntrySummary, EntryTable, NewDepotEntry};
use super::depot_traits::{DepotRepositoryTrait, DepotServiceTrait};
use super::ledger::{parse_cell_value, validate_ledger_year};
use super::ledger_model::{LedgerField, YearTable};
use super::savings_plan::SavingsPlanSection;
use crate::errors::{Error, Result};
use crate::utils::time_utils::current_year;

/// In-memory depot: entries in insertion order.
#[derive(Debug, Default)]
struct Depot {
    entries: Vec<DepotEntry>,
    next_sequence: i64,
}

impl Depot {
    fn find(&self, entry_id: &str) -> Result<&DepotEntry> {
        self.entries
            .iter()
            .find(|e| e.id == *entry_id)
            .ok_or_else(|| DepotError::EntryNotFound(entry_id.to_string()).into())
    }
}

/// Entry store and ledger over a write-through repository.
///
/// Readers see the last committed state. Writers are serialized by
/// `write_gate`: each mutation is applied to a private copy, persisted, and
/// only then swapped into `state`.
pub struct DepotService {
    repository: Arc<dyn DepotRepositoryTrait>,
    state: RwLock<Depot>,
    write_gate: Mutex<()>,
}

impl DepotService {
    /// Creates the service and loads the persisted depot.
    pub fn new(repository: Arc<dyn DepotRepositoryTrait>) -> Result<Self> {
        let mut entries = repository.load_entries()?;
        entries.sort_by_key(|e| e.sequence);
        let next_sequence = entries
            .iter()
            .map(|e| e.sequence + 1)
            .max()
            .unwrap_or(0)
            .max(repository.load_next_sequence()?);
        debug!("Loaded depot with {} entries", entries.len());

        Ok(Self {
            repository,
            state: RwLock::new(Depot {
                entries,
                next_sequence,
            }),
            write_gate: Mutex::new(()),
        })
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, Depot>> {
        self.state
            .read()
            .map_err(|_| Error::Unexpected("Depot state lock poisoned".to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, Depot>> {
        self.state
            .write()
            .map_err(|_| Error::Unexpected("Depot state lock poisoned".to_string()))
    }

    fn entry_copy(&self, entry_id: &str) -> Result<DepotEntry> {
        self.read_state()?.find(entry_id).cloned()
    }

    /// Publishes a persisted copy of an entry.
    fn commit_entry(&self, updated: DepotEntry) -> Result<()> {
        let mut state = self.write_state()?;
        match state.entries.iter_mut().find(|e| e.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                Ok(())
            }
            None => Err(DepotError::EntryNotFound(updated.id.to_string()).into()),
        }
    }
}

#[async_trait]
impl DepotServiceTrait for DepotService {
    async fn add_entry(&self, new_entry: NewDepotEntry) -> Result<DepotEntry> {
        let _gate = self.write_gate.lock().await;

        let name = new_entry.name.trim().to_string();
        if name.is_empty() {
            return Err(DepotError::invalid_value("name", "must not be empty").into());
        }

        let (sequence, entry) = {
            let state = self.read_state()?;
            if state.entries.iter().any(|e| e.name == name) {
                return Err(DepotError::DuplicateName(name).into());
            }
            let sequence = state.next_sequence;
            let year = new_entry.start_year.unwrap_or_else(current_year);
            validate_ledger_year("startYear", year)?;
            (
                sequence,
                DepotEntry::new(name, new_entry.variant, sequence, year),
            )
        };

        self.repository.insert_entry(entry.clone()).await?;

        let mut state = self.write_state()?;
        state.entries.push(entry.clone());
        state.next_sequence = sequence + 1;
        debug!("Added depot entry '{}' ({})", entry.name, entry.id);
        Ok(entry)
    }

    async fn delete_entry(&self, entry_id: &str) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        self.read_state()?.find(entry_id)?;

        let deleted = self.repository.delete_entry(entry_id.to_string()).await?;
        if deleted == 0 {
            warn!("Depot entry {} was missing from storage on delete", entry_id);
        }

        self.write_state()?.entries.retain(|e| e.id != *entry_id);
        debug!("Deleted depot entry {}", entry_id);
        Ok(())
    }

    fn list_entries(&self) -> Result<Vec<DepotEntrySummary>> {
        Ok(self
            .read_state()?
            .entries
            .iter()
            .map(DepotEntrySummary::from)
            .collect())
    }

    fn get_entry(&self, entry_id: &str) -> Result<DepotEntry> {
        self.entry_copy(entry_id)
    }

    fn get_entry_table(&self, entry_id: &str) -> Result<EntryTable> {
        Ok(self.read_state()?.find(entry_id)?.to_table())
    }

    fn get_cell(
        &self,
        entry_id: &str,
        field: LedgerField,
        year: i32,
        month: u32,
    ) -> Result<Decimal> {
        Ok(self
            .read_state()?
            .find(entry_id)?
            .get_cell(field, year, month)?)
    }

    async fn set_cell(&self, entry_id: &str, update: CellUpdate) -> Result<Decimal> {
        let _gate = self.write_gate.lock().await;
        let mut entry = self.entry_copy(entry_id)?;

        entry.ensure_in_range(update.year, update.month)?;
        let value = parse_cell_value(update.field, &update.value)?;
        let observation = entry
            .set_cell(update.field, update.year, update.month, value)?
            .clone();

        self.repository
            .upsert_observation(entry_id.to_string(), update.year, observation)
            .await?;
        self.commit_entry(entry)?;

        debug!(
            "Set {} of {} {}-{:02} to {}",
            update.field, entry_id, update.year, update.month, value
        );
        Ok(value)
    }

    async fn add_previous_year(&self, entry_id: &str) -> Result<YearTable> {
        let _gate = self.write_gate.lock().await;
        let mut entry = self.entry_copy(entry_id)?;

        let year_table = entry.add_previous_year()?.clone();
        self.repository
            .insert_year(entry_id.to_string(), year_table.clone())
            .await?;
        self.commit_entry(entry)?;

        debug!("Added year {} to depot entry {}", year_table.year, entry_id);
        Ok(year_table)
    }

    async fn add_savings_plan_section(
        &self,
        entry_id: &str,
        section: SavingsPlanSection,
    ) -> Result<SavingsPlanSection> {
        let _gate = self.write_gate.lock().await;
        let mut entry = self.entry_copy(entry_id)?;

        let stored = entry.add_savings_plan_section(section)?;
        self.repository
            .insert_savings_plan_section(entry_id.to_string(), stored.clone())
            .await?;
        self.commit_entry(entry)?;

        debug!(
            "Added {} savings plan {}..{} to depot entry {}",
            stored.interval, stored.start, stored.end, entry_id
        );
        Ok(stored)
    }

    fn snapshot(&self) -> Result<Vec<DepotEntry>> {
        Ok(self.read_state()?.entries.clone())
    }
}
