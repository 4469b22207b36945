use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;

use depotbook_core::depot::{
    DepotEntry, DepotRepositoryTrait, MonthlyObservation, SavingsPlanSection, YearTable,
};
use depotbook_core::Result;

use super::model::{DepotEntryDB, DepotMonthDB, SavingsPlanSectionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{depot_entries, depot_months, depot_sequence, savings_plan_sections};

pub struct DepotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DepotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        DepotRepository { pool, writer }
    }

    pub fn load_entries_impl(&self) -> Result<Vec<DepotEntry>> {
        let mut conn = get_connection(&self.pool)?;

        let entries_db = depot_entries::table
            .order(depot_entries::creation_sequence.asc())
            .select(DepotEntryDB::as_select())
            .load::<DepotEntryDB>(&mut conn)
            .into_core()?;
        let months_db = depot_months::table
            .order((
                depot_months::entry_id.asc(),
                depot_months::year.asc(),
                depot_months::month.asc(),
            ))
            .select(DepotMonthDB::as_select())
            .load::<DepotMonthDB>(&mut conn)
            .into_core()?;
        let sections_db = savings_plan_sections::table
            .order((
                savings_plan_sections::entry_id.asc(),
                savings_plan_sections::start_month.asc(),
            ))
            .select(SavingsPlanSectionDB::as_select())
            .load::<SavingsPlanSectionDB>(&mut conn)
            .into_core()?;

        let mut entries = Vec::with_capacity(entries_db.len());
        let mut index_by_id = HashMap::with_capacity(entries_db.len());
        for entry_db in entries_db {
            let entry = entry_db.into_entry()?;
            index_by_id.insert(entry.id.to_string(), entries.len());
            entries.push(entry);
        }

        for month_db in months_db {
            let Some(&index) = index_by_id.get(&month_db.entry_id) else {
                continue;
            };
            let year = month_db.year;
            let observation = MonthlyObservation::try_from(month_db)?;
            let year_table = entries[index]
                .years
                .entry(year)
                .or_insert_with(|| YearTable::empty(year));
            if let Some(slot) = year_table.month_mut(observation.month) {
                *slot = observation;
            }
        }

        for section_db in sections_db {
            let Some(&index) = index_by_id.get(&section_db.entry_id) else {
                continue;
            };
            let section = SavingsPlanSection::try_from(section_db)?;
            entries[index].savings_plan.push(section);
        }

        debug!("Loaded {} depot entries from storage", entries.len());
        Ok(entries)
    }
}

#[async_trait]
impl DepotRepositoryTrait for DepotRepository {
    fn load_entries(&self) -> Result<Vec<DepotEntry>> {
        self.load_entries_impl()
    }

    fn load_next_sequence(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let stored = depot_sequence::table
            .select(depot_sequence::next_sequence)
            .first::<i64>(&mut conn)
            .optional()
            .into_core()?;
        Ok(stored.unwrap_or(0))
    }

    async fn insert_entry(&self, entry: DepotEntry) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let entry_id = entry.id.to_string();
                diesel::insert_into(depot_entries::table)
                    .values(&DepotEntryDB::from_entry(&entry))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let next_sequence = entry.sequence + 1;
                diesel::insert_into(depot_sequence::table)
                    .values((
                        depot_sequence::id.eq(1),
                        depot_sequence::next_sequence.eq(next_sequence),
                    ))
                    .on_conflict(depot_sequence::id)
                    .do_update()
                    .set(depot_sequence::next_sequence.eq(next_sequence))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let months: Vec<DepotMonthDB> = entry
                    .years
                    .values()
                    .flat_map(|y| DepotMonthDB::from_year(&entry_id, y))
                    .collect();
                diesel::insert_into(depot_months::table)
                    .values(&months)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let sections: Vec<SavingsPlanSectionDB> = entry
                    .savings_plan
                    .iter()
                    .map(|s| SavingsPlanSectionDB::from_section(&entry_id, s))
                    .collect();
                if !sections.is_empty() {
                    diesel::insert_into(savings_plan_sections::table)
                        .values(&sections)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(())
            })
            .await
    }

    async fn delete_entry(&self, entry_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(depot_entries::table.find(entry_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn upsert_observation(
        &self,
        entry_id: String,
        year: i32,
        observation: MonthlyObservation,
    ) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let row = DepotMonthDB::from_observation(&entry_id, year, &observation);
                diesel::insert_into(depot_months::table)
                    .values(&row)
                    .on_conflict((
                        depot_months::entry_id,
                        depot_months::year,
                        depot_months::month,
                    ))
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn insert_year(&self, entry_id: String, year_table: YearTable) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(depot_months::table)
                    .values(&DepotMonthDB::from_year(&entry_id, &year_table))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn insert_savings_plan_section(
        &self,
        entry_id: String,
        section: SavingsPlanSection,
    ) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(savings_plan_sections::table)
                    .values(&SavingsPlanSectionDB::from_section(&entry_id, &section))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
