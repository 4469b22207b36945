//! Database models for the depot.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::errors::StorageError;
use depotbook_core::depot::{
    DepotEntry, InvestmentVariant, MonthlyObservation, SavingsPlanInterval, SavingsPlanSection,
    YearTable,
};
use depotbook_core::utils::time_utils::YearMonth;

/// Database model for depot entries
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::depot_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DepotEntryDB {
    pub id: String,
    pub name: String,
    pub variant: String,
    pub created_year: i32,
    pub creation_sequence: i64,
    pub created_at: NaiveDateTime,
}

/// Database model for one month of an entry's ledger
#[derive(Queryable, Insertable, Selectable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::depot_months)]
#[diesel(primary_key(entry_id, year, month))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DepotMonthDB {
    pub entry_id: String,
    pub year: i32,
    pub month: i32,
    pub price_per_unit: String,
    pub amount: String,
    pub additional_transactions: String,
}

/// Database model for savings plan sections
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_plan_sections)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SavingsPlanSectionDB {
    pub entry_id: String,
    pub start_month: String,
    pub end_month: String,
    pub amount: String,
    pub plan_interval: String,
}

fn decode_decimal(column: &str, raw: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(raw)
        .map_err(|e| StorageError::Decode(format!("{} '{}': {}", column, raw, e)))
}

fn decode_month(column: &str, raw: &str) -> Result<YearMonth, StorageError> {
    YearMonth::from_str(raw).map_err(|e| StorageError::Decode(format!("{} '{}': {}", column, raw, e)))
}

impl DepotEntryDB {
    pub fn from_entry(entry: &DepotEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.name.clone(),
            variant: entry.variant.to_string(),
            created_year: entry.created_year,
            creation_sequence: entry.sequence,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// A domain entry without ledger rows or savings plan.
    pub fn into_entry(self) -> Result<DepotEntry, StorageError> {
        let variant = InvestmentVariant::from_str(&self.variant)
            .map_err(|e| StorageError::Decode(format!("variant: {}", e)))?;
        Ok(DepotEntry {
            id: self.id.into(),
            name: self.name,
            variant,
            created_year: self.created_year,
            sequence: self.creation_sequence,
            savings_plan: Vec::new(),
            years: Default::default(),
        })
    }
}

impl DepotMonthDB {
    pub fn from_observation(entry_id: &str, year: i32, observation: &MonthlyObservation) -> Self {
        Self {
            entry_id: entry_id.to_string(),
            year,
            month: observation.month as i32,
            price_per_unit: observation.price_per_unit.to_string(),
            amount: observation.amount.to_string(),
            additional_transactions: observation.additional_transactions.to_string(),
        }
    }

    /// All twelve rows of a year table.
    pub fn from_year(entry_id: &str, year_table: &YearTable) -> Vec<Self> {
        year_table
            .months
            .iter()
            .map(|o| Self::from_observation(entry_id, year_table.year, o))
            .collect()
    }
}

impl TryFrom<DepotMonthDB> for MonthlyObservation {
    type Error = StorageError;

    fn try_from(db: DepotMonthDB) -> Result<Self, Self::Error> {
        let month = u32::try_from(db.month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| StorageError::Decode(format!("month {}", db.month)))?;
        Ok(MonthlyObservation {
            month,
            price_per_unit: decode_decimal("price_per_unit", &db.price_per_unit)?,
            amount: decode_decimal("amount", &db.amount)?,
            additional_transactions: decode_decimal(
                "additional_transactions",
                &db.additional_transactions,
            )?,
        })
    }
}

impl SavingsPlanSectionDB {
    pub fn from_section(entry_id: &str, section: &SavingsPlanSection) -> Self {
        Self {
            entry_id: entry_id.to_string(),
            start_month: section.start.to_string(),
            end_month: section.end.to_string(),
            amount: section.amount.to_string(),
            plan_interval: section.interval.to_string(),
        }
    }
}

impl TryFrom<SavingsPlanSectionDB> for SavingsPlanSection {
    type Error = StorageError;

    fn try_from(db: SavingsPlanSectionDB) -> Result<Self, Self::Error> {
        Ok(SavingsPlanSection {
            start: decode_month("start_month", &db.start_month)?,
            end: decode_month("end_month", &db.end_month)?,
            amount: decode_decimal("amount", &db.amount)?,
            interval: SavingsPlanInterval::from_str(&db.plan_interval)
                .map_err(StorageError::Decode)?,
        })
    }
}
