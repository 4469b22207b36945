//! Depot entry domain models.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ledger_model::YearTable;
use super::savings_plan::SavingsPlanSection;

/// Stable identifier of a depot entry.
///
/// Derived from the entry name and its creation sequence number, so it never
/// changes for the lifetime of the entry and is safe to use as an html id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn derive(name: &str, sequence: i64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(b"|");
        hasher.update(sequence.to_be_bytes());
        let digest = hasher.finalize();
        EntryId(hex::encode(&digest[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        EntryId(value)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        EntryId(value.to_string())
    }
}

impl PartialEq<str> for EntryId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Category of a tracked holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InvestmentVariant {
    Stock,
    Fund,
    Etf,
    Bond,
    Option,
    Commodity,
    Crypto,
}

impl InvestmentVariant {
    pub const ALL: [InvestmentVariant; 7] = [
        InvestmentVariant::Stock,
        InvestmentVariant::Fund,
        InvestmentVariant::Etf,
        InvestmentVariant::Bond,
        InvestmentVariant::Option,
        InvestmentVariant::Commodity,
        InvestmentVariant::Crypto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentVariant::Stock => "Stock",
            InvestmentVariant::Fund => "Fund",
            InvestmentVariant::Etf => "Etf",
            InvestmentVariant::Bond => "Bond",
            InvestmentVariant::Option => "Option",
            InvestmentVariant::Commodity => "Commodity",
            InvestmentVariant::Crypto => "Crypto",
        }
    }
}

impl fmt::Display for InvestmentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestmentVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InvestmentVariant::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("{} is not a possible investment variant", s))
    }
}

impl TryFrom<String> for InvestmentVariant {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InvestmentVariant> for String {
    fn from(value: InvestmentVariant) -> Self {
        value.as_str().to_string()
    }
}

/// Domain model representing one tracked holding and its ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepotEntry {
    pub id: EntryId,
    pub name: String,
    pub variant: InvestmentVariant,
    /// Year the entry was created with; the ledger may since reach further back.
    pub created_year: i32,
    /// Creation order inside the depot, never reused.
    pub sequence: i64,
    /// Ordered by start month.
    pub savings_plan: Vec<SavingsPlanSection>,
    /// Year tables keyed by year, iterated earliest first.
    pub years: BTreeMap<i32, YearTable>,
}

/// Input model for creating a new depot entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDepotEntry {
    pub name: String,
    pub variant: InvestmentVariant,
    /// Year of the first ledger table; the current year when absent.
    #[serde(default)]
    pub start_year: Option<i32>,
}

/// One line of the entry list, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepotEntrySummary {
    pub id: EntryId,
    pub name: String,
    pub variant: InvestmentVariant,
}

impl From<&DepotEntry> for DepotEntrySummary {
    fn from(entry: &DepotEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            variant: entry.variant,
        }
    }
}

/// A cell write as issued by the ledger table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellUpdate {
    pub field: super::ledger_model::LedgerField,
    pub year: i32,
    pub month: u32,
    /// Raw user input, parsed by the ledger.
    pub value: String,
}

/// Structured form of the per-entry year x month grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTable {
    pub entry_id: EntryId,
    pub name: String,
    pub variant: InvestmentVariant,
    pub years: Vec<EntryTableYear>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTableYear {
    pub year: i32,
    pub rows: Vec<EntryTableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTableRow {
    pub month: u32,
    pub price_per_unit: Decimal,
    pub amount: Decimal,
    pub shares_value: Decimal,
    pub additional_transactions: Decimal,
    pub planned_transactions: Decimal,
    pub combined_transactions: Decimal,
}
