//! Monthly ledger domain models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MONTHS_PER_YEAR;

/// The editable columns of a ledger cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerField {
    /// Price of one unit at the time the month was recorded
    PricePerUnit,
    /// Units held at the end of the month (absolute, not a delta)
    Amount,
    /// Signed cash flow outside the savings plan (inflow positive)
    AdditionalTransactions,
}

impl LedgerField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerField::PricePerUnit => "PricePerUnit",
            LedgerField::Amount => "Amount",
            LedgerField::AdditionalTransactions => "AdditionalTransactions",
        }
    }

    /// Whether the field rejects negative values.
    pub fn is_non_negative(&self) -> bool {
        !matches!(self, LedgerField::AdditionalTransactions)
    }
}

impl fmt::Display for LedgerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PricePerUnit" => Ok(LedgerField::PricePerUnit),
            "Amount" => Ok(LedgerField::Amount),
            "AdditionalTransactions" => Ok(LedgerField::AdditionalTransactions),
            _ => Err(format!("Unknown ledger field: {}", s)),
        }
    }
}

/// One observation of an entry in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyObservation {
    pub month: u32,
    pub price_per_unit: Decimal,
    pub amount: Decimal,
    pub additional_transactions: Decimal,
}

impl MonthlyObservation {
    pub fn empty(month: u32) -> Self {
        Self {
            month,
            price_per_unit: Decimal::ZERO,
            amount: Decimal::ZERO,
            additional_transactions: Decimal::ZERO,
        }
    }

    pub fn get(&self, field: LedgerField) -> Decimal {
        match field {
            LedgerField::PricePerUnit => self.price_per_unit,
            LedgerField::Amount => self.amount,
            LedgerField::AdditionalTransactions => self.additional_transactions,
        }
    }

    pub fn set(&mut self, field: LedgerField, value: Decimal) {
        match field {
            LedgerField::PricePerUnit => self.price_per_unit = value,
            LedgerField::Amount => self.amount = value,
            LedgerField::AdditionalTransactions => self.additional_transactions = value,
        }
    }

    /// A month counts as recorded once a price or a unit count was entered.
    ///
    /// A month with a price and no units is recorded with zero units, so the
    /// entry is worth nothing from that month until the next recorded one.
    pub fn is_recorded(&self) -> bool {
        !self.price_per_unit.is_zero() || !self.amount.is_zero()
    }

    pub fn shares_value(&self) -> Decimal {
        self.price_per_unit * self.amount
    }
}

/// The twelve observations of one entry in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearTable {
    pub year: i32,
    pub months: [MonthlyObservation; MONTHS_PER_YEAR as usize],
}

impl YearTable {
    /// A year whose cells all read as zero.
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            months: std::array::from_fn(|i| MonthlyObservation::empty(i as u32 + 1)),
        }
    }

    pub fn month(&self, month: u32) -> Option<&MonthlyObservation> {
        month.checked_sub(1).and_then(|i| self.months.get(i as usize))
    }

    pub fn month_mut(&mut self, month: u32) -> Option<&mut MonthlyObservation> {
        month
            .checked_sub(1)
            .and_then(move |i| self.months.get_mut(i as usize))
    }
}
