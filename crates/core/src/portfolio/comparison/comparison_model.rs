//! Comparison series configuration.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::depot::DepotError;

/// What a comparison series shows next to the real depot value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComparisonKind {
    /// The real depot value
    DepotValue,
    /// Running sum of all net transactions
    TransactionOverlay,
    /// Compound growth of the first depot value
    Projection { rate: Decimal },
    /// Compound growth of the first depot value plus every later net transaction
    SavingsCurve { rate: Decimal },
}

impl ComparisonKind {
    pub fn rate(&self) -> Option<Decimal> {
        match self {
            ComparisonKind::Projection { rate } | ComparisonKind::SavingsCurve { rate } => {
                Some(*rate)
            }
            ComparisonKind::DepotValue | ComparisonKind::TransactionOverlay => None,
        }
    }

    /// The same kind with another rate; `None` for kinds without a rate.
    pub fn with_rate(&self, rate: Decimal) -> Option<Self> {
        match self {
            ComparisonKind::Projection { .. } => Some(ComparisonKind::Projection { rate }),
            ComparisonKind::SavingsCurve { .. } => Some(ComparisonKind::SavingsCurve { rate }),
            ComparisonKind::DepotValue | ComparisonKind::TransactionOverlay => None,
        }
    }

    /// Chart legend of the series, e.g. `Prognosis 5%`.
    pub fn label(&self) -> String {
        match self {
            ComparisonKind::DepotValue => "Depot value".to_string(),
            ComparisonKind::TransactionOverlay => "Transactions total".to_string(),
            ComparisonKind::Projection { rate } => format!("Prognosis {}%", percent(*rate)),
            ComparisonKind::SavingsCurve { rate } => format!("Savings curve {}%", percent(*rate)),
        }
    }
}

fn percent(rate: Decimal) -> Decimal {
    (rate * dec!(100)).normalize()
}

/// One active comparison series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub id: String,
    pub kind: ComparisonKind,
    pub label: String,
}

impl Comparison {
    pub fn new(id: String, kind: ComparisonKind) -> Self {
        Self {
            id,
            label: kind.label(),
            kind,
        }
    }
}

/// Buttons of the overview page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonAction {
    /// Appends a projection at the default rate
    Add,
    /// Removes the most recently added comparison
    Remove,
}

impl FromStr for ComparisonAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Add" | "add" => Ok(ComparisonAction::Add),
            "Remove" | "remove" => Ok(ComparisonAction::Remove),
            other => Err(format!("Unknown comparison action: {}", other)),
        }
    }
}

/// Parses a user supplied rate.
///
/// A trailing `%` marks a percentage (`7%` is `0.07`); otherwise the value is
/// the rate itself. `,` is accepted as decimal separator.
pub fn parse_rate(raw: &str) -> Result<Decimal, DepotError> {
    let cleaned = raw.trim().replace(',', ".");
    let (number, scale) = match cleaned.strip_suffix('%') {
        Some(number) => (number.trim(), dec!(0.01)),
        None => (cleaned.as_str(), Decimal::ONE),
    };

    let value = Decimal::from_str(number)
        .or_else(|_| Decimal::from_scientific(number))
        .map_err(|_| DepotError::invalid_value("rate", format!("'{}' is not a number", raw)))?;
    let rate = value * scale;

    if rate <= Decimal::NEGATIVE_ONE {
        return Err(DepotError::invalid_value(
            "rate",
            format!("{} must be greater than -1", rate),
        ));
    }
    Ok(rate)
}
