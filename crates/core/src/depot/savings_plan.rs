//! Savings plans: recurring planned transactions of a depot entry.

use std::fmt;
use std::str::FromStr;

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::depot_errors::DepotError;
use crate::utils::time_utils::YearMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavingsPlanInterval {
    Monthly,
    Annually,
}

impl fmt::Display for SavingsPlanInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SavingsPlanInterval::Monthly => write!(f, "Monthly"),
            SavingsPlanInterval::Annually => write!(f, "Annually"),
        }
    }
}

impl FromStr for SavingsPlanInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(SavingsPlanInterval::Monthly),
            "annually" => Ok(SavingsPlanInterval::Annually),
            _ => Err(format!("{} is not a savings plan interval", s)),
        }
    }
}

/// A period in which the same amount is invested on a fixed interval.
///
/// `start` and `end` are inclusive. `amount` may be negative for withdrawal plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlanSection {
    pub start: YearMonth,
    pub end: YearMonth,
    pub amount: Decimal,
    pub interval: SavingsPlanInterval,
}

impl SavingsPlanSection {
    pub fn contains(&self, month: YearMonth) -> bool {
        self.start <= month && month <= self.end
    }

    fn overlaps(&self, other: &SavingsPlanSection) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Planned amount for `month`; annual plans pay out in December.
    pub fn amount_for(&self, month: YearMonth) -> Decimal {
        if !self.contains(month) {
            return Decimal::ZERO;
        }
        match self.interval {
            SavingsPlanInterval::Monthly => self.amount,
            SavingsPlanInterval::Annually if month.month() == 12 => self.amount,
            SavingsPlanInterval::Annually => Decimal::ZERO,
        }
    }

    /// Annual sections span whole years: the end is moved to the start's
    /// month, at least one year after the start.
    fn normalized(mut self) -> Self {
        if self.interval == SavingsPlanInterval::Annually {
            let end_year = self.end.year().max(self.start.year() + 1);
            if let Some(end) = YearMonth::new(end_year, self.start.month()) {
                if end != self.end {
                    debug!(
                        "Annual savings plan section {}..{} adjusted to end at {}",
                        self.start, self.end, end
                    );
                }
                self.end = end;
            }
        }
        self
    }
}

/// Validates `new` against `plan`, inserts it in chronological order and
/// returns the section as stored.
pub fn insert_section(
    plan: &mut Vec<SavingsPlanSection>,
    new: SavingsPlanSection,
) -> Result<SavingsPlanSection, DepotError> {
    if new.end < new.start {
        return Err(DepotError::InvalidSavingsPlan(format!(
            "end {} is before start {}",
            new.end, new.start
        )));
    }
    let new = new.normalized();

    if let Some(existing) = plan.iter().find(|s| s.overlaps(&new)) {
        return Err(DepotError::OverlappingSavingsPlan {
            start: existing.start,
            end: existing.end,
        });
    }

    let position = plan
        .iter()
        .position(|s| s.start > new.start)
        .unwrap_or(plan.len());
    plan.insert(position, new.clone());
    Ok(new)
}

/// Sum of planned transactions of every section for `month`.
pub fn planned_transactions(plan: &[SavingsPlanSection], month: YearMonth) -> Decimal {
    plan.iter().map(|s| s.amount_for(month)).sum()
}
