//! Compound-growth projections.
//!
//! Pure functions without state: every call gets its baseline and rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::depot::DepotError;
use crate::errors::{CalculatorError, Result};
use crate::utils::time_utils::YearMonth;

/// Projected value of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub month: YearMonth,
    pub value: Decimal,
}

/// Rates are per period and must stay above -100%.
pub fn validate_rate(rate: Decimal) -> Result<()> {
    if rate <= Decimal::NEGATIVE_ONE {
        return Err(DepotError::invalid_value(
            "rate",
            format!("{} must be greater than -1", rate),
        )
        .into());
    }
    Ok(())
}

/// `value[0] = baseline`, `value[i] = value[i-1] * (1 + rate)` for `i` in `0..=horizon`.
pub fn project(
    baseline: Decimal,
    start_month: YearMonth,
    rate: Decimal,
    horizon: usize,
) -> Result<Vec<ProjectionPoint>> {
    savings_curve(
        baseline,
        start_month,
        rate,
        std::iter::repeat(Decimal::ZERO).take(horizon),
    )
}

/// Like [`project`], but each later month also adds its flow after growing:
/// `value[i] = value[i-1] * (1 + rate) + flows[i-1]`.
///
/// The curve has one point more than `flows` yields.
pub fn savings_curve<I>(
    baseline: Decimal,
    start_month: YearMonth,
    rate: Decimal,
    flows: I,
) -> Result<Vec<ProjectionPoint>>
where
    I: IntoIterator<Item = Decimal>,
{
    validate_rate(rate)?;
    let factor = Decimal::ONE + rate;

    let flows = flows.into_iter();
    let mut points = Vec::with_capacity(flows.size_hint().0 + 1);
    let mut month = start_month;
    let mut value = baseline;
    points.push(ProjectionPoint { month, value });

    for flow in flows {
        month = month.succ();
        value = value
            .checked_mul(factor)
            .and_then(|v| v.checked_add(flow))
            .ok_or_else(|| {
                CalculatorError::Overflow(format!(
                    "projection at rate {} overflows in {}",
                    rate, month
                ))
            })?;
        points.push(ProjectionPoint { month, value });
    }
    Ok(points)
}
