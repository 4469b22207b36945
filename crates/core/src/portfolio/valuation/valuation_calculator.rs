use log::debug;
use rust_decimal::Decimal;

use super::valuation_model::{DepotTimeline, DepotValuationPoint, EntryValue, ValuationPoint};
use crate::depot::DepotEntry;
use crate::errors::Result;
use crate::portfolio::projection::{project, savings_curve, validate_rate, ProjectionPoint};
use crate::utils::time_utils::{get_months_between, YearMonth};

/// Lazy walk over one entry's ledger, earliest month first.
///
/// Months without a recorded price or amount carry the last recorded ones
/// forward; before the first recorded month the value is zero. The walk is
/// bounded by the entry's span and by `through`. Clone it to restart.
#[derive(Debug, Clone)]
pub struct EntryValuationIter<'a> {
    entry: &'a DepotEntry,
    cursor: Option<YearMonth>,
    end: YearMonth,
    price: Decimal,
    units: Decimal,
}

impl<'a> EntryValuationIter<'a> {
    pub fn new(entry: &'a DepotEntry, through: YearMonth) -> Self {
        let (cursor, end) = match entry.span() {
            Some((start, last)) => {
                let end = last.min(through);
                (Some(start).filter(|s| *s <= end), end)
            }
            None => (None, through),
        };
        Self {
            entry,
            cursor,
            end,
            price: Decimal::ZERO,
            units: Decimal::ZERO,
        }
    }
}

impl Iterator for EntryValuationIter<'_> {
    type Item = ValuationPoint;

    fn next(&mut self) -> Option<ValuationPoint> {
        let month = self.cursor?;
        self.cursor = Some(month.succ()).filter(|m| *m <= self.end);

        if let Some(observation) = self
            .entry
            .observation(month.year(), month.month())
            .filter(|o| o.is_recorded())
        {
            self.price = observation.price_per_unit;
            self.units = observation.amount;
        }

        Some(ValuationPoint {
            month,
            value: self.price.saturating_mul(self.units),
            net_transactions: self.entry.net_transactions(month),
        })
    }
}

/// Valuation series of one entry through `through`.
pub fn entry_valuation(entry: &DepotEntry, through: YearMonth) -> EntryValuationIter<'_> {
    EntryValuationIter::new(entry, through)
}

/// First and last month of the unified axis: January of the earliest year to
/// the earlier of `through` and December of the latest year.
pub fn unified_axis(entries: &[DepotEntry], through: YearMonth) -> Option<(YearMonth, YearMonth)> {
    let first = entries.iter().filter_map(|e| e.first_year()).min()?;
    let last = entries.iter().filter_map(|e| e.last_year()).max()?;
    let start = YearMonth::january(first);
    let end = YearMonth::december(last).min(through);
    (start <= end).then_some((start, end))
}

/// Merges every entry's series on the unified axis.
///
/// An entry whose ledger ends before the axis does keeps contributing its last
/// value, so a shorter entry never causes a drop in the depot value.
pub fn calculate_depot_timeline(entries: &[DepotEntry], through: YearMonth) -> DepotTimeline {
    let Some((start, end)) = unified_axis(entries, through) else {
        return DepotTimeline {
            points: Vec::new(),
            entries: entries.iter().map(empty_entry_value).collect(),
        };
    };

    let months = get_months_between(start, end);
    let mut depot_values = vec![Decimal::ZERO; months.len()];
    let mut net_transactions = vec![Decimal::ZERO; months.len()];
    let mut entry_values = Vec::with_capacity(entries.len());

    for entry in entries {
        let mut series = entry_valuation(entry, end).peekable();
        let mut carried = Decimal::ZERO;

        for (i, month) in months.iter().enumerate() {
            let flow = match series.next_if(|p| p.month == *month) {
                Some(point) => {
                    carried = point.value;
                    point.net_transactions
                }
                None => entry.net_transactions(*month),
            };
            depot_values[i] = depot_values[i].saturating_add(carried);
            net_transactions[i] = net_transactions[i].saturating_add(flow);
        }

        entry_values.push(EntryValue {
            latest_value: carried,
            ..empty_entry_value(entry)
        });
    }

    debug!(
        "Depot timeline {}..{}: {} months over {} entries",
        start,
        end,
        months.len(),
        entries.len()
    );

    DepotTimeline {
        points: months
            .into_iter()
            .zip(depot_values)
            .zip(net_transactions)
            .map(|((month, depot_value), net_transactions)| DepotValuationPoint {
                month,
                depot_value,
                net_transactions,
            })
            .collect(),
        entries: entry_values,
    }
}

/// Compound growth from the first valued month, aligned to the timeline labels.
///
/// Months before the baseline have no value.
pub fn prognosis(timeline: &DepotTimeline, rate: Decimal) -> Result<Vec<Option<Decimal>>> {
    validate_rate(rate)?;
    let Some((index, baseline)) = timeline.baseline() else {
        return Ok(vec![None; timeline.points.len()]);
    };
    let horizon = timeline.points.len() - 1 - index;
    let projected = project(baseline, timeline.points[index].month, rate, horizon)?;
    Ok(align(index, projected))
}

/// Like [`prognosis`], but every later month also adds the depot's net transactions.
pub fn savings_prognosis(timeline: &DepotTimeline, rate: Decimal) -> Result<Vec<Option<Decimal>>> {
    validate_rate(rate)?;
    let Some((index, baseline)) = timeline.baseline() else {
        return Ok(vec![None; timeline.points.len()]);
    };
    let flows = timeline.points[index + 1..].iter().map(|p| p.net_transactions);
    let curve = savings_curve(baseline, timeline.points[index].month, rate, flows)?;
    Ok(align(index, curve))
}

fn align(index: usize, points: Vec<ProjectionPoint>) -> Vec<Option<Decimal>> {
    std::iter::repeat(None)
        .take(index)
        .chain(points.into_iter().map(|p| Some(p.value)))
        .collect()
}

fn empty_entry_value(entry: &DepotEntry) -> EntryValue {
    let last_recorded = entry
        .years
        .values()
        .rev()
        .flat_map(|y| y.months.iter().rev().map(move |o| (y.year, o)))
        .find(|(_, o)| o.is_recorded())
        .and_then(|(year, o)| YearMonth::new(year, o.month));

    EntryValue {
        entry_id: entry.id.clone(),
        name: entry.name.clone(),
        variant: entry.variant,
        latest_value: Decimal::ZERO,
        last_recorded,
    }
}
