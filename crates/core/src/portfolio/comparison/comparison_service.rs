use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;
use rust_decimal::Decimal;

use super::comparison_model::{parse_rate, Comparison, ComparisonAction, ComparisonKind};
use crate::depot::DepotError;
use crate::errors::{Error, Result};
use crate::portfolio::projection::validate_rate;
use crate::portfolio::valuation::{
    prognosis, savings_prognosis, AlltimeChart, ChartDataset, DepotTimeline, ValuationServiceTrait,
};

/// Manages the user-adjustable comparison series.
pub trait ComparisonServiceTrait: Send + Sync {
    /// Active comparisons in the order they were added.
    fn list_comparisons(&self) -> Result<Vec<Comparison>>;

    fn add_comparison(&self, kind: ComparisonKind) -> Result<Comparison>;

    fn remove_comparison(&self, comparison_id: &str) -> Result<()>;

    /// Replaces the rate of a comparison with the parsed `new_value`.
    fn update_comparison(&self, comparison_id: &str, new_value: &str) -> Result<Comparison>;

    /// Runs an overview button action and returns the updated set.
    fn apply_action(&self, action: ComparisonAction) -> Result<Vec<Comparison>>;

    /// One dataset per active comparison, aligned to the timeline labels.
    fn materialize(&self, timeline: &DepotTimeline) -> Result<Vec<ChartDataset>>;

    /// The alltime chart with the comparison datasets appended.
    fn get_chart(&self) -> Result<AlltimeChart>;
}

#[derive(Debug, Default)]
struct ComparisonSet {
    items: Vec<Comparison>,
    next_id: u64,
}

impl ComparisonSet {
    fn position(&self, comparison_id: &str) -> Result<usize> {
        self.items
            .iter()
            .position(|c| c.id == comparison_id)
            .ok_or_else(|| DepotError::ComparisonNotFound(comparison_id.to_string()).into())
    }
}

/// Holds comparison configuration only; series are derived from the
/// valuation on every read.
pub struct ComparisonService {
    valuation_service: Arc<dyn ValuationServiceTrait>,
    default_rate: Decimal,
    state: RwLock<ComparisonSet>,
}

impl ComparisonService {
    pub fn new(valuation_service: Arc<dyn ValuationServiceTrait>, default_rate: Decimal) -> Self {
        Self {
            valuation_service,
            default_rate,
            state: RwLock::new(ComparisonSet::default()),
        }
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, ComparisonSet>> {
        self.state
            .read()
            .map_err(|_| Error::Unexpected("Comparison state lock poisoned".to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, ComparisonSet>> {
        self.state
            .write()
            .map_err(|_| Error::Unexpected("Comparison state lock poisoned".to_string()))
    }

    fn dataset(kind: &ComparisonKind, timeline: &DepotTimeline) -> Result<ChartDataset> {
        let label = kind.label();
        Ok(match kind {
            ComparisonKind::DepotValue => ChartDataset::complete(label, timeline.depot_values()),
            ComparisonKind::TransactionOverlay => {
                let running = timeline
                    .net_transactions()
                    .into_iter()
                    .scan(Decimal::ZERO, |total, flow| {
                        *total = total.saturating_add(flow);
                        Some(*total)
                    })
                    .collect();
                ChartDataset::complete(label, running)
            }
            ComparisonKind::Projection { rate } => {
                ChartDataset::new(label, prognosis(timeline, *rate)?)
            }
            ComparisonKind::SavingsCurve { rate } => {
                ChartDataset::new(label, savings_prognosis(timeline, *rate)?)
            }
        })
    }
}

impl ComparisonServiceTrait for ComparisonService {
    fn list_comparisons(&self) -> Result<Vec<Comparison>> {
        Ok(self.read_state()?.items.clone())
    }

    fn add_comparison(&self, kind: ComparisonKind) -> Result<Comparison> {
        if let Some(rate) = kind.rate() {
            validate_rate(rate)?;
        }

        let mut state = self.write_state()?;
        state.next_id += 1;
        let comparison = Comparison::new(format!("comparison-{}", state.next_id), kind);
        state.items.push(comparison.clone());
        debug!("Added comparison {} ({})", comparison.id, comparison.label);
        Ok(comparison)
    }

    fn remove_comparison(&self, comparison_id: &str) -> Result<()> {
        let mut state = self.write_state()?;
        let index = state.position(comparison_id)?;
        state.items.remove(index);
        debug!("Removed comparison {}", comparison_id);
        Ok(())
    }

    fn update_comparison(&self, comparison_id: &str, new_value: &str) -> Result<Comparison> {
        let mut state = self.write_state()?;
        let index = state.position(comparison_id)?;

        let rate = parse_rate(new_value)?;
        let kind = state.items[index].kind.with_rate(rate).ok_or_else(|| {
            DepotError::invalid_value(
                "rate",
                format!("comparison {} has no adjustable rate", comparison_id),
            )
        })?;

        let updated = Comparison::new(comparison_id.to_string(), kind);
        state.items[index] = updated.clone();
        debug!("Updated comparison {} to {}", comparison_id, updated.label);
        Ok(updated)
    }

    fn apply_action(&self, action: ComparisonAction) -> Result<Vec<Comparison>> {
        match action {
            ComparisonAction::Add => {
                self.add_comparison(ComparisonKind::Projection {
                    rate: self.default_rate,
                })?;
            }
            ComparisonAction::Remove => {
                let mut state = self.write_state()?;
                let removed = state
                    .items
                    .pop()
                    .ok_or_else(|| DepotError::ComparisonNotFound("latest".to_string()))?;
                debug!("Removed comparison {}", removed.id);
            }
        }
        self.list_comparisons()
    }

    fn materialize(&self, timeline: &DepotTimeline) -> Result<Vec<ChartDataset>> {
        let kinds: Vec<ComparisonKind> = self.read_state()?.items.iter().map(|c| c.kind).collect();
        kinds
            .iter()
            .map(|kind| Self::dataset(kind, timeline))
            .collect()
    }

    fn get_chart(&self) -> Result<AlltimeChart> {
        let timeline = self.valuation_service.get_timeline()?;
        let mut chart = timeline.chart();
        chart.datasets.extend(self.materialize(&timeline)?);
        Ok(chart)
    }
}
