use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;

use super::valuation_calculator::{calculate_depot_timeline, prognosis};
use super::valuation_model::{AlltimeChart, ChartDataset, DepotOverview, DepotTimeline};
use crate::depot::DepotServiceTrait;
use crate::errors::Result;
use crate::utils::time_utils::{current_month, YearMonth};

/// Read-side of the depot: timelines, charts and the overview.
pub trait ValuationServiceTrait: Send + Sync {
    /// The depot-wide timeline over the unified axis.
    fn get_timeline(&self) -> Result<DepotTimeline>;

    fn get_overview(&self) -> Result<DepotOverview>;

    /// Month labels of the unified axis (`YYYY-MM`).
    fn get_alltime_labels(&self) -> Result<Vec<String>>;

    /// Depot value and net transaction series aligned to the labels.
    fn get_alltime_datasets(&self) -> Result<Vec<ChartDataset>>;

    fn get_alltime_chart(&self) -> Result<AlltimeChart>;

    /// Compound growth of the first depot value at `growth_rate` per month.
    fn get_prognosis(&self, growth_rate: Decimal) -> Result<Vec<Option<Decimal>>>;
}

pub struct ValuationService {
    depot_service: Arc<dyn DepotServiceTrait>,
    as_of: Option<YearMonth>,
}

impl ValuationService {
    pub fn new(depot_service: Arc<dyn DepotServiceTrait>) -> Self {
        Self {
            depot_service,
            as_of: None,
        }
    }

    /// Pins the end of the axis instead of following the calendar.
    pub fn with_as_of(mut self, month: YearMonth) -> Self {
        self.as_of = Some(month);
        self
    }

    fn through(&self) -> YearMonth {
        self.as_of.unwrap_or_else(current_month)
    }
}

impl ValuationServiceTrait for ValuationService {
    fn get_timeline(&self) -> Result<DepotTimeline> {
        let entries = self.depot_service.snapshot()?;
        Ok(calculate_depot_timeline(&entries, self.through()))
    }

    fn get_overview(&self) -> Result<DepotOverview> {
        Ok(DepotOverview::from(&self.get_timeline()?))
    }

    fn get_alltime_labels(&self) -> Result<Vec<String>> {
        Ok(self.get_timeline()?.labels())
    }

    fn get_alltime_datasets(&self) -> Result<Vec<ChartDataset>> {
        Ok(self.get_timeline()?.datasets())
    }

    fn get_alltime_chart(&self) -> Result<AlltimeChart> {
        Ok(self.get_timeline()?.chart())
    }

    fn get_prognosis(&self, growth_rate: Decimal) -> Result<Vec<Option<Decimal>>> {
        let timeline = self.get_timeline()?;
        debug!(
            "Prognosis at {} over {} months",
            growth_rate,
            timeline.points.len()
        );
        let series = prognosis(&timeline, growth_rate)?;
        Ok(ChartDataset::new(String::new(), series).data)
    }
}
