//! Depot valuation domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DATASET_LABEL_DEPOT_VALUE, DATASET_LABEL_TRANSACTIONS, DISPLAY_DECIMAL_PRECISION};
use crate::depot::{EntryId, InvestmentVariant};
use crate::utils::time_utils::YearMonth;

/// Value of one entry in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPoint {
    pub month: YearMonth,
    /// Units held times price per unit, carried forward from the last recorded month
    pub value: Decimal,
    /// Additional plus planned transactions of the month
    pub net_transactions: Decimal,
}

/// Value of the whole depot in one month of the unified axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepotValuationPoint {
    pub month: YearMonth,
    pub depot_value: Decimal,
    pub net_transactions: Decimal,
}

/// Latest carried value of one entry at the end of the axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryValue {
    pub entry_id: EntryId,
    pub name: String,
    pub variant: InvestmentVariant,
    pub latest_value: Decimal,
    /// Last month with a recorded price or amount
    pub last_recorded: Option<YearMonth>,
}

/// Depot-wide timeline over the unified monthly axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepotTimeline {
    pub points: Vec<DepotValuationPoint>,
    pub entries: Vec<EntryValue>,
}

impl DepotTimeline {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.month.to_string()).collect()
    }

    pub fn depot_values(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.depot_value).collect()
    }

    pub fn net_transactions(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.net_transactions).collect()
    }

    /// Index and value of the first month holding any value.
    pub fn baseline(&self) -> Option<(usize, Decimal)> {
        self.points
            .iter()
            .position(|p| !p.depot_value.is_zero())
            .map(|i| (i, self.points[i].depot_value))
    }

    /// The depot value and net transaction series, in that order.
    pub fn datasets(&self) -> Vec<ChartDataset> {
        vec![
            ChartDataset::complete(DATASET_LABEL_DEPOT_VALUE, self.depot_values()),
            ChartDataset::complete(DATASET_LABEL_TRANSACTIONS, self.net_transactions()),
        ]
    }

    pub fn chart(&self) -> AlltimeChart {
        AlltimeChart {
            labels: self.labels(),
            datasets: self.datasets(),
        }
    }
}

/// One chart series aligned to the alltime labels.
///
/// `None` marks a month without a value (rendered as a gap).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<Option<Decimal>>,
}

impl ChartDataset {
    pub fn new(label: impl Into<String>, data: Vec<Option<Decimal>>) -> Self {
        Self {
            label: label.into(),
            data: data
                .into_iter()
                .map(|v| v.map(|d| d.round_dp(DISPLAY_DECIMAL_PRECISION)))
                .collect(),
        }
    }

    /// A series with a value for every label.
    pub fn complete(label: impl Into<String>, data: Vec<Decimal>) -> Self {
        Self::new(label, data.into_iter().map(Some).collect())
    }
}

/// Labels plus datasets, ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlltimeChart {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Aggregate summary of the depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepotOverview {
    pub entry_count: usize,
    pub first_label: Option<String>,
    pub last_label: Option<String>,
    pub current_value: Decimal,
    pub total_net_transactions: Decimal,
    pub entries: Vec<EntryValue>,
}

impl From<&DepotTimeline> for DepotOverview {
    fn from(timeline: &DepotTimeline) -> Self {
        Self {
            entry_count: timeline.entries.len(),
            first_label: timeline.points.first().map(|p| p.month.to_string()),
            last_label: timeline.points.last().map(|p| p.month.to_string()),
            current_value: timeline
                .points
                .last()
                .map(|p| p.depot_value.round_dp(DISPLAY_DECIMAL_PRECISION))
                .unwrap_or(Decimal::ZERO),
            total_net_transactions: timeline
                .points
                .iter()
                .map(|p| p.net_transactions)
                .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v)),
            entries: timeline.entries.clone(),
        }
    }
}
