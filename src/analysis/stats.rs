//! Per-month descriptive statistics over raw PVGIS samples.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{EnumIter, IntoEnumIterator};
use tracing::warn;

use crate::pvgis::RawMonthlySample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter)]
pub enum Metric {
    #[serde(rename = "H(h)_m")]
    Horizontal,
    #[serde(rename = "H(i_opt)_m")]
    OptimalAngle,
    #[serde(rename = "H(i)_m")]
    SelectedAngle,
    #[serde(rename = "Hb(n)_m")]
    DirectNormal,
    #[serde(rename = "Kd")]
    DiffuseRatio,
    #[serde(rename = "T2m")]
    Temperature,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::Horizontal => "Horizontal Irradiation (kWh/m²)",
            Metric::OptimalAngle => "Optimal Angle Irradiation (kWh/m²)",
            Metric::SelectedAngle => "Selected Angle Irradiation (kWh/m²)",
            Metric::DirectNormal => "Direct Normal Irradiation (kWh/m²)",
            Metric::DiffuseRatio => "Diffuse to Global Ratio",
            Metric::Temperature => "Average Temperature (°C)",
        }
    }

    pub fn value_of(self, sample: &RawMonthlySample) -> Option<f64> {
        match self {
            Metric::Horizontal => sample.horizontal,
            Metric::OptimalAngle => sample.optimal_angle,
            Metric::SelectedAngle => sample.selected_angle,
            Metric::DirectNormal => sample.direct_normal,
            Metric::DiffuseRatio => sample.diffuse_ratio,
            Metric::Temperature => sample.temperature,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStat {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    pub count: usize,
}

impl MonthlyStat {
    /// `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        Some(Self {
            min: sorted[0],
            max: sorted[n - 1],
            avg: sorted.iter().sum::<f64>() / n as f64,
            median,
            count: n,
        })
    }
}

pub type MonthStats = BTreeMap<Metric, MonthlyStat>;

/// Statistics for all twelve months. A month without samples is present
/// with no metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlyAggregate {
    months: BTreeMap<u8, MonthStats>,
}

impl Default for MonthlyAggregate {
    fn default() -> Self {
        Self { months: (1..=12).map(|m| (m, MonthStats::new())).collect() }
    }
}

impl MonthlyAggregate {
    pub fn stat(&self, month: u8, metric: Metric) -> Option<&MonthlyStat> {
        self.months.get(&month).and_then(|m| m.get(&metric))
    }

    pub fn avg(&self, month: u8, metric: Metric) -> Option<f64> {
        self.stat(month, metric).map(|s| s.avg)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &MonthStats)> {
        self.months.iter().map(|(m, stats)| (*m, stats))
    }
}

fn calendar_month(month: i32) -> Option<u8> {
    u8::try_from(month).ok().filter(|m| (1..=12).contains(m))
}

/// Groups samples by month and metric. Zero counts as a value; samples with
/// a month outside 1-12 and non-finite values are skipped.
pub fn aggregate(samples: &[RawMonthlySample]) -> MonthlyAggregate {
    let (valid, invalid): (Vec<_>, Vec<_>) = samples
        .iter()
        .partition(|s| calendar_month(s.month).is_some());
    if !invalid.is_empty() {
        warn!(skipped = invalid.len(), "dropping samples with an invalid month");
    }

    let grouped = valid
        .into_iter()
        .filter_map(|s| calendar_month(s.month).map(|m| (m, s)))
        .flat_map(|(month, sample)| {
            Metric::iter().filter_map(move |metric| {
                metric
                    .value_of(sample)
                    .filter(|v| v.is_finite())
                    .map(|v| ((month, metric), v))
            })
        })
        .into_group_map();

    let mut out = MonthlyAggregate::default();
    for ((month, metric), values) in grouped {
        if let Some(stat) = MonthlyStat::from_values(&values) {
            out.months.entry(month).or_default().insert(metric, stat);
        }
    }
    out
}
