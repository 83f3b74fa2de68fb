//! Temperature-adjusted monthly energy model.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::stats::{Metric, MonthlyAggregate};
use crate::domain::{Derived, PanelConfiguration, STC_IRRADIANCE_W_M2};

/// Efficiency drop per °C above the reference temperature.
pub const TEMPERATURE_COEFFICIENT: f64 = 0.004;
pub const REFERENCE_TEMPERATURE_C: f64 = 25.0;

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub fn days_in_month(month: u8) -> u32 {
    DAYS_IN_MONTH[usize::from(month.clamp(1, 12)) - 1]
}

pub fn temperature_factor(temperature_c: f64) -> f64 {
    1.0 - TEMPERATURE_COEFFICIENT * (temperature_c - REFERENCE_TEMPERATURE_C)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySimulationResult {
    pub month: u8,
    #[serde(rename = "energyKWh")]
    pub energy_kwh: f64,
    /// Average daily peak sun hours.
    pub peak_sun_hours: f64,
    pub efficiency_percent: f64,
    pub temperature_c: f64,
    #[serde(rename = "irradiationKWhM2")]
    pub irradiation_kwh_m2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyProfile {
    pub monthly: Vec<MonthlySimulationResult>,
    #[serde(rename = "annualEnergyKWh")]
    pub annual_energy_kwh: f64,
    pub peak_power_w: f64,
    pub efficiency_factor_percent: Derived,
    #[serde(rename = "theoreticalMaxKWh")]
    pub theoretical_max_kwh: f64,
}

/// Best available in-plane irradiation: selected angle, then optimal angle,
/// then horizontal. `None` when the month has none of them.
fn irradiation(aggregate: &MonthlyAggregate, month: u8) -> Option<f64> {
    [Metric::SelectedAngle, Metric::OptimalAngle, Metric::Horizontal]
        .into_iter()
        .find_map(|metric| aggregate.avg(month, metric))
}

pub fn simulate(aggregate: &MonthlyAggregate, panel: &PanelConfiguration, panel_count: u32) -> EnergyProfile {
    let total_area = panel.total_area_m2(panel_count);
    let base = panel.efficiency();
    let losses = panel.losses();

    // efficiency of months that had irradiation samples; the rest count as zero
    let mut sampled_efficiency = 0.0;
    let monthly: Vec<MonthlySimulationResult> = (1..=12u8)
        .map(|month| {
            let sampled = irradiation(aggregate, month);
            let irradiation = sampled.unwrap_or(0.0);
            let temperature = aggregate.avg(month, Metric::Temperature).unwrap_or_else(|| {
                warn!(month, assumed_c = REFERENCE_TEMPERATURE_C, "no temperature samples for month");
                REFERENCE_TEMPERATURE_C
            });
            let efficiency = base * temperature_factor(temperature) * (1.0 - losses);
            let energy = (total_area * irradiation * efficiency).max(0.0);
            if sampled.is_some() {
                sampled_efficiency += efficiency;
            }

            MonthlySimulationResult {
                month,
                energy_kwh: energy,
                peak_sun_hours: (irradiation / f64::from(days_in_month(month))).max(0.0),
                efficiency_percent: efficiency * 100.0,
                temperature_c: temperature,
                irradiation_kwh_m2: irradiation,
            }
        })
        .collect();

    let annual_energy_kwh: f64 = monthly.iter().map(|m| m.energy_kwh).sum();
    let mean_efficiency = sampled_efficiency / 12.0;
    let mean_daily_psh = monthly.iter().map(|m| m.peak_sun_hours).sum::<f64>() / 12.0;

    let peak_power_w = total_area * STC_IRRADIANCE_W_M2 * mean_efficiency;
    let theoretical_max_kwh = total_area * STC_IRRADIANCE_W_M2 * mean_daily_psh * 365.0 * base / 1000.0;
    let efficiency_factor_percent = Derived::ratio(annual_energy_kwh, theoretical_max_kwh).map(|r| r * 100.0);

    EnergyProfile {
        monthly,
        annual_energy_kwh,
        peak_power_w,
        efficiency_factor_percent,
        theoretical_max_kwh,
    }
}
