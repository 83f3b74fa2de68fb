//! Presentation of a finished simulation: display strings, tables and the
//! CSV/ZIP exports built from them.

pub mod export;
pub mod format;

pub use export::{export_combined_csv, export_zip, ExportError};

use serde::Serialize;

use crate::analysis::SimulationReport;
use format::*;

/// Ordered label/value pairs of one report section.
pub type Section = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRow {
    pub month: String,
    pub energy_kwh: String,
    pub peak_sun_hours: String,
    pub efficiency: String,
}

/// Per-month statistics table, one row per metric that had samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsTable {
    pub month: String,
    pub rows: Vec<[String; 5]>,
}

pub const STATS_HEADER: [&str; 5] = ["Metric", "Minimum", "Maximum", "Average", "Median"];
pub const MONTHLY_HEADER: [&str; 4] = ["Month", "Energy (kWh)", "Peak Sun Hours", "Efficiency (%)"];

/// A report rendered to the strings a reader sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedReport {
    pub generated_at: String,
    pub location: Section,
    pub panel: Section,
    pub summary: Section,
    pub financial: Section,
    pub monthly: Vec<MonthRow>,
    pub statistics: Vec<StatsTable>,
    pub household_label: String,
}

fn row(label: impl Into<String>, value: impl Into<String>) -> (String, String) {
    (label.into(), value.into())
}

fn enabled(on: bool) -> &'static str {
    if on {
        "Enabled"
    } else {
        "Disabled"
    }
}

impl FormattedReport {
    pub fn from_report(report: &SimulationReport) -> Self {
        let cost = &report.cost_analysis;
        let panel = &report.panel;
        let years = report.lifetime_years;

        let location = vec![
            row("Latitude", report.location.latitude.to_string()),
            row("Longitude", report.location.longitude.to_string()),
            row("Area", format!("{} {}", report.site_area, report.area_unit)),
            row("Region", report.region.to_string()),
        ];

        let panel_rows = vec![
            row("Panel Efficiency (%)", panel.efficiency_percent.to_string()),
            row("Panel Area (m²)", panel.panel_area_m2.to_string()),
            row("Number of Panels", report.capacity.panel_count.to_string()),
            row("Tilt Angle (degrees)", panel.tilt_angle_deg.to_string()),
            row("Azimuth Angle (degrees)", panel.azimuth_angle_deg.to_string()),
            row("System Losses (%)", panel.system_losses_percent.to_string()),
        ];

        let summary = vec![
            row("Annual Energy Production", format_kwh(report.summary.annual_energy_kwh)),
            row("Peak Power", format_peak_kw(report.summary.peak_power_w)),
            row("Efficiency Factor", format_percent(report.summary.efficiency_factor_percent)),
            row("Carbon Offset", format!("{} kg CO₂", format_number(report.summary.carbon_offset_kg))),
        ];

        let financial = vec![
            row("Initial Cost", format_currency(cost.initial_cost)),
            row("Annual Savings", format_currency(cost.total_annual_benefit)),
            row("Monthly Savings", format_currency(cost.monthly_savings)),
            row("Payback Period (years)", format_years(cost.payback_period_years)),
            row(format!("{years}-Year ROI"), format_percent(cost.roi_percent)),
            row(format!("Net Savings ({years} Years)"), format_derived_currency(cost.net_savings)),
            row("System Capacity (Households)", cost.households_powered.to_string()),
            row("Power Balance", format_balance(cost.power_balance_percent)),
            row("Cost per Watt", format!("${:.1}/W", cost.cost_per_watt)),
            row("Net Metering", enabled(cost.net_metering_applied)),
            row("Target Households", cost.target_households.to_string()),
        ];

        let monthly = report
            .monthly
            .iter()
            .map(|m| MonthRow {
                month: month_name(m.month).to_string(),
                energy_kwh: format!("{:.2}", m.energy_kwh),
                peak_sun_hours: format!("{:.1}", m.peak_sun_hours),
                efficiency: format!("{:.1}%", m.efficiency_percent),
            })
            .collect();

        let statistics = report
            .statistics
            .iter()
            .filter(|(_, stats)| !stats.is_empty())
            .map(|(month, stats)| StatsTable {
                month: month_name(month).to_string(),
                rows: stats
                    .iter()
                    .map(|(metric, s)| {
                        [
                            metric.label().to_string(),
                            format!("{:.2}", s.min),
                            format!("{:.2}", s.max),
                            format!("{:.2}", s.avg),
                            format!("{:.2}", s.median),
                        ]
                    })
                    .collect(),
            })
            .collect();

        Self {
            generated_at: report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            location,
            panel: panel_rows,
            summary,
            financial,
            monthly,
            statistics,
            household_label: household_label(report.household_equivalent),
        }
    }
}
