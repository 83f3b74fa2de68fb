//! End-to-end simulation run: validate, fetch in parallel, evaluate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::impact::{
    analyze_cost, environmental_impact, financial_impact, household_equivalent, CostAnalysis, CostAnalysisInput,
    EnvironmentalImpact, FinancialAssumptions, FinancialImpact,
};
use super::simulation::{simulate, MonthlySimulationResult};
use super::stats::{aggregate, MonthlyAggregate};
use crate::domain::{
    plan_capacity, AreaUnit, CapacityError, CapacityPlan, Coordinate, CoordinateError, CoordinateInput, Derived,
    PanelConfiguration, Region,
};
use crate::pvgis::{parse_monthly, MonthlyOptions, RadiationSource, RawMonthlySample, UpstreamError};
use crate::reference::ReferenceService;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
    /// Raised before any network call.
    #[error(transparent)]
    UserInput(#[from] CapacityError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    #[serde(flatten)]
    pub location: CoordinateInput,
    /// Drawn site area in `area_unit`. Missing or zero means nothing was drawn.
    #[serde(default)]
    pub site_area: Option<f64>,
    #[serde(default)]
    pub area_unit: AreaUnit,
    pub panel: PanelConfiguration,
    #[serde(default)]
    pub net_metering: bool,
    #[serde(default)]
    pub target_households: Option<u32>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Cost per watt cannot be negative"))]
    pub cost_per_watt: Option<f64>,
}

impl SimulationRequest {
    /// Validates the location, the nested panel and the request's own fields
    /// in one pass so every problem is reported together.
    fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(location) = self.location.validate() {
            errors.errors_mut().extend(location.into_errors());
        }
        if let Err(panel) = self.panel.validate() {
            errors.errors_mut().insert("panel".into(), ValidationErrorsKind::Struct(Box::new(panel)));
        }
        if let Err(own) = self.validate() {
            errors.errors_mut().extend(own.into_errors());
        }
        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualSummary {
    #[serde(rename = "annualEnergyKWh")]
    pub annual_energy_kwh: f64,
    pub peak_power_w: f64,
    pub efficiency_factor_percent: Derived,
    pub carbon_offset_kg: f64,
}

/// Everything one run produced. Also the input of the export operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub generated_at: DateTime<Utc>,
    pub location: Coordinate,
    pub site_area: f64,
    pub area_unit: AreaUnit,
    pub region: Region,
    pub carbon_intensity: f64,
    pub energy_price: f64,
    pub panel: PanelConfiguration,
    pub capacity: CapacityPlan,
    pub net_metering: bool,
    pub summary: AnnualSummary,
    pub monthly: Vec<MonthlySimulationResult>,
    pub statistics: MonthlyAggregate,
    pub environmental: EnvironmentalImpact,
    pub financial: FinancialImpact,
    pub cost_analysis: CostAnalysis,
    pub household_equivalent: f64,
    pub lifetime_years: u32,
}

/// Inputs of the pure evaluation step, after every lookup has resolved.
#[derive(Debug, Clone)]
pub struct Evaluation<'a> {
    pub location: Coordinate,
    pub site_area: f64,
    pub area_unit: AreaUnit,
    pub region: Region,
    pub carbon_intensity: f64,
    pub energy_price: f64,
    pub panel: &'a PanelConfiguration,
    pub capacity: CapacityPlan,
    pub samples: &'a [RawMonthlySample],
    pub net_metering: bool,
    pub target_households: Option<u32>,
    pub cost_per_watt: Option<f64>,
}

pub fn evaluate(input: Evaluation<'_>, assumptions: &FinancialAssumptions) -> SimulationReport {
    let statistics = aggregate(input.samples);
    let count = input.capacity.panel_count;
    let profile = simulate(&statistics, input.panel, count);
    let annual = profile.annual_energy_kwh;

    let environmental = environmental_impact(annual, input.carbon_intensity);
    let financial = financial_impact(annual, input.energy_price, assumptions.system_lifetime_years);
    let cost_analysis = analyze_cost(
        &CostAnalysisInput {
            annual_energy_kwh: annual,
            energy_price: input.energy_price,
            panel_count: count,
            panel_area_m2: input.panel.panel_area_m2,
            efficiency_percent: input.panel.efficiency_percent,
            cost_per_watt: input.cost_per_watt,
            target_households: input.target_households.unwrap_or(1),
            net_metering: input.net_metering,
        },
        assumptions,
    );

    let mut panel = input.panel.clone();
    panel.panel_count = Some(count);

    SimulationReport {
        generated_at: Utc::now(),
        location: input.location,
        site_area: input.site_area,
        area_unit: input.area_unit,
        region: input.region,
        carbon_intensity: input.carbon_intensity,
        energy_price: input.energy_price,
        panel,
        capacity: input.capacity,
        net_metering: cost_analysis.net_metering_applied,
        summary: AnnualSummary {
            annual_energy_kwh: annual,
            peak_power_w: profile.peak_power_w,
            efficiency_factor_percent: profile.efficiency_factor_percent,
            carbon_offset_kg: environmental.carbon_offset_kg,
        },
        monthly: profile.monthly,
        statistics,
        environmental,
        financial,
        household_equivalent: household_equivalent(annual, assumptions.household_consumption_kwh),
        lifetime_years: assumptions.system_lifetime_years,
        cost_analysis,
    }
}

#[derive(Clone)]
pub struct SimulationPipeline {
    radiation: Arc<dyn RadiationSource>,
    reference: Arc<ReferenceService>,
    assumptions: FinancialAssumptions,
}

impl SimulationPipeline {
    pub fn new(
        radiation: Arc<dyn RadiationSource>,
        reference: Arc<ReferenceService>,
        assumptions: FinancialAssumptions,
    ) -> Self {
        Self { radiation, reference, assumptions }
    }

    #[instrument(skip_all, fields(lat = ?req.location.latitude, lon = ?req.location.longitude))]
    pub async fn run(&self, req: &SimulationRequest) -> Result<SimulationReport, SimulationError> {
        req.validate_all()?;
        let at = req.location.coordinate()?;

        let site_area = req.site_area.unwrap_or(0.0);
        let capacity = plan_capacity(req.area_unit.to_square_metres(site_area), &req.panel)?;
        let region = self.reference.region_for(at);
        let opts = MonthlyOptions::all_series(req.panel.tilt_angle_deg);

        // First failure wins; the remaining branches are dropped.
        let (payload, carbon_intensity, energy_price) = tokio::try_join!(
            async { self.radiation.monthly_radiation(at, &opts).await.map_err(SimulationError::from) },
            async { Ok::<_, SimulationError>(self.reference.carbon_intensity(at)) },
            async { Ok::<_, SimulationError>(self.reference.energy_price(region)) }
        )?;
        let samples = parse_monthly(&payload)?;

        let report = evaluate(
            Evaluation {
                location: at,
                site_area,
                area_unit: req.area_unit,
                region,
                carbon_intensity,
                energy_price,
                panel: &req.panel,
                capacity,
                samples: &samples,
                net_metering: req.net_metering,
                target_households: req.target_households,
                cost_per_watt: req.cost_per_watt,
            },
            &self.assumptions,
        );
        info!(
            %region,
            panels = report.capacity.panel_count,
            annual_kwh = report.summary.annual_energy_kwh,
            "simulation complete"
        );
        Ok(report)
    }
}
