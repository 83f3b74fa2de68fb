use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use super::error::ApiError;
use crate::analysis::{analyze_cost, CostAnalysis, CostAnalysisInput, SimulationReport, SimulationRequest};
use crate::domain::{plan_capacity, AreaUnit, CapacityPlan, PanelConfiguration};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityRequest {
    #[serde(default)]
    pub site_area: Option<f64>,
    #[serde(default)]
    pub area_unit: AreaUnit,
    pub panel: PanelConfiguration,
}

/// POST /api/capacity - how many panels fit on the drawn area.
pub async fn capacity(body: Result<Json<CapacityRequest>, JsonRejection>) -> Result<Json<CapacityPlan>, ApiError> {
    let Json(req) = body?;
    req.panel.validate()?;
    let site_m2 = req.area_unit.to_square_metres(req.site_area.unwrap_or(0.0));
    Ok(Json(plan_capacity(site_m2, &req.panel)?))
}

/// POST /api/simulate - full run: radiation, energy model, impact and costs.
pub async fn simulate(
    State(state): State<AppState>,
    body: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<Json<SimulationReport>, ApiError> {
    let Json(req) = body?;
    Ok(Json(state.pipeline.run(&req).await?))
}

/// POST /api/cost-analysis - re-run the cost model on changed inputs.
pub async fn cost_analysis(
    State(state): State<AppState>,
    body: Result<Json<CostAnalysisInput>, JsonRejection>,
) -> Result<Json<CostAnalysis>, ApiError> {
    let Json(input) = body?;
    input.validate()?;
    Ok(Json(analyze_cost(&input, &state.cfg.financial)))
}
