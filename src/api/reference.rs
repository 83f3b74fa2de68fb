use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::error::ApiError;
use crate::domain::{Coordinate, CoordinateInput, Region};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonIntensityResponse {
    pub carbon_intensity: f64,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct RegionResponse {
    pub region: Region,
}

fn coordinate_from(query: Result<Query<CoordinateInput>, QueryRejection>) -> Result<Coordinate, ApiError> {
    let Query(input) = query?;
    input.validate()?;
    Ok(input.coordinate()?)
}

/// GET /api/carbon-intensity?lat&lon
pub async fn carbon_intensity(
    State(state): State<AppState>,
    query: Result<Query<CoordinateInput>, QueryRejection>,
) -> Result<Json<CarbonIntensityResponse>, ApiError> {
    let at = coordinate_from(query)?;
    Ok(Json(CarbonIntensityResponse { carbon_intensity: state.reference.carbon_intensity(at) }))
}

/// GET /api/energy-prices?region - unknown or missing regions get the default price.
pub async fn energy_prices(State(state): State<AppState>, Query(query): Query<PriceQuery>) -> Json<PriceResponse> {
    let region = query.region.as_deref().map_or(Region::Default, Region::from_code);
    Json(PriceResponse { price: state.reference.energy_price(region) })
}

/// GET /api/region?lat&lon
pub async fn region(
    State(state): State<AppState>,
    query: Result<Query<CoordinateInput>, QueryRejection>,
) -> Result<Json<RegionResponse>, ApiError> {
    let at = coordinate_from(query)?;
    Ok(Json(RegionResponse { region: state.reference.region_for(at) }))
}
