use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;
use tracing::info;
use validator::Validate;

use super::error::ApiError;
use crate::domain::CoordinateInput;
use crate::state::AppState;

/// POST /api/radiation - monthly irradiation for a point, passed through
/// from PVGIS unchanged.
pub async fn monthly_radiation(
    State(state): State<AppState>,
    body: Result<Json<CoordinateInput>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(input) = body?;
    input.validate()?;
    let at = input.coordinate()?;

    info!(%at, "fetching monthly radiation");
    let payload = state
        .radiation
        .monthly_radiation(at, &state.cfg.pvgis.monthly_options())
        .await?;
    Ok(Json(payload))
}
