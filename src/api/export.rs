use axum::{
    extract::rejection::JsonRejection,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    Json,
};

use super::error::ApiError;
use crate::analysis::SimulationReport;
use crate::report::{export::CSV_FILE_NAME, export::ZIP_FILE_NAME, export_combined_csv, export_zip};

fn attachment(name: &str) -> String {
    format!("attachment; filename=\"{name}\"")
}

/// POST /api/export - ZIP bundle of per-section CSV files.
pub async fn zip_bundle(body: Result<Json<SimulationReport>, JsonRejection>) -> Result<impl IntoResponse, ApiError> {
    let Json(report) = body?;
    let bytes = export_zip(&report)?;
    Ok((
        [(CONTENT_TYPE, "application/zip".to_string()), (CONTENT_DISPOSITION, attachment(ZIP_FILE_NAME))],
        bytes,
    ))
}

/// POST /api/export/csv - every section in one CSV document.
pub async fn combined_csv(body: Result<Json<SimulationReport>, JsonRejection>) -> Result<impl IntoResponse, ApiError> {
    let Json(report) = body?;
    let csv = export_combined_csv(&report)?;
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, attachment(CSV_FILE_NAME)),
        ],
        csv,
    ))
}
