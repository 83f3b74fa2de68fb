use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::analysis::SimulationError;
use crate::domain::{CapacityError, CoordinateError};
use crate::pvgis::UpstreamError;
use crate::report::ExportError;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// API error types that can be returned from handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    UserInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::UserInput(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "ValidationError",
            ApiError::UserInput(_) => "UserInputError",
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::Upstream(_) => "UpstreamError",
            ApiError::Internal(_) => "InternalServerError",
        }
    }

    fn body(&self) -> Value {
        match self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::Upstream(err) => {
                tracing::error!(error = %err, "radiation upstream failed");
                json!({ "error": err.summary(), "details": err.details() })
            }
            ApiError::Internal(_) => {
                tracing::error!(error = %self, "API error occurred");
                json!({ "error": self.error_type(), "message": "An internal error occurred" })
            }
            _ => {
                tracing::debug!(error = %self, "Client error");
                json!({ "error": self.error_type(), "message": self.to_string() })
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

fn flatten(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() { field.to_string() } else { format!("{prefix}.{field}") };
        match kind {
            ValidationErrorsKind::Field(list) => out.extend(list.iter().map(|e| FieldError {
                field: path.clone(),
                message: e.message.as_deref().map_or_else(|| e.code.to_string(), str::to_string),
            })),
            ValidationErrorsKind::Struct(nested) => flatten(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Vec::new();
        flatten("", &errors, &mut out);
        out.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::Validation(out)
    }
}

impl From<CoordinateError> for ApiError {
    fn from(error: CoordinateError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl From<CapacityError> for ApiError {
    fn from(error: CapacityError) -> Self {
        ApiError::UserInput(error.to_string())
    }
}

impl From<SimulationError> for ApiError {
    fn from(error: SimulationError) -> Self {
        match error {
            SimulationError::Validation(errors) => errors.into(),
            SimulationError::Coordinate(e) => e.into(),
            SimulationError::UserInput(e) => e.into(),
            SimulationError::Upstream(e) => e.into(),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(error: ExportError) -> Self {
        ApiError::Internal(error.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CoordinateInput;
    use validator::Validate;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::Validation(vec![]).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UserInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Upstream(UpstreamError::Transport("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_list_every_field() {
        let input = CoordinateInput::new(91.0, -200.0);
        let err = ApiError::from(input.validate().unwrap_err());
        assert_eq!(
            err.body(),
            json!({"errors": [
                {"field": "latitude", "message": "Latitude must be between -90 and 90 degrees"},
                {"field": "longitude", "message": "Longitude must be between -180 and 180 degrees"},
            ]})
        );
    }

    #[test]
    fn upstream_body_carries_details() {
        let err = ApiError::from(UpstreamError::Status {
            status: 400,
            reason: "Bad Request".into(),
            body: json!({"message": "Location over the sea"}),
        });
        let body = err.body();
        assert_eq!(body["details"], json!({"message": "Location over the sea"}));
        assert!(body["error"].as_str().unwrap().starts_with("PVGIS API Error: 400"));
    }

    #[test]
    fn user_input_keeps_its_message() {
        let err = ApiError::from(SimulationError::UserInput(CapacityError::NoSiteArea));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.body(),
            json!({
                "error": "UserInputError",
                "message": "Please draw an area on the map first to calculate solar potential."
            })
        );
    }
}
