use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;
use validator::Validate;

pub const LATITUDE_RANGE_MSG: &str = "Latitude must be between -90 and 90 degrees";
pub const LONGITUDE_RANGE_MSG: &str = "Longitude must be between -180 and 180 degrees";

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// A validated WGS84 point. Immutable once a simulation run has started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Key under which per-coordinate lookups are cached.
    pub fn cache_key(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Coordinate fields as submitted by a client, before range checks. Query
/// strings may use the short `lat`/`lon` names.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CoordinateInput {
    #[serde(default, alias = "lat", deserialize_with = "lenient_f64")]
    #[validate(
        required(message = "Latitude must be between -90 and 90 degrees"),
        range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90 degrees")
    )]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lon", deserialize_with = "lenient_f64")]
    #[validate(
        required(message = "Longitude must be between -180 and 180 degrees"),
        range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180 degrees")
    )]
    pub longitude: Option<f64>,
}

impl CoordinateInput {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude: Some(latitude), longitude: Some(longitude) }
    }

    pub fn coordinate(&self) -> Result<Coordinate, CoordinateError> {
        let latitude = self.latitude.ok_or(CoordinateError::Latitude(f64::NAN))?;
        let longitude = self.longitude.ok_or(CoordinateError::Longitude(f64::NAN))?;
        Coordinate::new(latitude, longitude)
    }
}

/// Accepts a JSON number or a numeric string; anything else (or a
/// non-finite value) becomes `None` so range validation reports it.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    let value = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(Raw::Other(_)) | None => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}
