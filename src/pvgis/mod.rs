//! Client for the PVGIS irradiation API.

mod error;
mod models;
mod options;

pub use error::UpstreamError;
pub use models::{parse_monthly, RawMonthlySample};
pub use options::{DailyOptions, HourlyOptions, MonthlyOptions};

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::PvgisConfig;
use crate::domain::Coordinate;
use options::Query;

/// Source of raw irradiation payloads. Payloads are returned as received so
/// the radiation proxy can pass them through untouched.
#[async_trait]
pub trait RadiationSource: Send + Sync {
    async fn monthly_radiation(&self, at: Coordinate, opts: &MonthlyOptions) -> Result<Value, UpstreamError>;

    /// `month` is 1-12, or 0 for every month.
    async fn daily_radiation(&self, at: Coordinate, month: u8, opts: &DailyOptions) -> Result<Value, UpstreamError>;

    async fn hourly_radiation(&self, at: Coordinate, opts: &HourlyOptions) -> Result<Value, UpstreamError>;
}

#[derive(Clone)]
pub struct PvgisClient {
    base_url: String,
    client: reqwest::Client,
}

impl PvgisClient {
    pub fn new(cfg: &PvgisConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("solar-potential/", env!("CARGO_PKG_VERSION"))),
        );
        let client = reqwest::Client::builder()
            .timeout(cfg.http_timeout())
            .default_headers(headers)
            .build()?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch(&self, endpoint: &str, at: Coordinate, mut query: Query) -> Result<Value, UpstreamError> {
        query.insert(0, ("lat", at.latitude.to_string()));
        query.insert(1, ("lon", at.longitude.to_string()));
        query.push(("outputformat", "json".to_string()));

        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, ?query, "requesting PVGIS");

        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(UpstreamError::transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(UpstreamError::transport)?;

        if !status.is_success() {
            warn!(%status, endpoint, "PVGIS returned an error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body: serde_json::from_str(&body).unwrap_or(Value::String(body)),
            });
        }

        serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RadiationSource for PvgisClient {
    async fn monthly_radiation(&self, at: Coordinate, opts: &MonthlyOptions) -> Result<Value, UpstreamError> {
        self.fetch("MRcalc", at, opts.query()).await
    }

    async fn daily_radiation(&self, at: Coordinate, month: u8, opts: &DailyOptions) -> Result<Value, UpstreamError> {
        let query = opts.query(month)?;
        self.fetch("DRcalc", at, query).await
    }

    async fn hourly_radiation(&self, at: Coordinate, opts: &HourlyOptions) -> Result<Value, UpstreamError> {
        let query = opts.query()?;
        self.fetch("seriescalc", at, query).await
    }
}
