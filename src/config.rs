use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use crate::analysis::impact::FinancialAssumptions;
use crate::pvgis::MonthlyOptions;
use crate::telemetry::TelemetryConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub pvgis: PvgisConfig,
    pub cache: CacheConfig,
    pub financial: FinancialAssumptions,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_secs: 60,
            enable_cors: true,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PvgisConfig {
    pub base_url: String,
    pub http_timeout_seconds: u64,
    /// Inclination used for the selected-angle irradiation series.
    pub selected_angle_deg: f64,
}

impl Default for PvgisConfig {
    fn default() -> Self {
        Self {
            base_url: "https://re.jrc.ec.europa.eu/api/v5_3".to_string(),
            http_timeout_seconds: 30,
            selected_angle_deg: 30.0,
        }
    }
}

impl PvgisConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds.max(1))
    }

    /// Options the radiation proxy forwards upstream: every monthly series on.
    pub fn monthly_options(&self) -> MonthlyOptions {
        MonthlyOptions::all_series(self.selected_angle_deg)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 300 }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
            .merge(Env::prefixed("SOLAR__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_config() {
        let cfg = Config::default();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.cache.ttl(), Duration::from_secs(300));
        assert_eq!(cfg.pvgis.selected_angle_deg, 30.0);
        assert_eq!(cfg.financial.system_lifetime_years, 25);
    }

    #[test]
    fn socket_addr_parses() {
        let server = ServerConfig { host: "0.0.0.0".into(), port: 9000, ..Default::default() };
        assert_eq!(server.socket_addr().unwrap().port(), 9000);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: Config = Figment::new()
            .merge(Toml::string("[cache]\nttl_seconds = 60\n"))
            .extract()
            .unwrap();
        assert_eq!(cfg.cache.ttl_seconds, 60);
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.financial.cost_per_watt, 2.5);
    }
}
