pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod pvgis;
pub mod reference;
pub mod report;
pub mod state;
pub mod telemetry;
