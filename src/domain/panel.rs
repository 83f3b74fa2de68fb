//! Panel configuration and the capacity planner that fits panels into a
//! drawn site.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use validator::Validate;

/// Gap kept around each panel when laying out a site, in metres.
pub const PANEL_SPACING_M: f64 = 0.5;
/// Standard test condition irradiance, W/m².
pub const STC_IRRADIANCE_W_M2: f64 = 1000.0;

fn default_efficiency() -> f64 {
    20.0
}

fn default_losses() -> f64 {
    14.0
}

fn default_tilt() -> f64 {
    30.0
}

fn default_azimuth() -> f64 {
    180.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PanelConfiguration {
    #[validate(range(exclusive_min = 0.0, message = "Panel area must be greater than 0"))]
    pub panel_area_m2: f64,
    /// Requested panel count. `None` means "as many as fit".
    #[serde(default)]
    pub panel_count: Option<u32>,
    #[serde(default = "default_efficiency")]
    #[validate(range(
        exclusive_min = 0.0,
        max = 100.0,
        message = "Panel efficiency must be greater than 0 and at most 100 percent"
    ))]
    pub efficiency_percent: f64,
    #[serde(default = "default_losses")]
    #[validate(range(
        min = 0.0,
        exclusive_max = 100.0,
        message = "System losses must be at least 0 and below 100 percent"
    ))]
    pub system_losses_percent: f64,
    #[serde(default = "default_tilt")]
    pub tilt_angle_deg: f64,
    #[serde(default = "default_azimuth")]
    pub azimuth_angle_deg: f64,
}

impl PanelConfiguration {
    pub fn new(panel_area_m2: f64) -> Self {
        Self {
            panel_area_m2,
            panel_count: None,
            efficiency_percent: default_efficiency(),
            system_losses_percent: default_losses(),
            tilt_angle_deg: default_tilt(),
            azimuth_angle_deg: default_azimuth(),
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.panel_count = Some(count);
        self
    }

    /// Base efficiency as a fraction.
    pub fn efficiency(&self) -> f64 {
        self.efficiency_percent / 100.0
    }

    /// System losses as a fraction.
    pub fn losses(&self) -> f64 {
        self.system_losses_percent / 100.0
    }

    pub fn total_area_m2(&self, panel_count: u32) -> f64 {
        f64::from(panel_count) * self.panel_area_m2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AreaUnit {
    #[default]
    M2,
    Km2,
    Ha,
}

impl AreaUnit {
    fn square_metres(self) -> f64 {
        match self {
            AreaUnit::M2 => 1.0,
            AreaUnit::Km2 => 1_000_000.0,
            AreaUnit::Ha => 10_000.0,
        }
    }

    pub fn to_square_metres(self, area: f64) -> f64 {
        area * self.square_metres()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CapacityError {
    #[error("Please draw an area on the map first to calculate solar potential.")]
    NoSiteArea,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityPlan {
    pub site_area_m2: f64,
    pub footprint_per_panel_m2: f64,
    pub max_panels: u32,
    pub panel_count: u32,
    /// True when the requested count exceeded what fits and was reduced.
    pub clamped: bool,
    pub total_panel_area_m2: f64,
    pub nameplate_peak_w: f64,
}

/// Lays out square panels with a fixed gap and reports how many fit.
pub fn plan_capacity(site_area_m2: f64, panel: &PanelConfiguration) -> Result<CapacityPlan, CapacityError> {
    if !site_area_m2.is_finite() || site_area_m2 <= 0.0 {
        return Err(CapacityError::NoSiteArea);
    }

    let footprint = (panel.panel_area_m2.sqrt() + PANEL_SPACING_M).powi(2);
    // float-to-int casts saturate
    let max_panels = (site_area_m2 / footprint).floor() as u32;
    let requested = panel.panel_count.unwrap_or(max_panels);
    let panel_count = requested.min(max_panels);
    if requested > max_panels {
        tracing::debug!(requested, max_panels, "panel count clamped to site capacity");
    }

    let total_panel_area_m2 = panel.total_area_m2(panel_count);
    let nameplate_peak_w = total_panel_area_m2 * STC_IRRADIANCE_W_M2 * panel.efficiency() * (1.0 - panel.losses());

    Ok(CapacityPlan {
        site_area_m2,
        footprint_per_panel_m2: footprint,
        max_panels,
        panel_count,
        clamped: requested > max_panels,
        total_panel_area_m2,
        nameplate_peak_w,
    })
}
