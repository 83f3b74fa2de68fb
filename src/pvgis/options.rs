//! Query options for the three PVGIS endpoints. Boolean flags go on the
//! wire as `0`/`1`.

use serde::{Deserialize, Serialize};

use super::UpstreamError;

pub(crate) type Query = Vec<(&'static str, String)>;

fn flag(on: bool) -> String {
    if on { "1" } else { "0" }.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyOptions {
    /// Horizontal plane irradiation.
    pub horirrad: bool,
    /// Irradiation on the annual optimal angle.
    pub optrad: bool,
    /// Irradiation on the plane of `angle`.
    pub selectrad: bool,
    pub angle: f64,
    /// Direct normal irradiation.
    pub mr_dni: bool,
    /// Diffuse to global ratio.
    pub d2g: bool,
    /// Average daily temperature.
    pub avtemp: bool,
}

impl Default for MonthlyOptions {
    fn default() -> Self {
        Self {
            horirrad: true,
            optrad: false,
            selectrad: false,
            angle: 0.0,
            mr_dni: false,
            d2g: false,
            avtemp: false,
        }
    }
}

impl MonthlyOptions {
    /// Every series switched on, selected plane at `angle` degrees.
    pub fn all_series(angle: f64) -> Self {
        Self {
            horirrad: true,
            optrad: true,
            selectrad: true,
            angle,
            mr_dni: true,
            d2g: true,
            avtemp: true,
        }
    }

    pub(crate) fn query(&self) -> Query {
        vec![
            ("horirrad", flag(self.horirrad)),
            ("optrad", flag(self.optrad)),
            ("selectrad", flag(self.selectrad)),
            ("angle", self.angle.to_string()),
            ("mr_dni", flag(self.mr_dni)),
            ("d2g", flag(self.d2g)),
            ("avtemp", flag(self.avtemp)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyOptions {
    /// Global, direct and diffuse in-plane irradiances.
    pub global: bool,
    pub glob_2axis: bool,
    pub clearsky: bool,
    pub clearsky_2axis: bool,
    pub showtemperatures: bool,
}

impl Default for DailyOptions {
    fn default() -> Self {
        Self {
            global: true,
            glob_2axis: false,
            clearsky: false,
            clearsky_2axis: false,
            showtemperatures: false,
        }
    }
}

impl DailyOptions {
    pub(crate) fn query(&self, month: u8) -> Result<Query, UpstreamError> {
        // 0 asks for every month
        if month > 12 {
            return Err(UpstreamError::InvalidOptions(format!("month {month} is outside 0..=12")));
        }
        Ok(vec![
            ("month", month.to_string()),
            ("global", flag(self.global)),
            ("glob_2axis", flag(self.glob_2axis)),
            ("clearsky", flag(self.clearsky)),
            ("clearsky_2axis", flag(self.clearsky_2axis)),
            ("showtemperatures", flag(self.showtemperatures)),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyOptions {
    /// Include a PV production estimate.
    pub pvcalculation: bool,
    /// Nominal PV power in kW.
    pub peakpower: Option<f64>,
    /// System losses in percent.
    pub loss: Option<f64>,
}

impl HourlyOptions {
    pub fn with_pv(peakpower_kw: f64, loss_percent: f64) -> Self {
        Self { pvcalculation: true, peakpower: Some(peakpower_kw), loss: Some(loss_percent) }
    }

    pub(crate) fn query(&self) -> Result<Query, UpstreamError> {
        let mut query = vec![("pvcalculation", flag(self.pvcalculation))];
        if self.pvcalculation {
            let (Some(peakpower), Some(loss)) = (self.peakpower, self.loss) else {
                return Err(UpstreamError::InvalidOptions(
                    "pvcalculation requires both peakpower and loss".to_string(),
                ));
            };
            query.push(("peakpower", peakpower.to_string()));
            query.push(("loss", loss.to_string()));
        }
        Ok(query)
    }
}
