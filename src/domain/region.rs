//! Coarse geographic regions and the static reference data keyed by them.
//!
//! Boxes are `[lat_min, lat_max] x [lon_min, lon_max]`, inclusive, and are
//! evaluated in declaration order; the first match wins. European countries
//! are only considered inside the coarse Europe box and take precedence
//! over it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Region {
    CA,
    US,
    MX,
    EU,
    UK,
    DE,
    FR,
    ES,
    IT,
    SE,
    NO,
    DK,
    CN,
    IN,
    JP,
    KR,
    AU,
    NZ,
    BR,
    AR,
    CL,
    ZA,
    EG,
    MA,
    AE,
    SA,
    IL,
    #[serde(rename = "default")]
    #[strum(serialize = "default")]
    Default,
}

struct BoundingBox {
    lat: (f64, f64),
    lon: (f64, f64),
}

impl BoundingBox {
    const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self { lat: (lat_min, lat_max), lon: (lon_min, lon_max) }
    }

    fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat.0 && lat <= self.lat.1 && lon >= self.lon.0 && lon <= self.lon.1
    }
}

const NORTH_AMERICA: &[(Region, BoundingBox)] = &[
    (Region::CA, BoundingBox::new(48.0, 60.0, -140.0, -50.0)),
    (Region::US, BoundingBox::new(24.0, 50.0, -125.0, -65.0)),
    (Region::MX, BoundingBox::new(14.0, 33.0, -118.0, -86.0)),
];

const EUROPE: BoundingBox = BoundingBox::new(35.0, 60.0, -10.0, 40.0);

const EUROPE_COUNTRIES: &[(Region, BoundingBox)] = &[
    (Region::UK, BoundingBox::new(49.0, 60.0, -8.0, 2.0)),
    (Region::DE, BoundingBox::new(47.0, 55.0, 6.0, 15.0)),
    (Region::FR, BoundingBox::new(42.0, 51.0, -5.0, 8.0)),
    (Region::ES, BoundingBox::new(36.0, 44.0, -10.0, 4.0)),
    (Region::IT, BoundingBox::new(36.0, 47.0, 6.0, 18.0)),
    (Region::SE, BoundingBox::new(55.0, 70.0, 11.0, 24.0)),
    (Region::NO, BoundingBox::new(58.0, 71.0, 4.0, 31.0)),
    (Region::DK, BoundingBox::new(54.0, 58.0, 8.0, 15.0)),
];

const REST_OF_WORLD: &[(Region, BoundingBox)] = &[
    // Asia & Oceania
    (Region::CN, BoundingBox::new(18.0, 53.0, 73.0, 135.0)),
    (Region::IN, BoundingBox::new(8.0, 37.0, 68.0, 97.0)),
    (Region::JP, BoundingBox::new(31.0, 46.0, 129.0, 146.0)),
    (Region::KR, BoundingBox::new(33.0, 39.0, 124.0, 132.0)),
    (Region::AU, BoundingBox::new(-43.0, -10.0, 113.0, 154.0)),
    (Region::NZ, BoundingBox::new(-47.0, -34.0, 166.0, 179.0)),
    // South America
    (Region::BR, BoundingBox::new(-33.0, 5.0, -74.0, -34.0)),
    (Region::AR, BoundingBox::new(-55.0, -21.0, -74.0, -53.0)),
    (Region::CL, BoundingBox::new(-56.0, -17.0, -75.0, -66.0)),
    // Africa
    (Region::ZA, BoundingBox::new(-35.0, -22.0, 16.0, 33.0)),
    (Region::EG, BoundingBox::new(22.0, 32.0, 25.0, 35.0)),
    (Region::MA, BoundingBox::new(27.0, 36.0, -13.0, -1.0)),
    // Middle East
    (Region::AE, BoundingBox::new(22.0, 26.0, 51.0, 56.0)),
    (Region::SA, BoundingBox::new(16.0, 32.0, 34.0, 55.0)),
    (Region::IL, BoundingBox::new(29.0, 33.0, 34.0, 36.0)),
];

fn first_match(rules: &[(Region, BoundingBox)], lat: f64, lon: f64) -> Option<Region> {
    rules
        .iter()
        .find(|(_, bbox)| bbox.contains(lat, lon))
        .map(|(region, _)| *region)
}

/// Maps a coordinate to its region. Total: anything unmatched (including
/// NaN) is `Region::Default`.
pub fn resolve_region(lat: f64, lon: f64) -> Region {
    if let Some(region) = first_match(NORTH_AMERICA, lat, lon) {
        return region;
    }
    if EUROPE.contains(lat, lon) {
        return first_match(EUROPE_COUNTRIES, lat, lon).unwrap_or(Region::EU);
    }
    first_match(REST_OF_WORLD, lat, lon).unwrap_or(Region::Default)
}

impl Region {
    /// Parses a region code, falling back to `Default` for unknown codes.
    pub fn from_code(code: &str) -> Self {
        code.trim().parse().unwrap_or(Region::Default)
    }

    /// Grid carbon intensity in g CO2-eq per kWh.
    pub fn carbon_intensity(self) -> f64 {
        match self {
            Region::CA => 30.0,
            Region::US => 380.0,
            Region::MX => 450.0,
            Region::EU => 230.0,
            Region::UK => 225.0,
            Region::DE => 350.0,
            Region::FR => 50.0,
            Region::ES => 180.0,
            Region::IT => 280.0,
            Region::SE => 15.0,
            Region::NO => 20.0,
            Region::DK => 180.0,
            Region::CN => 550.0,
            Region::IN => 650.0,
            Region::JP => 450.0,
            Region::KR => 420.0,
            Region::AU => 450.0,
            Region::NZ => 80.0,
            Region::BR => 100.0,
            Region::AR => 350.0,
            Region::CL => 300.0,
            Region::ZA => 800.0,
            Region::EG => 400.0,
            Region::MA => 600.0,
            Region::AE => 450.0,
            Region::SA => 550.0,
            Region::IL => 500.0,
            Region::Default => 380.0,
        }
    }

    /// Average retail electricity price in USD per kWh.
    pub fn energy_price(self) -> f64 {
        match self {
            Region::CA => 0.12,
            Region::US => 0.14,
            Region::MX => 0.08,
            Region::EU => 0.22,
            Region::UK => 0.25,
            Region::DE => 0.35,
            Region::FR => 0.18,
            Region::ES => 0.20,
            Region::IT => 0.28,
            Region::SE => 0.15,
            Region::NO => 0.12,
            Region::DK => 0.30,
            Region::CN => 0.08,
            Region::IN => 0.07,
            Region::JP => 0.20,
            Region::KR => 0.10,
            Region::AU => 0.18,
            Region::NZ => 0.16,
            Region::BR => 0.10,
            Region::AR => 0.05,
            Region::CL => 0.15,
            Region::ZA => 0.08,
            Region::EG => 0.05,
            Region::MA => 0.12,
            Region::AE => 0.08,
            Region::SA => 0.05,
            Region::IL => 0.15,
            Region::Default => 0.14,
        }
    }
}
