use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::UpstreamError;
use crate::domain::coordinate::lenient_f64;

/// One monthly observation as PVGIS reports it. Every series is optional;
/// which ones are present depends on the request flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMonthlySample {
    #[serde(default)]
    pub year: Option<i32>,
    /// Calendar month, 1-12. Out-of-range values are tolerated here and
    /// dropped during aggregation.
    #[serde(default)]
    pub month: i32,
    #[serde(rename = "H(h)_m", default, deserialize_with = "lenient_f64")]
    pub horizontal: Option<f64>,
    #[serde(rename = "H(i_opt)_m", default, deserialize_with = "lenient_f64")]
    pub optimal_angle: Option<f64>,
    #[serde(rename = "H(i)_m", default, deserialize_with = "lenient_f64")]
    pub selected_angle: Option<f64>,
    #[serde(rename = "Hb(n)_m", alias = "H_d", default, deserialize_with = "lenient_f64")]
    pub direct_normal: Option<f64>,
    #[serde(rename = "Kd", default, deserialize_with = "lenient_f64")]
    pub diffuse_ratio: Option<f64>,
    #[serde(rename = "T2m", default, deserialize_with = "lenient_f64")]
    pub temperature: Option<f64>,
}

/// Extracts `outputs.monthly` from an `MRcalc` payload.
pub fn parse_monthly(payload: &Value) -> Result<Vec<RawMonthlySample>, UpstreamError> {
    let monthly = payload
        .pointer("/outputs/monthly")
        .ok_or_else(|| UpstreamError::Decode("missing outputs.monthly".to_string()))?;
    if !monthly.is_array() {
        return Err(UpstreamError::Decode("outputs.monthly is not a list".to_string()));
    }
    Vec::<RawMonthlySample>::deserialize(monthly).map_err(|e| UpstreamError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_wire_names() {
        let payload = json!({
            "inputs": {},
            "outputs": {"monthly": [
                {"year": 2020, "month": 1, "H(h)_m": 32.1, "H(i_opt)_m": 55.4, "H(i)_m": 50.0,
                 "Hb(n)_m": 40.2, "Kd": 0.55, "T2m": 1.3},
                {"year": 2020, "month": 2, "H(h)_m": 0.0, "H_d": 12.5}
            ]}
        });
        let samples = parse_monthly(&payload).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].selected_angle, Some(50.0));
        assert_eq!(samples[0].temperature, Some(1.3));
        assert_eq!(samples[1].horizontal, Some(0.0));
        assert_eq!(samples[1].direct_normal, Some(12.5));
        assert_eq!(samples[1].temperature, None);
    }

    #[test]
    fn missing_monthly_is_a_decode_error() {
        let err = parse_monthly(&json!({"outputs": {}})).unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
        let err = parse_monthly(&json!({"outputs": {"monthly": {}}})).unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }
}
