use serde::{Deserialize, Serialize};

/// Outcome of a guarded division.
///
/// `Unbounded` and `NegativeUnbounded` are a positive or negative quantity
/// over zero (e.g. a payback period that never completes), `Undefined` is
/// zero over zero or any non-finite input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Derived {
    Finite(f64),
    Unbounded,
    NegativeUnbounded,
    Undefined,
}

impl Derived {
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if !numerator.is_finite() || !denominator.is_finite() {
            return Derived::Undefined;
        }
        if denominator == 0.0 {
            return if numerator > 0.0 {
                Derived::Unbounded
            } else if numerator < 0.0 {
                Derived::NegativeUnbounded
            } else {
                Derived::Undefined
            };
        }
        Derived::Finite(numerator / denominator)
    }

    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            Derived::Finite(value)
        } else {
            Derived::Undefined
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Derived::Finite(v) => Some(*v),
            _ => None,
        }
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Derived::Finite(v) => Derived::from_value(f(v)),
            other => other,
        }
    }

    /// Renders the value with a fixed number of decimals, or `∞` / `-∞` / `N/A`.
    pub fn display_fixed(&self, decimals: usize) -> String {
        match self {
            Derived::Finite(v) => format!("{v:.decimals$}"),
            Derived::Unbounded => "∞".to_string(),
            Derived::NegativeUnbounded => "-∞".to_string(),
            Derived::Undefined => "N/A".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_kinds() {
        assert_eq!(Derived::ratio(10.0, 4.0), Derived::Finite(2.5));
        assert_eq!(Derived::ratio(1.0, 0.0), Derived::Unbounded);
        assert_eq!(Derived::ratio(-1.0, 0.0), Derived::NegativeUnbounded);
        assert_eq!(Derived::ratio(0.0, 0.0), Derived::Undefined);
        assert_eq!(Derived::ratio(f64::NAN, 1.0), Derived::Undefined);
    }

    #[test]
    fn map_only_touches_finite() {
        assert_eq!(Derived::Finite(0.5).map(|v| v * 100.0), Derived::Finite(50.0));
        assert_eq!(Derived::Unbounded.map(|v| v * 100.0), Derived::Unbounded);
    }

    #[test]
    fn display() {
        assert_eq!(Derived::Finite(10.04).display_fixed(1), "10.0");
        assert_eq!(Derived::Unbounded.display_fixed(1), "∞");
        assert_eq!(Derived::NegativeUnbounded.display_fixed(1), "-∞");
        assert_eq!(Derived::Undefined.display_fixed(1), "N/A");
    }

    #[test]
    fn serializes_tagged() {
        let json = serde_json::to_value(Derived::Finite(1.5)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "finite", "value": 1.5}));
        let json = serde_json::to_value(Derived::NegativeUnbounded).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "negative_unbounded"}));
        let json = serde_json::to_value(Derived::Undefined).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "undefined"}));
    }
}
