//! Display formatting. Exports read these strings, they never recompute.

use itertools::Itertools;

use crate::domain::Derived;

/// en-US grouping with at most two fraction digits, trailing zeros dropped.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "N/A".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');
    let grouped = int.as_bytes().rchunks(3).rev().map(String::from_utf8_lossy).join(",");

    let negative = value < 0.0 && (int != "0" || !frac.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

pub fn format_currency(value: f64) -> String {
    format!("${}", format_number(value))
}

pub fn format_derived_currency(value: Derived) -> String {
    match value {
        Derived::Finite(v) => format_currency(v),
        other => other.display_fixed(0),
    }
}

pub fn format_kwh(value: f64) -> String {
    format!("{} kWh", format_number(value))
}

/// Watts rendered as kilowatts with two decimals.
pub fn format_peak_kw(watts: f64) -> String {
    format!("{:.2} kW", watts / 1000.0)
}

pub fn format_percent(value: Derived) -> String {
    match value {
        Derived::Finite(v) => format!("{v:.1}%"),
        other => other.display_fixed(1),
    }
}

/// Percentage with an explicit `+` for surplus.
pub fn format_balance(value: Derived) -> String {
    match value {
        Derived::Finite(v) if v >= 0.0 => format!("+{v:.1}%"),
        Derived::Unbounded => "+∞".to_string(),
        other => format_percent(other),
    }
}

pub fn format_years(value: Derived) -> String {
    value.display_fixed(1)
}

pub fn month_name(month: u8) -> &'static str {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES.get(usize::from(month).wrapping_sub(1)).copied().unwrap_or("Unknown")
}

/// "Could power ..." phrase for a household count.
pub fn household_label(households: f64) -> String {
    if households < 1.0 {
        return format!("{households:.1} households");
    }
    let rounded = households.round();
    let count = format_number(rounded);
    if households < 10_000.0 {
        format!("{count} households")
    } else if households < 100_000.0 {
        format!("a small town ({count} households)")
    } else if households < 1_000_000.0 {
        format!("a small city ({count} households)")
    } else {
        format!("a major city ({count} households)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0")]
    #[case(1234.5, "1,234.5")]
    #[case(1234.567, "1,234.57")]
    #[case(1_000_000.0, "1,000,000")]
    #[case(999.999, "1,000")]
    #[case(-15_000.25, "-15,000.25")]
    #[case(-0.001, "0")]
    #[case(0.1, "0.1")]
    fn formats_numbers_en_us(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_number(value), expected);
    }

    #[test]
    fn non_finite_numbers() {
        assert_eq!(format_number(f64::NAN), "N/A");
        assert_eq!(format_number(f64::INFINITY), "∞");
    }

    #[test]
    fn units_and_percentages() {
        assert_eq!(format_kwh(12_345.678), "12,345.68 kWh");
        assert_eq!(format_peak_kw(7568.0), "7.57 kW");
        assert_eq!(format_currency(10_000.0), "$10,000");
        assert_eq!(format_percent(Derived::Finite(87.654)), "87.7%");
        assert_eq!(format_percent(Derived::Undefined), "N/A");
        assert_eq!(format_balance(Derived::Finite(33.333)), "+33.3%");
        assert_eq!(format_balance(Derived::Finite(-33.333)), "-33.3%");
        assert_eq!(format_years(Derived::Unbounded), "∞");
        assert_eq!(format_derived_currency(Derived::Undefined), "N/A");
        assert_eq!(format_percent(Derived::NegativeUnbounded), "-∞");
        assert_eq!(format_balance(Derived::NegativeUnbounded), "-∞");
    }

    #[rstest]
    #[case(0.42, "0.4 households")]
    #[case(3.4, "3 households")]
    #[case(2_500.0, "2,500 households")]
    #[case(12_345.0, "a small town (12,345 households)")]
    #[case(250_000.0, "a small city (250,000 households)")]
    #[case(2_000_000.0, "a major city (2,000,000 households)")]
    fn household_thresholds(#[case] households: f64, #[case] expected: &str) {
        assert_eq!(household_label(households), expected);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "Unknown");
    }
}
