//! Environmental and financial impact of a simulated system.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{Derived, STC_IRRADIANCE_W_M2};

/// CO2 a mature tree absorbs per year, kg.
pub const TREE_ABSORPTION_KG: f64 = 22.0;
/// CO2 an average car emits per year, kg.
pub const CAR_EMISSIONS_KG: f64 = 4600.0;

const PEAK_MULTIPLIER: f64 = 1.2;
const OFF_PEAK_MULTIPLIER: f64 = 0.8;
const FEED_IN_MULTIPLIER: f64 = 0.7;
/// Share of exported surplus sold at peak rates.
const SURPLUS_PEAK_SHARE: f64 = 0.6;
/// Share of a shortfall bought at peak rates.
const DEFICIT_PEAK_SHARE: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialAssumptions {
    /// Installed cost, USD per watt of system size.
    pub cost_per_watt: f64,
    pub system_lifetime_years: u32,
    /// Annual consumption of one household, kWh.
    pub household_consumption_kwh: f64,
}

impl Default for FinancialAssumptions {
    fn default() -> Self {
        Self { cost_per_watt: 2.5, system_lifetime_years: 25, household_consumption_kwh: 9000.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalImpact {
    pub carbon_offset_kg: f64,
    pub trees_equivalent: f64,
    pub cars_offset: f64,
}

pub fn environmental_impact(annual_kwh: f64, intensity_g_per_kwh: f64) -> EnvironmentalImpact {
    let carbon_offset_kg = annual_kwh * intensity_g_per_kwh / 1000.0;
    EnvironmentalImpact {
        carbon_offset_kg,
        trees_equivalent: carbon_offset_kg / TREE_ABSORPTION_KG,
        cars_offset: carbon_offset_kg / CAR_EMISSIONS_KG,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialImpact {
    pub annual_savings: f64,
    pub monthly_savings: f64,
    pub lifetime_savings: f64,
}

pub fn financial_impact(annual_kwh: f64, price_per_kwh: f64, lifetime_years: u32) -> FinancialImpact {
    let annual_savings = annual_kwh * price_per_kwh;
    FinancialImpact {
        annual_savings,
        monthly_savings: annual_savings / 12.0,
        lifetime_savings: annual_savings * f64::from(lifetime_years),
    }
}

/// Years until `annual_benefit` repays `initial_cost`. A positive cost that
/// is never repaid is unbounded; nothing to repay with nothing earned is
/// undefined.
pub fn payback_years(initial_cost: f64, annual_benefit: f64) -> Derived {
    if !initial_cost.is_finite() || !annual_benefit.is_finite() {
        Derived::Undefined
    } else if annual_benefit > 0.0 {
        Derived::Finite(initial_cost / annual_benefit)
    } else if initial_cost > 0.0 {
        Derived::Unbounded
    } else {
        Derived::Undefined
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentReturn {
    pub payback_period_years: Derived,
    pub roi_percent: Derived,
    pub net_savings: Derived,
}

pub fn investment_return(initial_cost: f64, annual_benefit: f64, lifetime_years: u32) -> InvestmentReturn {
    let lifetime_benefit = annual_benefit * f64::from(lifetime_years);
    let net = lifetime_benefit - initial_cost;
    InvestmentReturn {
        payback_period_years: payback_years(initial_cost, annual_benefit),
        roi_percent: Derived::ratio(net, initial_cost).map(|r| r * 100.0),
        net_savings: Derived::from_value(net),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffRates {
    pub retail: f64,
    pub feed_in: f64,
    pub peak: f64,
    pub off_peak: f64,
}

impl TariffRates {
    pub fn from_retail(retail: f64) -> Self {
        Self {
            retail,
            feed_in: retail * FEED_IN_MULTIPLIER,
            peak: retail * PEAK_MULTIPLIER,
            off_peak: retail * OFF_PEAK_MULTIPLIER,
        }
    }
}

/// Inputs of the cost-versus-reward analysis. Everything it needs is in
/// here, so it can be re-run whenever one of them changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CostAnalysisInput {
    #[serde(rename = "annualEnergyKWh")]
    #[validate(range(min = 0.0, message = "Annual energy cannot be negative"))]
    pub annual_energy_kwh: f64,
    #[validate(range(min = 0.0, message = "Energy price cannot be negative"))]
    pub energy_price: f64,
    pub panel_count: u32,
    #[validate(range(min = 0.0, message = "Panel area cannot be negative"))]
    pub panel_area_m2: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "Panel efficiency must be between 0 and 100 percent"))]
    pub efficiency_percent: f64,
    /// Overrides the configured cost per watt.
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Cost per watt cannot be negative"))]
    pub cost_per_watt: Option<f64>,
    #[serde(default = "one_household")]
    pub target_households: u32,
    #[serde(default)]
    pub net_metering: bool,
}

fn one_household() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostAnalysis {
    pub cost_per_watt: f64,
    pub system_size_w: f64,
    pub initial_cost: f64,
    /// Grid purchases avoided by self-consumption.
    pub annual_savings: f64,
    /// Export revenue under net metering.
    pub annual_revenue: f64,
    /// Cost of buying the shortfall from the grid.
    pub grid_power_cost: f64,
    pub total_annual_benefit: f64,
    pub monthly_savings: f64,
    pub payback_period_years: Derived,
    pub roi_percent: Derived,
    pub net_savings: Derived,
    pub households_powered: u64,
    pub target_households: u32,
    #[serde(rename = "requiredEnergyKWh")]
    pub required_energy_kwh: f64,
    #[serde(rename = "powerBalanceKWh")]
    pub power_balance_kwh: f64,
    pub power_balance_percent: Derived,
    /// False whenever production falls short, even if requested.
    pub net_metering_applied: bool,
    pub rates: TariffRates,
}

/// Number of households an annual production could supply.
pub fn household_equivalent(annual_kwh: f64, household_kwh: f64) -> f64 {
    if household_kwh > 0.0 {
        annual_kwh / household_kwh
    } else {
        0.0
    }
}

pub fn analyze_cost(input: &CostAnalysisInput, assumptions: &FinancialAssumptions) -> CostAnalysis {
    let rates = TariffRates::from_retail(input.energy_price);
    let cost_per_watt = input.cost_per_watt.unwrap_or(assumptions.cost_per_watt);
    let annual = input.annual_energy_kwh;

    let system_size_w =
        f64::from(input.panel_count) * input.panel_area_m2 * STC_IRRADIANCE_W_M2 * input.efficiency_percent / 100.0;
    let initial_cost = system_size_w * cost_per_watt;

    let required = f64::from(input.target_households) * assumptions.household_consumption_kwh;
    let balance = annual - required;

    let (annual_savings, annual_revenue, grid_power_cost, net_metering_applied) = if balance >= 0.0 {
        let revenue = if input.net_metering {
            balance * SURPLUS_PEAK_SHARE * rates.peak + balance * (1.0 - SURPLUS_PEAK_SHARE) * rates.off_peak
        } else {
            0.0
        };
        (required * rates.retail, revenue, 0.0, input.net_metering)
    } else {
        let deficit = balance.abs();
        let grid_cost =
            deficit * DEFICIT_PEAK_SHARE * rates.peak + deficit * (1.0 - DEFICIT_PEAK_SHARE) * rates.off_peak;
        (annual * rates.retail, 0.0, grid_cost, false)
    };

    let total_annual_benefit = annual_savings + annual_revenue - grid_power_cost;
    let returns = investment_return(initial_cost, total_annual_benefit, assumptions.system_lifetime_years);

    CostAnalysis {
        cost_per_watt,
        system_size_w,
        initial_cost,
        annual_savings,
        annual_revenue,
        grid_power_cost,
        total_annual_benefit,
        monthly_savings: total_annual_benefit / 12.0,
        payback_period_years: returns.payback_period_years,
        roi_percent: returns.roi_percent,
        net_savings: returns.net_savings,
        households_powered: household_equivalent(annual, assumptions.household_consumption_kwh).round() as u64,
        target_households: input.target_households,
        required_energy_kwh: required,
        power_balance_kwh: balance,
        power_balance_percent: Derived::ratio(balance, required).map(|r| r * 100.0),
        net_metering_applied,
        rates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn input(annual: f64, households: u32, net_metering: bool) -> CostAnalysisInput {
        CostAnalysisInput {
            annual_energy_kwh: annual,
            energy_price: 0.10,
            panel_count: 10,
            panel_area_m2: 2.0,
            efficiency_percent: 20.0,
            cost_per_watt: None,
            target_households: households,
            net_metering,
        }
    }

    #[test]
    fn payback_and_roi() {
        let r = investment_return(10_000.0, 1_000.0, 25);
        assert_eq!(r.payback_period_years, Derived::Finite(10.0));
        assert_eq!(r.roi_percent.display_fixed(1), "150.0");
        assert_eq!(r.net_savings, Derived::Finite(15_000.0));
    }

    #[rstest]
    #[case(10_000.0, 0.0, Derived::Unbounded)]
    #[case(10_000.0, -50.0, Derived::Unbounded)]
    #[case(0.0, 0.0, Derived::Undefined)]
    #[case(0.0, 100.0, Derived::Finite(0.0))]
    #[case(f64::NAN, 100.0, Derived::Undefined)]
    fn payback_guards(#[case] cost: f64, #[case] benefit: f64, #[case] expected: Derived) {
        assert_eq!(payback_years(cost, benefit), expected);
    }

    #[test]
    fn zero_cost_roi_is_not_a_number() {
        let r = investment_return(0.0, 100.0, 25);
        assert_eq!(r.roi_percent, Derived::Unbounded);
        let r = investment_return(0.0, 0.0, 25);
        assert_eq!(r.roi_percent, Derived::Undefined);
    }

    #[test]
    fn zero_cost_with_a_loss_keeps_the_sign() {
        let r = investment_return(0.0, -100.0, 25);
        assert_eq!(r.roi_percent, Derived::NegativeUnbounded);
        assert_eq!(r.roi_percent.display_fixed(1), "-∞");
    }

    #[test]
    fn site_without_panels_shows_negative_roi() {
        let mut zero_panels = input(0.0, 1, false);
        zero_panels.panel_count = 0;
        let a = analyze_cost(&zero_panels, &FinancialAssumptions::default());
        assert_eq!(a.initial_cost, 0.0);
        // 9000 * (0.4 * 0.12 + 0.6 * 0.08)
        assert!(approx(a.total_annual_benefit, -864.0));
        assert_eq!(a.roi_percent, Derived::NegativeUnbounded);
        assert!(approx(a.net_savings.value().unwrap(), -21_600.0));
        assert_eq!(a.payback_period_years, Derived::Undefined);
    }

    #[test]
    fn environmental_uses_grid_intensity() {
        let e = environmental_impact(10_000.0, 380.0);
        assert!(approx(e.carbon_offset_kg, 3800.0));
        assert!(approx(e.trees_equivalent, 3800.0 / 22.0));
        assert!(approx(e.cars_offset, 3800.0 / 4600.0));
    }

    #[test]
    fn financial_savings() {
        let f = financial_impact(6000.0, 0.2, 25);
        assert!(approx(f.annual_savings, 1200.0));
        assert!(approx(f.monthly_savings, 100.0));
        assert!(approx(f.lifetime_savings, 30_000.0));
    }

    #[test]
    fn surplus_with_net_metering_earns_revenue() {
        let a = analyze_cost(&input(12_000.0, 1, true), &FinancialAssumptions::default());
        // 10 * 2 m² * 1000 * 0.2
        assert!(approx(a.system_size_w, 4000.0));
        assert!(approx(a.initial_cost, 10_000.0));
        assert!(approx(a.annual_savings, 900.0));
        // 3000 * (0.6 * 0.12 + 0.4 * 0.08)
        assert!(approx(a.annual_revenue, 312.0));
        assert_eq!(a.grid_power_cost, 0.0);
        assert!(approx(a.total_annual_benefit, 1212.0));
        assert!(a.net_metering_applied);
        assert_eq!(a.power_balance_percent.display_fixed(1), "33.3");
        assert_eq!(a.households_powered, 1);
    }

    #[test]
    fn surplus_without_net_metering_earns_nothing_extra() {
        let a = analyze_cost(&input(12_000.0, 1, false), &FinancialAssumptions::default());
        assert_eq!(a.annual_revenue, 0.0);
        assert!(!a.net_metering_applied);
    }

    #[test]
    fn deficit_buys_from_grid_and_disables_net_metering() {
        let a = analyze_cost(&input(6_000.0, 1, true), &FinancialAssumptions::default());
        assert!(approx(a.annual_savings, 600.0));
        // 3000 * (0.4 * 0.12 + 0.6 * 0.08)
        assert!(approx(a.grid_power_cost, 288.0));
        assert!(approx(a.total_annual_benefit, 312.0));
        assert!(!a.net_metering_applied);
        assert_eq!(a.power_balance_percent.display_fixed(1), "-33.3");
    }

    #[test]
    fn zero_target_households_is_guarded() {
        let a = analyze_cost(&input(1_000.0, 0, false), &FinancialAssumptions::default());
        assert_eq!(a.power_balance_percent, Derived::Unbounded);
        let a = analyze_cost(&input(0.0, 0, false), &FinancialAssumptions::default());
        assert_eq!(a.power_balance_percent, Derived::Undefined);
    }

    #[test]
    fn cost_per_watt_override() {
        let mut i = input(12_000.0, 1, false);
        i.cost_per_watt = Some(1.0);
        let a = analyze_cost(&i, &FinancialAssumptions::default());
        assert!(approx(a.initial_cost, 4000.0));
        assert_eq!(a.cost_per_watt, 1.0);
    }

    #[test]
    fn rates_derive_from_retail() {
        let r = TariffRates::from_retail(0.10);
        assert!(approx(r.peak, 0.12));
        assert!(approx(r.off_peak, 0.08));
        assert!(approx(r.feed_in, 0.07));
    }

    #[test]
    fn target_households_defaults_to_one() {
        let json = r#"{"annualEnergyKWh": 9000, "energyPrice": 0.1, "panelCount": 1,
                       "panelAreaM2": 1.5, "efficiencyPercent": 20}"#;
        let i: CostAnalysisInput = serde_json::from_str(json).unwrap();
        assert_eq!(i.target_households, 1);
        assert!(!i.net_metering);
        assert!(i.validate().is_ok());
    }
}
