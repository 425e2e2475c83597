//! ============================================================
//!  Residential Solar Sizing Engine
//!
//!  Calculation pipeline (consumption mode):
//!   1. Daily consumption   – monthly kWh / 30
//!   2. Required DC power   – daily kWh / (HSP × performance ratio)
//!   3. Panel count         – whole 550 Wp modules, half-up, min 1
//!   4. Inverter rating     – DC capacity / 1.25 oversizing ratio
//!   5. Generation          – installed kWp × HSP × PR × 30
//!   6. Economics           – regional cost/Wp × installed Wp,
//!                            savings capped by the offset consumption
//!   7. Environmental       – 0.075 kg CO₂ avoided per kWh generated
//!
//!  Budget mode inverts step 2–3: the budget fixes the installed power
//!  and the panel count becomes the nearest whole-module approximation.
//! ============================================================

use crate::config::LocationProfile;
use crate::models::sizing::{CostBreakdown, SizingResult};

// ─── Simulation constants ────────────────────────────────────
/// System-loss factor applied process-wide (performance ratio).
pub const PERFORMANCE_RATIO: f64 = 0.80;
/// Nameplate rating of a single module (Wp).
pub const PANEL_RATED_WP: f64 = 550.0;
/// Footprint of a single module (m²).
pub const PANEL_AREA_M2: f64 = 2.3;
/// Grid emission factor (kg CO₂ per kWh).
pub const CO2_FACTOR_KG_PER_KWH: f64 = 0.075;
/// DC/AC oversizing ratio: inverter rated at 80 % of panel capacity.
pub const INVERTER_OVERSIZING_RATIO: f64 = 1.25;

const BILLING_DAYS_PER_MONTH: f64 = 30.0;
/// One urban tree absorbs roughly this much CO₂ per year.
const CO2_KG_PER_TREE_YEAR: f64 = 150.0;

// Cost-breakdown shares — domain convention, not derived.
const SHARE_PANELS: f64 = 0.40;
const SHARE_INVERTER: f64 = 0.20;
const SHARE_MOUNTING: f64 = 0.15;
const SHARE_LABOR: f64 = 0.25;

// New-construction estimator coefficients (kWh/month per unit).
const KWH_PER_OCCUPANT: f64 = 60.0;
const KWH_PER_SHOWER_HEAD: f64 = 70.0;
const KWH_PER_AIR_CONDITIONER: f64 = 100.0;

/// Display rounding for physical quantities; currency keeps full precision.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Size a system that covers the given monthly consumption at the given
/// location. Inputs are assumed validated (positive, finite) by the caller.
pub fn size_from_consumption(
    consumption_kwh: f64,
    tariff: f64,
    location: &LocationProfile,
) -> SizingResult {
    let daily_consumption_kwh = consumption_kwh / BILLING_DAYS_PER_MONTH;
    let required_kwp = daily_consumption_kwh / (location.peak_sun_hours * PERFORMANCE_RATIO);
    let required_wp = required_kwp * 1000.0;

    // Whole modules only; `f64::round` is half-up for positive values.
    let panel_count = (required_wp / PANEL_RATED_WP).round().max(1.0) as u32;
    let final_wp = f64::from(panel_count) * PANEL_RATED_WP;
    let total_cost = final_wp * location.cost_per_wp;

    build_result(final_wp, panel_count, total_cost, consumption_kwh, tariff, location)
}

/// Size the system a fixed budget buys at the given location. The budget is
/// authoritative: installed power is budget / cost-per-Wp and the reported
/// cost is the budget verbatim; the panel count is the nearest whole-module
/// approximation of that power. Consumption and tariff only feed the
/// savings figure.
pub fn size_from_budget(
    budget: f64,
    consumption_kwh: f64,
    tariff: f64,
    location: &LocationProfile,
) -> SizingResult {
    let final_wp = budget / location.cost_per_wp;
    let panel_count = (final_wp / PANEL_RATED_WP).round().max(1.0) as u32;

    build_result(final_wp, panel_count, budget, consumption_kwh, tariff, location)
}

/// Shared tail of both sizing modes: generation, economics, environment.
fn build_result(
    final_wp: f64,
    panel_count: u32,
    total_cost: f64,
    consumption_kwh: f64,
    tariff: f64,
    location: &LocationProfile,
) -> SizingResult {
    let final_kwp = final_wp / 1000.0;
    let daily_generation_kwh = final_kwp * location.peak_sun_hours * PERFORMANCE_RATIO;
    let monthly_generation_kwh = daily_generation_kwh * BILLING_DAYS_PER_MONTH;

    // Generation beyond the household's own consumption earns no savings.
    let monthly_savings = monthly_generation_kwh.min(consumption_kwh) * tariff;

    let annual_co2_kg = monthly_generation_kwh * 12.0 * CO2_FACTOR_KG_PER_KWH;

    SizingResult {
        system_power_kwp: round2(final_kwp),
        inverter_recommended_kw: round2(final_kwp / INVERTER_OVERSIZING_RATIO),
        panel_count,
        area_m2: round2(f64::from(panel_count) * PANEL_AREA_M2),
        total_cost,
        monthly_savings,
        annual_co2_avoided_kg: round2(annual_co2_kg),
        equivalent_trees: round2(annual_co2_kg / CO2_KG_PER_TREE_YEAR),
        monthly_generation_kwh: round2(monthly_generation_kwh),
        cost_breakdown: CostBreakdown {
            panels: total_cost * SHARE_PANELS,
            inverter: total_cost * SHARE_INVERTER,
            mounting: total_cost * SHARE_MOUNTING,
            labor: total_cost * SHARE_LABOR,
        },
    }
}

/// Monthly consumption heuristic for a dwelling that has no meter history
/// yet. Linear in the load drivers; feeds `size_from_consumption` as if it
/// were a metered value.
pub fn estimate_new_construction(occupants: u32, shower_heads: u32, air_conditioners: u32) -> f64 {
    f64::from(occupants) * KWH_PER_OCCUPANT
        + f64::from(shower_heads) * KWH_PER_SHOWER_HEAD
        + f64::from(air_conditioners) * KWH_PER_AIR_CONDITIONER
}

/// Spread the flat monthly generation over the year using the location's
/// seasonal irradiation shape.
pub fn seasonal_series(monthly_generation_kwh: f64, factors: &[f64; 12]) -> [f64; 12] {
    factors.map(|f| monthly_generation_kwh * f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn test_location() -> LocationProfile {
        LocationProfile {
            name: "Testópolis (TS)".to_string(),
            peak_sun_hours: 4.98,
            cost_per_wp: 2.49,
            seasonal_factors: None,
        }
    }

    #[test]
    fn test_reference_household_300kwh() {
        // 300 kWh/month at 0.85 BRL/kWh, HSP 4.98, 2.49 BRL/Wp:
        // required 2.510 kWp → 5 modules → 2.75 kWp installed
        let r = size_from_consumption(300.0, 0.85, &test_location());

        assert_eq!(r.panel_count, 5);
        assert_abs_diff_eq!(r.system_power_kwp, 2.75, epsilon = 1e-9);
        assert_abs_diff_eq!(r.inverter_recommended_kw, 2.2, epsilon = 1e-9);
        assert_abs_diff_eq!(r.area_m2, 11.5, epsilon = 1e-9);
        assert_abs_diff_eq!(r.monthly_generation_kwh, 328.68, epsilon = 1e-9);
        // Generation exceeds consumption, so savings stop at the full bill
        assert_abs_diff_eq!(r.monthly_savings, 255.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.total_cost, 6847.5, epsilon = 1e-9);
        println!(
            "300 kWh household: {} panels, {:.2} kWp, {:.2} BRL",
            r.panel_count, r.system_power_kwp, r.total_cost
        );
    }

    #[test]
    fn test_tiny_consumption_still_gets_one_panel() {
        let r = size_from_consumption(50.0, 0.85, &test_location());
        assert_eq!(r.panel_count, 1);
        assert_abs_diff_eq!(r.system_power_kwp, 0.55, epsilon = 1e-9);
    }

    #[test]
    fn test_installed_power_is_whole_modules() {
        for consumption in [60.0, 150.0, 300.0, 475.0, 800.0, 1250.0] {
            let r = size_from_consumption(consumption, 0.85, &test_location());
            assert!(r.panel_count >= 1);
            let expected_kwp = f64::from(r.panel_count) * PANEL_RATED_WP / 1000.0;
            assert_abs_diff_eq!(r.system_power_kwp, expected_kwp, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_savings_never_exceed_the_bill() {
        for consumption in [50.0, 120.0, 340.0, 990.0] {
            let r = size_from_consumption(consumption, 1.10, &test_location());
            assert!(r.monthly_savings <= consumption * 1.10 + 1e-9);
        }
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let r = size_from_consumption(420.0, 0.92, &test_location());
        let b = &r.cost_breakdown;
        let sum = b.panels + b.inverter + b.mounting + b.labor;
        assert_relative_eq!(sum, r.total_cost, max_relative = 1e-6);
        assert_abs_diff_eq!(b.panels, r.total_cost * 0.40, epsilon = 1e-9);
        assert_abs_diff_eq!(b.labor, r.total_cost * 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_budget_is_reported_verbatim() {
        let r = size_from_budget(10_000.0, 300.0, 0.85, &test_location());
        assert_eq!(r.total_cost, 10_000.0);
        let b = &r.cost_breakdown;
        assert_relative_eq!(b.panels + b.inverter + b.mounting + b.labor, 10_000.0, max_relative = 1e-6);
    }

    #[test]
    fn test_budget_roundtrip_recovers_cost_per_wp() {
        let location = test_location();
        let r = size_from_budget(10_000.0, 300.0, 0.85, &location);
        // budget / installed Wp must give back the regional cost per Wp
        // (display rounding of the kWp figure allows a small slack)
        let implied_cost_per_wp = 10_000.0 / (r.system_power_kwp * 1000.0);
        assert_relative_eq!(implied_cost_per_wp, location.cost_per_wp, max_relative = 1e-2);
    }

    #[test]
    fn test_budget_panel_count_approximates_power() {
        // 10 000 BRL / 2.49 BRL/Wp = 4016 Wp → 7 modules
        let r = size_from_budget(10_000.0, 300.0, 0.85, &test_location());
        assert_eq!(r.panel_count, 7);
        assert_abs_diff_eq!(r.area_m2, 16.1, epsilon = 1e-9);
    }

    #[test]
    fn test_budget_below_one_panel_clamps() {
        let r = size_from_budget(1000.0, 100.0, 0.85, &test_location());
        assert_eq!(r.panel_count, 1);
    }

    #[test]
    fn test_co2_follows_generation() {
        let r = size_from_consumption(300.0, 0.85, &test_location());
        // 328.68 kWh/month × 12 × 0.075 = 295.81 kg/year
        assert_abs_diff_eq!(r.annual_co2_avoided_kg, 295.81, epsilon = 1e-2);
        assert_abs_diff_eq!(r.equivalent_trees, 1.97, epsilon = 1e-2);
    }

    #[test]
    fn test_new_construction_estimator() {
        // 3 occupants, 1 electric shower, 1 air conditioner
        assert_eq!(estimate_new_construction(3, 1, 1), 350.0);
        assert_eq!(estimate_new_construction(0, 0, 0), 0.0);
        assert_eq!(estimate_new_construction(2, 0, 3), 420.0);
    }

    #[test]
    fn test_seasonal_series_preserves_annual_total() {
        let factors = [0.95, 0.97, 1.0, 1.05, 1.1, 1.12, 1.08, 1.02, 0.98, 0.96, 0.94, 0.93];
        let series = seasonal_series(328.68, &factors);
        assert_abs_diff_eq!(series[0], 328.68 * 0.95, epsilon = 1e-9);
        let annual: f64 = series.iter().sum();
        let factor_sum: f64 = factors.iter().sum();
        assert_relative_eq!(annual, 328.68 * factor_sum, max_relative = 1e-12);
    }
}
