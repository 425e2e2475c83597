//! Payback amortization and the post-installation billing outcome under
//! net-metering rules.

use crate::models::sizing::{BillingOutcome, ConnectionClass, Payback};

/// Time for cumulative savings to repay the installed cost.
/// Non-positive savings never amortize — reported explicitly, not as a
/// division result.
pub fn payback(total_cost: f64, monthly_savings: f64) -> Payback {
    if monthly_savings <= 0.0 {
        return Payback::NotApplicable;
    }

    let payback_years = total_cost / (monthly_savings * 12.0);
    let mut years = payback_years.trunc() as u32;
    let mut months = ((payback_years - payback_years.trunc()) * 12.0).round() as u32;
    // Near-integer years round the remainder up to a full 12 months;
    // carry instead of presenting "N years and 12 months".
    if months == 12 {
        years += 1;
        months = 0;
    }

    Payback::Duration { years, months }
}

/// Monthly bill after installation. The distributor's minimum-billable
/// floor for the connection class applies even when generation covers the
/// whole consumption; surplus is reported as credit, not banked.
pub fn billing_outcome(
    monthly_generation_kwh: f64,
    consumption_kwh: f64,
    tariff: f64,
    connection: ConnectionClass,
) -> BillingOutcome {
    let floor_kwh = connection.minimum_billable_kwh();
    let surplus_kwh = monthly_generation_kwh - consumption_kwh;

    if surplus_kwh < 0.0 {
        let grid_draw_kwh = -surplus_kwh;
        let billed_kwh = grid_draw_kwh.max(floor_kwh);
        BillingOutcome::GridDraw {
            grid_draw_kwh,
            billed_kwh,
            monthly_bill: billed_kwh * tariff,
        }
    } else {
        BillingOutcome::Credit {
            credit_kwh: surplus_kwh,
            monthly_bill: floor_kwh * tariff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_payback_not_applicable_without_savings() {
        assert_eq!(payback(10_000.0, 0.0), Payback::NotApplicable);
        assert_eq!(payback(10_000.0, -5.0), Payback::NotApplicable);
    }

    #[test]
    fn test_payback_reference_system() {
        // 6847.50 BRL repaid at 255 BRL/month → 2.238 years → 2 years 3 months
        assert_eq!(payback(6847.5, 255.0), Payback::Duration { years: 2, months: 3 });
    }

    #[test]
    fn test_payback_under_a_year() {
        // 0.5 years → months-only form
        assert_eq!(payback(600.0, 100.0), Payback::Duration { years: 0, months: 6 });
    }

    #[test]
    fn test_payback_carries_twelve_months() {
        // 4764 / (100 × 12) = 3.97 years → 3 years + 11.64 months would
        // round to "3 years and 12 months"; must carry to 4 years flat
        assert_eq!(payback(4764.0, 100.0), Payback::Duration { years: 4, months: 0 });
    }

    #[test]
    fn test_payback_duration_matches_ratio() {
        for (cost, savings) in [(6847.5, 255.0), (12_000.0, 180.0), (3000.0, 410.0)] {
            let exact_months = cost / savings;
            match payback(cost, savings) {
                Payback::Duration { years, months } => {
                    let total_months = f64::from(years * 12 + months);
                    assert_abs_diff_eq!(total_months, exact_months, epsilon = 1.0);
                }
                Payback::NotApplicable => panic!("positive savings must amortize"),
            }
        }
    }

    #[test]
    fn test_oversized_system_earns_credit() {
        // generation 400, consumption 300, floor 50 → 100 kWh credit,
        // bill stays at the connection floor
        let outcome = billing_outcome(400.0, 300.0, 0.85, ConnectionClass::TwoPhase);
        match outcome {
            BillingOutcome::Credit { credit_kwh, monthly_bill } => {
                assert_abs_diff_eq!(credit_kwh, 100.0, epsilon = 1e-9);
                assert_abs_diff_eq!(monthly_bill, 50.0 * 0.85, epsilon = 1e-9);
            }
            BillingOutcome::GridDraw { .. } => panic!("surplus must be credited"),
        }
    }

    #[test]
    fn test_undersized_system_bills_at_floor() {
        // generation 250, consumption 300, floor 50 → draw 50, billed max(50, 50)
        let outcome = billing_outcome(250.0, 300.0, 0.85, ConnectionClass::TwoPhase);
        match outcome {
            BillingOutcome::GridDraw { grid_draw_kwh, billed_kwh, monthly_bill } => {
                assert_abs_diff_eq!(grid_draw_kwh, 50.0, epsilon = 1e-9);
                assert_abs_diff_eq!(billed_kwh, 50.0, epsilon = 1e-9);
                assert_abs_diff_eq!(monthly_bill, 42.5, epsilon = 1e-9);
            }
            BillingOutcome::Credit { .. } => panic!("deficit must draw from grid"),
        }
    }

    #[test]
    fn test_deep_deficit_bills_actual_draw() {
        let outcome = billing_outcome(100.0, 400.0, 1.0, ConnectionClass::SinglePhase);
        match outcome {
            BillingOutcome::GridDraw { grid_draw_kwh, billed_kwh, monthly_bill } => {
                assert_abs_diff_eq!(grid_draw_kwh, 300.0, epsilon = 1e-9);
                assert_abs_diff_eq!(billed_kwh, 300.0, epsilon = 1e-9);
                assert_abs_diff_eq!(monthly_bill, 300.0, epsilon = 1e-9);
            }
            BillingOutcome::Credit { .. } => panic!("deficit must draw from grid"),
        }
    }

    #[test]
    fn test_exact_match_pays_connection_floor() {
        let outcome = billing_outcome(300.0, 300.0, 0.85, ConnectionClass::ThreePhase);
        match outcome {
            BillingOutcome::Credit { credit_kwh, monthly_bill } => {
                assert_abs_diff_eq!(credit_kwh, 0.0, epsilon = 1e-9);
                assert_abs_diff_eq!(monthly_bill, 85.0, epsilon = 1e-9);
            }
            BillingOutcome::GridDraw { .. } => panic!("matched system must not draw"),
        }
    }
}
