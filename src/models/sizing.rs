use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ─── Core sizing result ──────────────────────────────────────────────────────

/// Complete sized-system record — everything the simulator derives from a
/// consumption figure (or a budget) for one location.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SizingResult {
    /// Installed DC capacity (kWp)
    pub system_power_kwp: f64,
    /// Recommended AC inverter rating (kW) — DC capacity / 1.25 oversizing
    pub inverter_recommended_kw: f64,
    /// Whole 550 Wp modules, never fewer than one
    pub panel_count: u32,
    /// Minimum roof area (m²)
    pub area_m2: f64,
    /// Installed cost (BRL). Budget mode reports the budget verbatim.
    pub total_cost: f64,
    /// Monthly bill reduction (BRL), capped by the consumption offset
    pub monthly_savings: f64,
    /// Avoided emissions (kg CO₂/year)
    pub annual_co2_avoided_kg: f64,
    /// Tree-planting equivalent of the avoided emissions
    pub equivalent_trees: f64,
    /// Average monthly generation (kWh)
    pub monthly_generation_kwh: f64,
    pub cost_breakdown: CostBreakdown,
}

/// Installed-cost split across the four budget categories.
/// Shares are fixed domain convention: 40/20/15/25 % of the total.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CostBreakdown {
    /// Panels (40 %)
    pub panels: f64,
    /// Inverter (20 %)
    pub inverter: f64,
    /// Mounting, cabling and protection (15 %)
    pub mounting: f64,
    /// Labor and design (25 %)
    pub labor: f64,
}

// ─── Payback ─────────────────────────────────────────────────────────────────

/// Amortization period. `NotApplicable` is an explicit signal for
/// non-positive savings — never a numeric sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Payback {
    NotApplicable,
    Duration { years: u32, months: u32 },
}

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NotApplicable => write!(f, "Not applicable"),
            Self::Duration { years: 0, months } => write!(f, "~ {months} months"),
            Self::Duration { years, months } => write!(f, "~ {years} years and {months} months"),
        }
    }
}

// ─── Post-installation billing ───────────────────────────────────────────────

/// Grid connection class. Each class carries the distributor's
/// minimum-billable-energy floor, charged even at zero net draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionClass {
    SinglePhase,
    TwoPhase,
    ThreePhase,
}

impl ConnectionClass {
    pub fn minimum_billable_kwh(self) -> f64 {
        match self {
            Self::SinglePhase => 30.0,
            Self::TwoPhase => 50.0,
            Self::ThreePhase => 100.0,
        }
    }
}

/// Net-metering month outcome. An undersized system draws from the grid;
/// a matched or oversized one accumulates credit but still pays the
/// connection floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingOutcome {
    GridDraw {
        grid_draw_kwh: f64,
        /// max(draw, connection floor)
        billed_kwh: f64,
        monthly_bill: f64,
    },
    Credit {
        credit_kwh: f64,
        monthly_bill: f64,
    },
}

// ─── Simulation record (single-slot cache value) ─────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizingMode {
    Consumption,
    Budget,
}

/// One completed simulation: inputs echoed back, the sized system, and the
/// amortization. This is what the last-result slot holds for re-display.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SimulationRecord {
    pub id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub mode: SizingMode,
    pub location: String,
    pub peak_sun_hours: f64,
    pub consumption_kwh: f64,
    pub tariff: f64,
    pub result: SizingResult,
    pub payback: Payback,
    /// Human-readable payback, e.g. "~ 2 years and 3 months"
    pub payback_label: String,
}

// ─── REST request types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConsumptionSizingRequest {
    /// Average monthly consumption (kWh), ≥ 50
    pub consumption_kwh: f64,
    /// Energy tariff (BRL/kWh), 0.30–1.50
    pub tariff: f64,
    /// Catalog location name
    pub location: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BudgetSizingRequest {
    /// Total investment (BRL), ≥ 1000
    pub budget: f64,
    /// Average monthly consumption (kWh), ≥ 50 — used for savings/payback
    pub consumption_kwh: f64,
    /// Energy tariff (BRL/kWh), 0.30–1.50
    pub tariff: f64,
    /// Catalog location name
    pub location: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConsumptionEstimateRequest {
    pub occupants: u32,
    pub shower_heads: u32,
    pub air_conditioners: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConsumptionEstimateResponse {
    /// Estimated monthly consumption (kWh)
    pub estimated_kwh: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BillingRequest {
    pub monthly_generation_kwh: f64,
    pub consumption_kwh: f64,
    /// Energy tariff (BRL/kWh), 0.30–1.50
    pub tariff: f64,
    pub connection: ConnectionClass,
}

// ─── REST response types ─────────────────────────────────────────────────────

/// Catalog entry with its seasonal table resolved (location override or
/// catalog default), as consumed by the charting front-end.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationView {
    pub name: String,
    pub peak_sun_hours: f64,
    pub cost_per_wp: f64,
    pub seasonal_factors: [f64; 12],
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyChartPoint {
    pub month: String,
    pub generation_kwh: f64,
    pub consumption_kwh: f64,
}

/// Chart series derived from the last simulation — either the 12-point
/// seasonal comparison or the annual aggregate.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChartSeries {
    Monthly { points: Vec<MonthlyChartPoint> },
    Annual { consumption_kwh: f64, generation_kwh: f64 },
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub locations_loaded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payback_labels() {
        assert_eq!(Payback::NotApplicable.to_string(), "Not applicable");
        assert_eq!(Payback::Duration { years: 0, months: 7 }.to_string(), "~ 7 months");
        assert_eq!(
            Payback::Duration { years: 2, months: 3 }.to_string(),
            "~ 2 years and 3 months"
        );
    }

    #[test]
    fn test_connection_floors() {
        assert_eq!(ConnectionClass::SinglePhase.minimum_billable_kwh(), 30.0);
        assert_eq!(ConnectionClass::TwoPhase.minimum_billable_kwh(), 50.0);
        assert_eq!(ConnectionClass::ThreePhase.minimum_billable_kwh(), 100.0);
    }
}
