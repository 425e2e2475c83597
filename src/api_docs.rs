use utoipa::OpenApi;

use crate::config;
use crate::controllers::sizing_controller;
use crate::models::sizing;

#[derive(OpenApi)]
#[openapi(
    paths(
        sizing_controller::list_locations,
        sizing_controller::get_location,
        sizing_controller::size_by_consumption,
        sizing_controller::size_by_budget,
        sizing_controller::estimate_consumption,
        sizing_controller::derive_billing,
        sizing_controller::get_last_simulation,
        sizing_controller::get_last_simulation_chart,
        sizing_controller::get_health
    ),
    components(
        schemas(
            config::LocationProfile,
            sizing::LocationView,
            sizing::ConsumptionSizingRequest,
            sizing::BudgetSizingRequest,
            sizing::ConsumptionEstimateRequest,
            sizing::ConsumptionEstimateResponse,
            sizing::BillingRequest,
            sizing::BillingOutcome,
            sizing::ConnectionClass,
            sizing::SizingResult,
            sizing::CostBreakdown,
            sizing::Payback,
            sizing::SizingMode,
            sizing::SimulationRecord,
            sizing::ChartSeries,
            sizing::MonthlyChartPoint,
            sizing::HealthStatus
        )
    ),
    tags(
        (name = "solarsim", description = "Residential Solar Sizing API")
    )
)]
pub struct ApiDoc;
