use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::config::{Config, LocationProfile};
use crate::models::sizing::{
    BillingOutcome, BillingRequest, BudgetSizingRequest, ChartSeries, ConsumptionEstimateRequest,
    ConsumptionEstimateResponse, ConsumptionSizingRequest, HealthStatus, LocationView,
    MonthlyChartPoint, SimulationRecord, SizingMode, SizingResult,
};
use crate::services::{finance, sizing_engine};
use crate::shared_state::AppState;

// ─── Input validation bands (form boundary, not core logic) ──────────────────
const MIN_CONSUMPTION_KWH: f64 = 50.0;
const MIN_TARIFF: f64 = 0.30;
const MAX_TARIFF: f64 = 1.50;
const MIN_BUDGET: f64 = 1000.0;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn invalid(message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn check_tariff(tariff: f64) -> Result<(), Response> {
    if !tariff.is_finite() || !(MIN_TARIFF..=MAX_TARIFF).contains(&tariff) {
        return Err(invalid("tariff must be between 0.30 and 1.50 BRL/kWh"));
    }
    Ok(())
}

fn check_consumption(consumption_kwh: f64) -> Result<(), Response> {
    if !consumption_kwh.is_finite() || consumption_kwh < MIN_CONSUMPTION_KWH {
        return Err(invalid("consumption must be at least 50 kWh/month"));
    }
    Ok(())
}

fn build_record(
    mode: SizingMode,
    location: &LocationProfile,
    consumption_kwh: f64,
    tariff: f64,
    result: SizingResult,
) -> SimulationRecord {
    let payback = finance::payback(result.total_cost, result.monthly_savings);
    SimulationRecord {
        id: Uuid::new_v4(),
        computed_at: Utc::now(),
        mode,
        location: location.name.clone(),
        peak_sun_hours: location.peak_sun_hours,
        consumption_kwh,
        tariff,
        payback_label: payback.to_string(),
        payback,
        result,
    }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// GET /api/locations
/// List the location catalog
///
/// Returns every configured location with its peak sun hours, regional cost
/// per Wp and resolved seasonal table.
#[utoipa::path(
    get,
    path = "/api/locations",
    responses(
        (status = 200, description = "Location catalog", body = Vec<LocationView>)
    )
)]
pub async fn list_locations(State(config): State<Config>) -> impl IntoResponse {
    let views: Vec<LocationView> = config
        .locations
        .iter()
        .map(|location| LocationView {
            name: location.name.clone(),
            peak_sun_hours: location.peak_sun_hours,
            cost_per_wp: location.cost_per_wp,
            seasonal_factors: *config.seasonal_factors_for(location),
        })
        .collect();
    Json(views).into_response()
}

/// GET /api/locations/{name}
/// Get a single catalog entry
#[utoipa::path(
    get,
    path = "/api/locations/{name}",
    params(
        ("name" = String, Path, description = "Catalog location name")
    ),
    responses(
        (status = 200, description = "Location profile", body = LocationView),
        (status = 404, description = "Location not in the catalog")
    )
)]
pub async fn get_location(
    Path(name): Path<String>,
    State(config): State<Config>,
) -> impl IntoResponse {
    match config.find_location(&name) {
        Some(location) => Json(LocationView {
            name: location.name.clone(),
            peak_sun_hours: location.peak_sun_hours,
            cost_per_wp: location.cost_per_wp,
            seasonal_factors: *config.seasonal_factors_for(location),
        })
        .into_response(),
        None => not_found("location not in the catalog"),
    }
}

// ─── Sizing ──────────────────────────────────────────────────────────────────

/// POST /api/sizing/consumption
/// Size a system for a monthly consumption
///
/// Sizes the system that covers the given consumption at the selected
/// location, derives cost, savings, payback and avoided CO₂, and stores the
/// record as the last simulation.
#[utoipa::path(
    post,
    path = "/api/sizing/consumption",
    request_body = ConsumptionSizingRequest,
    responses(
        (status = 200, description = "Sized system", body = SimulationRecord),
        (status = 404, description = "Location not in the catalog"),
        (status = 422, description = "Input outside the validated bands")
    )
)]
pub async fn size_by_consumption(
    State(config): State<Config>,
    State(state): State<AppState>,
    Json(req): Json<ConsumptionSizingRequest>,
) -> Response {
    if let Err(rejection) = check_consumption(req.consumption_kwh) {
        return rejection;
    }
    if let Err(rejection) = check_tariff(req.tariff) {
        return rejection;
    }
    let Some(location) = config.find_location(&req.location) else {
        return not_found("location not in the catalog");
    };

    let result = sizing_engine::size_from_consumption(req.consumption_kwh, req.tariff, location);
    let record = build_record(SizingMode::Consumption, location, req.consumption_kwh, req.tariff, result);
    println!(
        "[SIZING] mode=consumption location={} panels={} cost={:.2}",
        record.location, record.result.panel_count, record.result.total_cost
    );
    state.store(record.clone());
    (StatusCode::OK, Json(record)).into_response()
}

/// POST /api/sizing/budget
/// Size the system a budget buys
///
/// The budget fixes the installed power and is reported back verbatim as the
/// total cost; consumption and tariff feed the savings and payback figures.
#[utoipa::path(
    post,
    path = "/api/sizing/budget",
    request_body = BudgetSizingRequest,
    responses(
        (status = 200, description = "Sized system", body = SimulationRecord),
        (status = 404, description = "Location not in the catalog"),
        (status = 422, description = "Input outside the validated bands")
    )
)]
pub async fn size_by_budget(
    State(config): State<Config>,
    State(state): State<AppState>,
    Json(req): Json<BudgetSizingRequest>,
) -> Response {
    if !req.budget.is_finite() || req.budget < MIN_BUDGET {
        return invalid("budget must be at least 1000 BRL");
    }
    if let Err(rejection) = check_consumption(req.consumption_kwh) {
        return rejection;
    }
    if let Err(rejection) = check_tariff(req.tariff) {
        return rejection;
    }
    let Some(location) = config.find_location(&req.location) else {
        return not_found("location not in the catalog");
    };

    let result = sizing_engine::size_from_budget(req.budget, req.consumption_kwh, req.tariff, location);
    let record = build_record(SizingMode::Budget, location, req.consumption_kwh, req.tariff, result);
    println!(
        "[SIZING] mode=budget location={} panels={} budget={:.2}",
        record.location, record.result.panel_count, record.result.total_cost
    );
    state.store(record.clone());
    (StatusCode::OK, Json(record)).into_response()
}

/// POST /api/estimate/consumption
/// Estimate consumption for a new construction
///
/// Linear heuristic over occupant and appliance counts for dwellings without
/// meter history. The estimate feeds the consumption sizing endpoint as if it
/// were a metered value.
#[utoipa::path(
    post,
    path = "/api/estimate/consumption",
    request_body = ConsumptionEstimateRequest,
    responses(
        (status = 200, description = "Estimated monthly consumption", body = ConsumptionEstimateResponse)
    )
)]
pub async fn estimate_consumption(Json(req): Json<ConsumptionEstimateRequest>) -> impl IntoResponse {
    let estimated_kwh = sizing_engine::estimate_new_construction(
        req.occupants,
        req.shower_heads,
        req.air_conditioners,
    );
    Json(ConsumptionEstimateResponse { estimated_kwh }).into_response()
}

// ─── Billing ─────────────────────────────────────────────────────────────────

/// POST /api/billing
/// Post-installation billing outcome
///
/// Net-metering month outcome for a generation/consumption pair: grid draw
/// billed at least at the connection floor, or surplus credit with the floor
/// still charged.
#[utoipa::path(
    post,
    path = "/api/billing",
    request_body = BillingRequest,
    responses(
        (status = 200, description = "Billing outcome", body = BillingOutcome),
        (status = 422, description = "Input outside the validated bands")
    )
)]
pub async fn derive_billing(Json(req): Json<BillingRequest>) -> Response {
    if let Err(rejection) = check_tariff(req.tariff) {
        return rejection;
    }
    if !req.monthly_generation_kwh.is_finite()
        || !req.consumption_kwh.is_finite()
        || req.monthly_generation_kwh < 0.0
        || req.consumption_kwh < 0.0
    {
        return invalid("generation and consumption must be non-negative");
    }

    let outcome = finance::billing_outcome(
        req.monthly_generation_kwh,
        req.consumption_kwh,
        req.tariff,
        req.connection,
    );
    Json(outcome).into_response()
}

// ─── Last simulation ─────────────────────────────────────────────────────────

/// GET /api/simulations/last
/// Re-display the last simulation
#[utoipa::path(
    get,
    path = "/api/simulations/last",
    responses(
        (status = 200, description = "Last computed simulation", body = SimulationRecord),
        (status = 404, description = "Nothing computed yet")
    )
)]
pub async fn get_last_simulation(State(state): State<AppState>) -> Response {
    match state.last() {
        Some(record) => Json(record).into_response(),
        None => not_found("no simulation computed yet"),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChartParams {
    /// "monthly" (default) or "annual"
    pub mode: Option<String>,
}

/// GET /api/simulations/last/chart
/// Chart series for the last simulation
///
/// Applies the location's seasonal irradiation shape to the stored monthly
/// generation — no recomputation of the sizing itself.
#[utoipa::path(
    get,
    path = "/api/simulations/last/chart",
    params(ChartParams),
    responses(
        (status = 200, description = "Chart series", body = ChartSeries),
        (status = 404, description = "Nothing computed yet"),
        (status = 422, description = "Unknown chart mode")
    )
)]
pub async fn get_last_simulation_chart(
    Query(params): Query<ChartParams>,
    State(config): State<Config>,
    State(state): State<AppState>,
) -> Response {
    let Some(record) = state.last() else {
        return not_found("no simulation computed yet");
    };
    // Catalog and selector are built from the same source set, so the
    // stored location is expected to resolve; guard it anyway.
    let Some(location) = config.find_location(&record.location) else {
        return not_found("location of the last simulation left the catalog");
    };

    let factors = config.seasonal_factors_for(location);
    let series = sizing_engine::seasonal_series(record.result.monthly_generation_kwh, factors);

    match params.mode.as_deref().unwrap_or("monthly") {
        "monthly" => {
            let points = MONTH_LABELS
                .iter()
                .zip(series.iter())
                .map(|(month, generation_kwh)| MonthlyChartPoint {
                    month: (*month).to_string(),
                    generation_kwh: *generation_kwh,
                    consumption_kwh: record.consumption_kwh,
                })
                .collect();
            Json(ChartSeries::Monthly { points }).into_response()
        }
        "annual" => Json(ChartSeries::Annual {
            consumption_kwh: record.consumption_kwh * 12.0,
            generation_kwh: series.iter().sum(),
        })
        .into_response(),
        _ => invalid("mode must be \"monthly\" or \"annual\""),
    }
}

// ─── Health ──────────────────────────────────────────────────────────────────

/// GET /api/health
/// Service health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
pub async fn get_health(State(config): State<Config>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        locations_loaded: config.locations.len(),
    })
    .into_response()
}
