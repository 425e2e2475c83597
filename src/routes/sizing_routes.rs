use axum::{
    Router,
    routing::{get, post},
};

use crate::controllers::sizing_controller::{
    // Catalog
    list_locations, get_location,
    // Sizing & estimation
    size_by_consumption, size_by_budget, estimate_consumption,
    // Billing
    derive_billing,
    // Last simulation & health
    get_last_simulation, get_last_simulation_chart, get_health,
};
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<AppState>` and/or `State<Config>` via
/// `FromRef<SharedState>` — a single `.with_state(shared)` covers both.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/locations",              get(list_locations))
        .route("/locations/{name}",       get(get_location))
        .route("/sizing/consumption",     post(size_by_consumption))
        .route("/sizing/budget",          post(size_by_budget))
        .route("/estimate/consumption",   post(estimate_consumption))
        .route("/billing",                post(derive_billing))
        .route("/simulations/last",       get(get_last_simulation))
        .route("/simulations/last/chart", get(get_last_simulation_chart))
        .route("/health",                 get(get_health))
        .with_state(shared)
}
