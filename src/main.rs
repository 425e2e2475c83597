mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;

use std::net::SocketAddr;

use axum::{Router, response::Html, routing::get};
use tower_http::{cors::CorsLayer, services::ServeDir};
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::routes::sizing_routes::api_routes;
use crate::shared_state::{AppState, SharedState};

#[tokio::main]
async fn main() {
    // 1. Load the location catalog
    let config = match Config::load("config.json") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config.json: {}", e);
            return;
        }
    };
    println!("[CONFIG] Catalog loaded: {} locations", config.locations.len());

    // 2. Last-result slot, empty until the first simulation
    let shared = SharedState {
        config: config.clone(),
        app_state: AppState::new(),
    };

    // 3. Assemble and start the HTTP server
    let app = Router::new()
        .nest("/api", api_routes(shared))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    println!("API Server listening on http://{}", addr);
    println!("Scalar UI: http://{}/scalar", addr);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
