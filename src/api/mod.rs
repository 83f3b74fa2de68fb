pub mod error;
pub mod export;
pub mod health;
pub mod radiation;
pub mod reference;
pub mod simulation;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::Config, state::AppState};

fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/radiation", post(radiation::monthly_radiation))
        .route("/carbon-intensity", get(reference::carbon_intensity))
        .route("/energy-prices", get(reference::energy_prices))
        .route("/region", get(reference::region))
        .route("/capacity", post(simulation::capacity))
        .route("/simulate", post(simulation::simulate))
        .route("/cost-analysis", post(simulation::cost_analysis))
        .route("/export", post(export::zip_bundle))
        .route("/export/csv", post(export::combined_csv))
        .with_state(state)
}

pub fn router(state: AppState, cfg: &Config) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes(state));

    if cfg.server.enable_cors {
        use tower_http::cors::Any;
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(cfg.server.body_limit_bytes))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(cfg.server.request_timeout_secs),
                )),
        )
        .layer(TraceLayer::new_for_http())
}
