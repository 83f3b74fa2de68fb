use anyhow::Result;
use solar_potential::{api, config, pvgis::PvgisClient, state::AppState, telemetry};
use config::Config;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    telemetry::init_tracing(&cfg.telemetry);

    let client = PvgisClient::new(&cfg.pvgis)?;
    let state = AppState::new(cfg.clone(), Arc::new(client));
    let app = api::router(state, &cfg);

    let addr = cfg.server.socket_addr()?;
    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0 - service will be reachable from the network");
    }
    info!(%addr, pvgis = %cfg.pvgis.base_url, "starting solar potential service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
