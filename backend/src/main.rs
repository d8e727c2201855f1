//! Console entry-point: wires REST endpoints, the form WebSocket, and
//! OpenAPI docs.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use member_console::inbound::http::health::HealthState;
use server::ConsoleSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ConsoleSettings::load()
        .map_err(|e| std::io::Error::other(format!("configuration load failed: {e}")))?;

    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state.clone(), &settings)?;

    // Fail liveness as soon as the shutdown signal lands, before the worker
    // drain completes.
    actix_web::rt::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "shutdown signal listener failed");
            return;
        }
        health_state.mark_unhealthy();
    });

    server.await
}
