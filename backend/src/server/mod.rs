//! Server construction and dependency wiring.

mod config;

pub use config::{ConsoleSettings, UpstreamConfig};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;

#[cfg(debug_assertions)]
use member_console::doc::ApiDoc;
use member_console::domain::ProvisioningService;
use member_console::domain::ports::{
    FixtureIdentityService, FixtureProfileStore, ProvisionMember,
};
use member_console::inbound::http::health::{HealthState, live, ready};
use member_console::inbound::http::members::create_member;
use member_console::inbound::http::state::HttpState;
use member_console::inbound::ws;
use member_console::inbound::ws::state::WsState;
use member_console::outbound::{IdentityHttpClient, ProfileHttpStore};

/// Build the provisioning workflow from configuration.
///
/// Uses HTTP-backed adapters when upstream settings are complete, otherwise
/// falls back to deterministic fixtures for local development and tests.
///
/// # Errors
///
/// Returns [`std::io::Error`] when upstream settings are partial or when an
/// HTTP client cannot be constructed.
fn build_provisioning(settings: &ConsoleSettings) -> std::io::Result<Arc<dyn ProvisionMember>> {
    match settings.upstream()? {
        Some(upstream) => {
            let identity = IdentityHttpClient::new(
                upstream.identity_endpoint,
                upstream.identity_service_key,
                upstream.timeout,
            )
            .map_err(|e| std::io::Error::other(format!("identity client build failed: {e}")))?;
            let profiles = ProfileHttpStore::new(
                upstream.profile_endpoint,
                upstream.profile_api_key,
                upstream.timeout,
            )
            .map_err(|e| std::io::Error::other(format!("profile store build failed: {e}")))?;
            info!("provisioning wired to HTTP upstreams");
            Ok(Arc::new(ProvisioningService::new(
                Arc::new(identity),
                Arc::new(profiles),
            )))
        }
        None => {
            warn!("no upstream configuration; provisioning uses fixtures");
            Ok(Arc::new(ProvisioningService::new(
                Arc::new(FixtureIdentityService),
                Arc::new(FixtureProfileStore),
            )))
        }
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
    } = deps;

    let api = web::scope("/api/v1").service(create_member);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .service(api)
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.route(
        "/api/openapi.json",
        web::get().to(|| async { web::Json(ApiDoc::openapi()) }),
    );

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when configuration is invalid or binding
/// the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    settings: &ConsoleSettings,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let provisioning = build_provisioning(settings)?;
    let http_state = web::Data::new(HttpState::new(provisioning.clone()));
    let ws_state = web::Data::new(WsState::new(provisioning));
    let bind_addr = settings.bind_addr()?;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
