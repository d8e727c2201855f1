//! WebSocket inbound adapter for the interactive member form.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list)
//! - spawn the per-connection form session
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, warn};
use url::Url;

mod session;

pub mod messages;
pub mod state;

/// Handle WebSocket upgrade for the `/ws/member-form` endpoint.
#[get("/ws/member-form")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let origin_header = req.headers().get(ORIGIN).ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    validate_origin(origin_header)?;

    let (response, session, message_stream) = actix_ws::handle(&req, stream)?;
    let provisioning = state.provisioning.clone();
    actix_web::rt::spawn(session::handle_form_session(
        provisioning,
        session,
        message_stream,
    ));
    Ok(response)
}

const CONSOLE_HOST: &str = "console.example.org";
const LOCALHOST: &str = "localhost";

fn validate_origin(origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = origin_header.to_str().map_err(|parse_error| {
        error!(error = %parse_error, "Failed to parse Origin header as string");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    let origin = Url::parse(origin_value).map_err(|parse_error| {
        error!(error = %parse_error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if is_allowed_origin(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

/// Returns true when a parsed Origin belongs to the static allow-list:
/// HTTPS from the console host, or HTTP from localhost with an explicit
/// non-zero port (local development).
fn is_allowed_origin(origin: &Url) -> bool {
    let Some(host) = origin.host_str() else {
        return false;
    };

    match origin.scheme() {
        "http" if host == LOCALHOST => matches!(origin.port(), Some(port) if port != 0),
        "https" => host == CONSOLE_HOST,
        _ => false,
    }
}
