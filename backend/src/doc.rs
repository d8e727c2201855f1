//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: the member provisioning endpoint and the health probes
//! - **Schemas**: request, response and error payloads from the inbound layer
//!
//! Debug builds serve the generated document at `/api/openapi.json` for
//! external tooling.

use utoipa::OpenApi;

use crate::inbound::http::error::{ApiError, ApiErrorCode};
use crate::inbound::http::members::{CreateMemberRequest, CreateMemberResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Member console API",
        description = "HTTP interface for operator-driven member provisioning and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::members::create_member,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateMemberRequest,
        CreateMemberResponse,
        ApiError,
        ApiErrorCode
    )),
    tags(
        (name = "members", description = "Operations that provision member accounts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
