//! Member provisioning endpoint.
//!
//! ```text
//! POST /api/v1/members {"email":"a@b.com","password":"p","displayName":"Alice","bio":""}
//! ```
//!
//! One-shot counterpart of the interactive form session: a single request
//! runs the full two-step workflow and reports the outcome in one response.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::MemberDraft;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/members`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    #[schema(example = "membre@exemple.com")]
    pub email: String,
    pub password: String,
    #[schema(example = "Alice")]
    pub display_name: String,
    /// Optional presentation text.
    #[serde(default)]
    pub bio: String,
}

impl From<CreateMemberRequest> for MemberDraft {
    fn from(value: CreateMemberRequest) -> Self {
        Self {
            email: value.email,
            password: value.password,
            display_name: value.display_name,
            bio: value.bio,
        }
    }
}

/// Response body on successful provisioning.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberResponse {
    #[schema(example = "Member account created successfully.")]
    pub message: String,
}

/// Provision a new member account.
///
/// Validation is presence-only; everything beyond that is the identity
/// service's and profile store's concern, and their messages are surfaced
/// verbatim.
#[utoipa::path(
    post,
    path = "/api/v1/members",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member provisioned", body = CreateMemberResponse),
        (status = 400, description = "Missing required field", body = ApiError),
        (status = 409, description = "Identity creation rejected", body = ApiError),
        (status = 422, description = "Profile insert rejected; orphaned identity possible", body = ApiError),
        (status = 502, description = "Unexpected provisioning fault", body = ApiError)
    ),
    tags = ["members"],
    operation_id = "createMember"
)]
#[post("/members")]
pub async fn create_member(
    state: web::Data<HttpState>,
    payload: web::Json<CreateMemberRequest>,
) -> ApiResult<HttpResponse> {
    let draft = MemberDraft::from(payload.into_inner());
    if let Some(field) = draft.missing_required() {
        return Err(
            ApiError::invalid_request(format!("{field} must not be empty"))
                .with_details(json!({ "field": field })),
        );
    }

    state.provisioning.provision(&draft).await?;
    Ok(HttpResponse::Created().json(CreateMemberResponse {
        message: "Member account created successfully.".to_owned(),
    }))
}
