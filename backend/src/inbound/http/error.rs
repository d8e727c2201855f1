//! HTTP error envelope and mapping from provisioning failures.
//!
//! Keeps the domain free of transport concerns by translating
//! [`ProvisionError`] into Actix responses here. Collaborator messages are
//! surfaced verbatim so the operator can judge the failure, including
//! whether an orphaned identity may exist after a profile-phase failure.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ProvisionError;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    /// The request is malformed or missing a required field.
    InvalidRequest,
    /// The identity service refused to create credentials; nothing was
    /// mutated.
    IdentityCreationFailed,
    /// The profile insert failed after the identity was created; an
    /// orphaned identity may exist.
    ProfileInsertFailed,
    /// A transport or other unexpected fault interrupted provisioning.
    ProvisioningFault,
}

/// Standard error payload returned by HTTP handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[schema(example = "identity_creation_failed")]
    code: ApiErrorCode,
    #[schema(example = "Email already in use")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    /// Create a new error payload.
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Convenience constructor for [`ApiErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidRequest, message)
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ApiErrorCode {
        self.code
    }

    /// Human readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl From<ProvisionError> for ApiError {
    fn from(error: ProvisionError) -> Self {
        let code = match error {
            ProvisionError::IdentityCreation { .. } => ApiErrorCode::IdentityCreationFailed,
            ProvisionError::ProfileInsert { .. } => ApiErrorCode::ProfileInsertFailed,
            ProvisionError::Unexpected { .. } => ApiErrorCode::ProvisioningFault,
        };
        Self::new(code, error.message())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

fn status_for(code: ApiErrorCode) -> StatusCode {
    match code {
        ApiErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ApiErrorCode::IdentityCreationFailed => StatusCode::CONFLICT,
        ApiErrorCode::ProfileInsertFailed => StatusCode::UNPROCESSABLE_ENTITY,
        ApiErrorCode::ProvisioningFault => StatusCode::BAD_GATEWAY,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(self.code)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        ProvisionError::identity_creation("Email already in use"),
        ApiErrorCode::IdentityCreationFailed,
        StatusCode::CONFLICT
    )]
    #[case(
        ProvisionError::profile_insert("Simulated database error"),
        ApiErrorCode::ProfileInsertFailed,
        StatusCode::UNPROCESSABLE_ENTITY
    )]
    #[case(
        ProvisionError::unexpected("connection reset"),
        ApiErrorCode::ProvisioningFault,
        StatusCode::BAD_GATEWAY
    )]
    fn provisioning_failures_map_to_stable_codes(
        #[case] error: ProvisionError,
        #[case] code: ApiErrorCode,
        #[case] status: StatusCode,
    ) {
        let message = error.message().to_owned();
        let api_error = ApiError::from(error);
        assert_eq!(api_error.code(), code);
        assert_eq!(api_error.message(), message);
        assert_eq!(api_error.status_code(), status);
    }

    #[test]
    fn payload_serialises_with_snake_case_code() {
        let error = ApiError::invalid_request("email must not be empty")
            .with_details(serde_json::json!({ "field": "email" }));
        let value = serde_json::to_value(&error).expect("serialises");
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["message"], "email must not be empty");
        assert_eq!(value["details"]["field"], "email");
    }

    #[test]
    fn details_are_omitted_when_absent() {
        let error = ApiError::invalid_request("nope");
        let value = serde_json::to_value(&error).expect("serialises");
        assert!(value.get("details").is_none());
    }
}
