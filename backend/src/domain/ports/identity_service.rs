//! Port for the external identity service.
//!
//! The identity service owns authentication credentials. Provisioning calls
//! it exactly once per submission attempt to create a credential record and
//! obtain the stable identifier that keys the subsequent profile write.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::draft::MemberDraft;

/// Opaque stable identifier issued by the identity service.
///
/// The identifier correlates the profile record with its credentials; the
/// core never interprets its contents beyond requiring it to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberId(String);

/// Validation error returned when constructing a [`MemberId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("member id must not be empty")]
pub struct EmptyMemberId;

impl MemberId {
    /// Validate and construct a [`MemberId`] from an upstream identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, EmptyMemberId> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(EmptyMemberId);
        }
        Ok(Self(id))
    }

    /// Construct a [`MemberId`] from a UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id.to_string())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for MemberId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential creation request sent to the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    /// Accounts provisioned by an operator skip the verification email.
    pub email_pre_verified: bool,
}

impl NewIdentity {
    /// Build the creation request from a draft snapshot.
    pub fn from_draft(draft: &MemberDraft) -> Self {
        Self {
            email: draft.email.clone(),
            password: draft.password.clone(),
            email_pre_verified: true,
        }
    }
}

/// Result of a successful identity creation.
///
/// Held by the workflow only for the duration of one submission; the
/// identifier is not retained across attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedIdentity {
    pub member_id: MemberId,
}

/// Errors raised by identity service adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityServiceError {
    /// The service answered and refused to create the credentials.
    #[error("identity creation rejected: {message}")]
    Rejected { message: String },
    /// The service could not be reached or answered unintelligibly.
    #[error("identity service transport failed: {message}")]
    Transport { message: String },
}

impl IdentityServiceError {
    /// Helper for upstream rejections.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Helper for transport-level faults.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Port for credential creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Create credentials for a new member.
    ///
    /// Called at most once per submission attempt; the workflow never
    /// retries it.
    async fn create(
        &self,
        request: &NewIdentity,
    ) -> Result<ProvisionedIdentity, IdentityServiceError>;
}

/// Deterministic in-memory identity service for development and tests.
///
/// Rejects `error@test.com` with the message a duplicate registration would
/// produce and mints a fresh UUID for every other address.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityService;

/// Address the fixture always rejects.
pub const FIXTURE_REJECTED_EMAIL: &str = "error@test.com";

#[async_trait]
impl IdentityService for FixtureIdentityService {
    async fn create(
        &self,
        request: &NewIdentity,
    ) -> Result<ProvisionedIdentity, IdentityServiceError> {
        if request.email == FIXTURE_REJECTED_EMAIL {
            return Err(IdentityServiceError::rejected("Email already in use"));
        }
        Ok(ProvisionedIdentity {
            member_id: MemberId::from_uuid(Uuid::new_v4()),
        })
    }
}
