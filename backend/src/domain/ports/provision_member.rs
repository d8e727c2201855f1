//! Driving port for the member provisioning use-case.
//!
//! Inbound adapters (HTTP handler, form session) call this port to provision
//! a member without knowing the backing collaborators, which keeps handler
//! tests deterministic through test doubles.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::draft::MemberDraft;

/// Failure detail distinguishing which provisioning phase failed.
///
/// The two phases leave the system in different states: an identity
/// rejection mutates nothing, while a profile failure strands an identity
/// record without a profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    /// The identity service refused to create credentials. No external
    /// state was mutated.
    #[error("identity creation failed: {message}")]
    IdentityCreation { message: String },
    /// The profile insert failed after the identity was created. An
    /// orphaned identity may exist.
    #[error("profile insert failed: {message}")]
    ProfileInsert { message: String },
    /// A transport or other unexpected fault interrupted provisioning.
    #[error("unexpected provisioning failure: {message}")]
    Unexpected { message: String },
}

impl ProvisionError {
    /// Helper for identity-phase rejections.
    pub fn identity_creation(message: impl Into<String>) -> Self {
        Self::IdentityCreation {
            message: message.into(),
        }
    }

    /// Helper for profile-phase rejections.
    pub fn profile_insert(message: impl Into<String>) -> Self {
        Self::ProfileInsert {
            message: message.into(),
        }
    }

    /// Helper for unexpected faults.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Collaborator-provided message, surfaced verbatim to the operator.
    pub fn message(&self) -> &str {
        match self {
            Self::IdentityCreation { message }
            | Self::ProfileInsert { message }
            | Self::Unexpected { message } => message.as_str(),
        }
    }

    /// Stable name of the failing phase for wire payloads and logs.
    pub fn phase(&self) -> &'static str {
        match self {
            Self::IdentityCreation { .. } => "identity",
            Self::ProfileInsert { .. } => "profile",
            Self::Unexpected { .. } => "unexpected",
        }
    }
}

/// Domain use-case port for provisioning one member account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProvisionMember: Send + Sync {
    /// Run the two-step provisioning workflow for a draft snapshot.
    ///
    /// Invoked at most once per concrete submission action; re-entry is
    /// guarded by the form state holder.
    async fn provision(&self, draft: &MemberDraft) -> Result<(), ProvisionError>;
}

/// Workflow double that accepts every draft.
///
/// Use it in adapter tests where provisioning behaviour is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProvisionMember;

#[async_trait]
impl ProvisionMember for FixtureProvisionMember {
    async fn provision(&self, _draft: &MemberDraft) -> Result<(), ProvisionError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ProvisionError::identity_creation("Email already in use"), "identity")]
    #[case(ProvisionError::profile_insert("Simulated database error"), "profile")]
    #[case(ProvisionError::unexpected("connection reset"), "unexpected")]
    fn phases_name_the_failing_step(#[case] error: ProvisionError, #[case] phase: &str) {
        assert_eq!(error.phase(), phase);
    }

    #[test]
    fn messages_are_preserved_verbatim() {
        let error = ProvisionError::profile_insert("Simulated database error");
        assert_eq!(error.message(), "Simulated database error");
    }

    #[tokio::test]
    async fn fixture_workflow_accepts_any_draft() {
        let workflow = FixtureProvisionMember;
        let outcome = workflow.provision(&MemberDraft::default()).await;
        assert_eq!(outcome, Ok(()));
    }
}
