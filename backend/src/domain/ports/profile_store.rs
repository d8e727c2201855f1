//! Port for the durable profile store.
//!
//! The profile store holds display data keyed by the identity identifier.
//! Its insert is the second, dependent write of the provisioning workflow.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::draft::MemberDraft;
use crate::domain::ports::identity_service::MemberId;

/// Profile row written for a newly provisioned member.
///
/// ## Invariants
/// - `is_admin` and `is_approved` are fixed `false` at creation time by
///   policy. The constructor does not accept operator-supplied values for
///   either flag, regardless of draft content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub id: MemberId,
    pub display_name: String,
    pub email: String,
    is_admin: bool,
    is_approved: bool,
    pub bio: String,
}

impl ProfileRecord {
    /// Derive the row from a draft snapshot and the provisioned identifier.
    pub fn for_new_member(draft: &MemberDraft, id: MemberId) -> Self {
        Self {
            id,
            display_name: draft.display_name.clone(),
            email: draft.email.clone(),
            is_admin: false,
            is_approved: false,
            bio: draft.bio.clone(),
        }
    }

    /// Whether the member holds administrative rights.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Whether an operator has approved the member.
    pub fn is_approved(&self) -> bool {
        self.is_approved
    }
}

/// Errors raised by profile store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileStoreError {
    /// The store answered and refused the insert (e.g. uniqueness conflict).
    #[error("profile insert rejected: {message}")]
    Rejected { message: String },
    /// The store could not be reached or answered unintelligibly.
    #[error("profile store transport failed: {message}")]
    Transport { message: String },
}

impl ProfileStoreError {
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

/// Port for profile persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert the profile row for a newly provisioned member.
    ///
    /// Failures must carry a structured message; the core surfaces it
    /// verbatim to the operator.
    async fn insert(&self, record: &ProfileRecord) -> Result<(), ProfileStoreError>;
}

/// In-memory profile store that accepts every insert.
///
/// Used in development mode and in tests where profile behaviour is not
/// under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileStore;

#[async_trait]
impl ProfileStore for FixtureProfileStore {
    async fn insert(&self, _record: &ProfileRecord) -> Result<(), ProfileStoreError> {
        Ok(())
    }
}
