//! Two-step member provisioning workflow.
//!
//! Orchestrates the dependent writes against the identity service and the
//! profile store: credentials first, then the profile row keyed by the
//! returned identifier. The profile write is never attempted unless the
//! identity write succeeded, and a profile failure is not compensated — the
//! created identity is left in place and the failure is reported with its
//! phase so the operator can judge whether an orphan exists.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::draft::MemberDraft;
use crate::domain::ports::{
    IdentityService, IdentityServiceError, NewIdentity, ProfileRecord, ProfileStore,
    ProfileStoreError, ProvisionError, ProvisionMember,
};

/// Provisioning workflow over the two collaborator ports.
#[derive(Clone)]
pub struct ProvisioningService<I, P> {
    identity: Arc<I>,
    profiles: Arc<P>,
}

impl<I, P> ProvisioningService<I, P> {
    /// Create the workflow with the given collaborators.
    pub fn new(identity: Arc<I>, profiles: Arc<P>) -> Self {
        Self { identity, profiles }
    }
}

impl<I, P> ProvisioningService<I, P>
where
    I: IdentityService,
    P: ProfileStore,
{
    fn map_identity_error(error: IdentityServiceError) -> ProvisionError {
        match error {
            IdentityServiceError::Rejected { message } => {
                ProvisionError::identity_creation(message)
            }
            IdentityServiceError::Transport { message } => ProvisionError::unexpected(message),
        }
    }

    fn map_profile_error(error: ProfileStoreError) -> ProvisionError {
        match error {
            ProfileStoreError::Rejected { message } => ProvisionError::profile_insert(message),
            ProfileStoreError::Transport { message } => ProvisionError::unexpected(message),
        }
    }

    async fn run(&self, draft: &MemberDraft) -> Result<(), ProvisionError> {
        let request = NewIdentity::from_draft(draft);
        let identity = self
            .identity
            .create(&request)
            .await
            .map_err(Self::map_identity_error)?;

        let member_id = identity.member_id;
        let record = ProfileRecord::for_new_member(draft, member_id.clone());
        if let Err(error) = self.profiles.insert(&record).await {
            // The identity record now has no profile; there is no rollback.
            warn!(
                member_id = %member_id,
                error = %error,
                "profile insert failed after identity creation; orphaned identity possible"
            );
            return Err(Self::map_profile_error(error));
        }

        info!(member_id = %member_id, "member provisioned");
        Ok(())
    }
}

#[async_trait]
impl<I, P> ProvisionMember for ProvisioningService<I, P>
where
    I: IdentityService,
    P: ProfileStore,
{
    async fn provision(&self, draft: &MemberDraft) -> Result<(), ProvisionError> {
        self.run(draft).await
    }
}
