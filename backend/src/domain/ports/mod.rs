//! Domain ports for the hexagonal boundary.
//!
//! Driven ports ([`IdentityService`], [`ProfileStore`]) describe how the
//! workflow reaches its external collaborators; the driving port
//! ([`ProvisionMember`]) is what inbound adapters call. Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants.

pub(crate) mod identity_service;
pub(crate) mod profile_store;
mod provision_member;

#[cfg(test)]
pub use identity_service::MockIdentityService;
pub use identity_service::{
    EmptyMemberId, FIXTURE_REJECTED_EMAIL, FixtureIdentityService, IdentityService,
    IdentityServiceError, MemberId, NewIdentity, ProvisionedIdentity,
};
#[cfg(test)]
pub use profile_store::MockProfileStore;
pub use profile_store::{FixtureProfileStore, ProfileRecord, ProfileStore, ProfileStoreError};
#[cfg(test)]
pub use provision_member::MockProvisionMember;
pub use provision_member::{FixtureProvisionMember, ProvisionError, ProvisionMember};
