//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend
//! only on the domain port and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::ProvisionMember;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub provisioning: Arc<dyn ProvisionMember>,
}

impl HttpState {
    /// Construct state from an explicit port implementation.
    pub fn new(provisioning: Arc<dyn ProvisionMember>) -> Self {
        Self { provisioning }
    }
}
