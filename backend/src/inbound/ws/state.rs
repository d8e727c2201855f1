//! Shared WebSocket adapter state.
//!
//! The form session depends on the domain port instead of constructing the
//! workflow itself, keeping the adapter testable with deterministic doubles.

use std::sync::Arc;

use crate::domain::ports::ProvisionMember;

/// Dependency bundle for form sessions.
#[derive(Clone)]
pub struct WsState {
    pub provisioning: Arc<dyn ProvisionMember>,
}

impl WsState {
    /// Construct state from an explicit port implementation.
    pub fn new(provisioning: Arc<dyn ProvisionMember>) -> Self {
        Self { provisioning }
    }
}
