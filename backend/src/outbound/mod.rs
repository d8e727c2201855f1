//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod identity;
pub mod profiles;

pub use identity::IdentityHttpClient;
pub use profiles::ProfileHttpStore;
