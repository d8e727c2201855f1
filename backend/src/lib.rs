//! Member console backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;

/// Public OpenAPI surface used by debug builds and tooling.
pub use doc::ApiDoc;
