//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod members;
pub mod state;

pub use error::ApiResult;
