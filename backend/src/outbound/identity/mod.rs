//! HTTP adapter for the identity service port.

mod dto;
mod http_client;

pub use http_client::IdentityHttpClient;
