//! HTTP adapter for the profile store port.

mod http_store;

pub use http_store::ProfileHttpStore;
