//! Runtime configuration loaded via OrthoConfig.
//!
//! Upstream settings are all-or-nothing: either every identity and profile
//! value is present and real HTTP adapters are used, or none is present and
//! deterministic fixtures serve local development. A partial set is a
//! deployment mistake and refuses to start.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Configuration values controlling the console server at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MEMBER_CONSOLE")]
pub struct ConsoleSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Identity service admin endpoint, e.g. `https://id.internal/admin/users`.
    pub identity_endpoint: Option<String>,
    /// Bearer key authorising admin-level identity creation.
    pub identity_service_key: Option<String>,
    /// Profile store insert endpoint, e.g. `https://db.internal/profiles`.
    pub profile_endpoint: Option<String>,
    /// Bearer key for the profile store.
    pub profile_api_key: Option<String>,
    /// Per-request timeout applied to both upstream adapters.
    #[ortho_config(default = 30)]
    pub upstream_timeout_secs: u64,
}

/// Fully validated upstream adapter settings.
#[derive(Debug)]
pub struct UpstreamConfig {
    pub identity_endpoint: Url,
    pub identity_service_key: Zeroizing<String>,
    pub profile_endpoint: Url,
    pub profile_api_key: Zeroizing<String>,
    pub timeout: Duration,
}

impl ConsoleSettings {
    /// Return the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        match self.bind_addr {
            Some(addr) => Ok(addr),
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|error| std::io::Error::other(format!("invalid default bind: {error}"))),
        }
    }

    /// Validate upstream settings into adapter configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when only some upstream values are set, or when an
    /// endpoint fails to parse as a URL.
    pub fn upstream(&self) -> std::io::Result<Option<UpstreamConfig>> {
        let values = [
            ("MEMBER_CONSOLE_IDENTITY_ENDPOINT", &self.identity_endpoint),
            (
                "MEMBER_CONSOLE_IDENTITY_SERVICE_KEY",
                &self.identity_service_key,
            ),
            ("MEMBER_CONSOLE_PROFILE_ENDPOINT", &self.profile_endpoint),
            ("MEMBER_CONSOLE_PROFILE_API_KEY", &self.profile_api_key),
        ];
        if values.iter().all(|(_, value)| value.is_none()) {
            return Ok(None);
        }
        let missing: Vec<&str> = values
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(std::io::Error::other(format!(
                "incomplete upstream configuration; missing {}",
                missing.join(", ")
            )));
        }

        let identity_endpoint = parse_endpoint("identity", self.identity_endpoint.as_deref())?;
        let profile_endpoint = parse_endpoint("profile", self.profile_endpoint.as_deref())?;
        let identity_service_key =
            Zeroizing::new(self.identity_service_key.clone().unwrap_or_default());
        let profile_api_key = Zeroizing::new(self.profile_api_key.clone().unwrap_or_default());

        Ok(Some(UpstreamConfig {
            identity_endpoint,
            identity_service_key,
            profile_endpoint,
            profile_api_key,
            timeout: Duration::from_secs(self.upstream_timeout_secs.max(1)),
        }))
    }
}

fn parse_endpoint(label: &str, value: Option<&str>) -> std::io::Result<Url> {
    let raw = value.unwrap_or_default();
    Url::parse(raw)
        .map_err(|error| std::io::Error::other(format!("invalid {label} endpoint: {error}")))
}
