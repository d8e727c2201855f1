//! Reqwest-backed identity service adapter.
//!
//! This adapter owns transport details only: request serialisation, bearer
//! authentication, timeout and HTTP error mapping, and JSON decoding into
//! the domain identity type.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use zeroize::Zeroizing;

use super::dto::{CreatedIdentityDto, NewIdentityDto, extract_error_message};
use crate::domain::ports::{
    IdentityService, IdentityServiceError, MemberId, NewIdentity, ProvisionedIdentity,
};

/// Identity service adapter that performs HTTP POST requests against one
/// admin endpoint.
pub struct IdentityHttpClient {
    client: Client,
    endpoint: Url,
    service_key: Zeroizing<String>,
}

impl IdentityHttpClient {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout. The service key authorises admin-level identity creation and
    /// is held zeroed-on-drop.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        service_key: Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            service_key,
        })
    }
}

#[async_trait]
impl IdentityService for IdentityHttpClient {
    async fn create(
        &self,
        request: &NewIdentity,
    ) -> Result<ProvisionedIdentity, IdentityServiceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.service_key.as_str())
            .json(&NewIdentityDto::from_request(request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_created_identity(body.as_ref())
    }
}

fn parse_created_identity(body: &[u8]) -> Result<ProvisionedIdentity, IdentityServiceError> {
    let decoded: CreatedIdentityDto = serde_json::from_slice(body).map_err(|error| {
        IdentityServiceError::transport(format!("invalid identity service payload: {error}"))
    })?;
    let member_id = MemberId::new(decoded.id).map_err(|_| {
        IdentityServiceError::transport("identity service returned an empty id")
    })?;
    Ok(ProvisionedIdentity { member_id })
}

fn map_transport_error(error: reqwest::Error) -> IdentityServiceError {
    IdentityServiceError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityServiceError {
    let message = extract_error_message(body)
        .unwrap_or_else(|| format!("identity service returned status {}", status.as_u16()));
    if status.is_client_error() {
        IdentityServiceError::rejected(message)
    } else {
        IdentityServiceError::transport(message)
    }
}
