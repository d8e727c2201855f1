//! Reqwest-backed profile store adapter.
//!
//! Translates a domain [`ProfileRecord`] into the store's snake_case row
//! representation and maps HTTP failures onto the port error taxonomy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{ProfileRecord, ProfileStore, ProfileStoreError};

/// Profile store adapter that inserts rows over one HTTP endpoint.
pub struct ProfileHttpStore {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

impl ProfileHttpStore {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl ProfileStore for ProfileHttpStore {
    async fn insert(&self, record: &ProfileRecord) -> Result<(), ProfileStoreError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(&ProfileRowDto::from_record(record))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

/// Row shape expected by the profile store insert endpoint.
#[derive(Debug, Serialize)]
struct ProfileRowDto<'a> {
    id: &'a str,
    display_name: &'a str,
    email: &'a str,
    bio: &'a str,
    is_admin: bool,
    is_approved: bool,
}

impl<'a> ProfileRowDto<'a> {
    fn from_record(record: &'a ProfileRecord) -> Self {
        Self {
            id: record.id.as_str(),
            display_name: &record.display_name,
            email: &record.email,
            bio: &record.bio,
            is_admin: record.is_admin(),
            is_approved: record.is_approved(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StoreErrorDto {
    #[serde(alias = "msg", alias = "details")]
    message: Option<String>,
}

fn map_transport_error(error: reqwest::Error) -> ProfileStoreError {
    ProfileStoreError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ProfileStoreError {
    let upstream = serde_json::from_slice::<StoreErrorDto>(body)
        .ok()
        .and_then(|decoded| decoded.message)
        .filter(|message| !message.trim().is_empty());
    let message = upstream
        .unwrap_or_else(|| format!("profile store returned status {}", status.as_u16()));
    if status.is_client_error() {
        ProfileStoreError::rejected(message)
    } else {
        ProfileStoreError::transport(message)
    }
}
