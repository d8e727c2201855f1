//! Wire representations for the identity service API.

use serde::{Deserialize, Serialize};

use crate::domain::ports::NewIdentity;

/// Request body for the identity creation endpoint.
#[derive(Debug, Serialize)]
pub(super) struct NewIdentityDto<'a> {
    pub email: &'a str,
    pub password: &'a str,
    /// Marks the address as verified at creation; operator-entered addresses
    /// skip the confirmation email.
    pub email_confirm: bool,
}

impl<'a> NewIdentityDto<'a> {
    pub fn from_request(request: &'a NewIdentity) -> Self {
        Self {
            email: &request.email,
            password: &request.password,
            email_confirm: request.email_pre_verified,
        }
    }
}

/// Successful creation response; only the identifier is consumed.
#[derive(Debug, Deserialize)]
pub(super) struct CreatedIdentityDto {
    #[serde(default)]
    pub id: String,
}

/// Error body shape; upstream services vary in which key carries the text.
#[derive(Debug, Deserialize)]
pub(super) struct UpstreamErrorDto {
    #[serde(alias = "msg", alias = "error_description")]
    pub message: Option<String>,
}

/// Pull a human-readable message out of an upstream error body, if any.
pub(super) fn extract_error_message(body: &[u8]) -> Option<String> {
    let decoded: UpstreamErrorDto = serde_json::from_slice(body).ok()?;
    decoded
        .message
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialises_request_with_confirm_flag() {
        let request = NewIdentity {
            email: "new@example.com".to_owned(),
            password: "hunter2hunter2".to_owned(),
            email_pre_verified: true,
        };
        let value =
            serde_json::to_value(NewIdentityDto::from_request(&request)).expect("serialises");
        assert_eq!(
            value,
            json!({
                "email": "new@example.com",
                "password": "hunter2hunter2",
                "email_confirm": true
            })
        );
    }

    #[test]
    fn extracts_message_from_message_key() {
        let message = extract_error_message(br#"{"message": "Email already in use"}"#);
        assert_eq!(message.as_deref(), Some("Email already in use"));
    }

    #[test]
    fn extracts_message_from_alias_keys() {
        let message = extract_error_message(br#"{"msg": "duplicate email"}"#);
        assert_eq!(message.as_deref(), Some("duplicate email"));
        let message = extract_error_message(br#"{"error_description": "weak password"}"#);
        assert_eq!(message.as_deref(), Some("weak password"));
    }

    #[test]
    fn ignores_blank_or_unparsable_bodies() {
        assert!(extract_error_message(br#"{"message": "  "}"#).is_none());
        assert!(extract_error_message(b"<html>bad gateway</html>").is_none());
        assert!(extract_error_message(b"").is_none());
    }
}
