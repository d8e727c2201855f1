//! Wire-level message definitions for the member form session.
//!
//! The form state machine is transformed into these payloads before being
//! serialised to JSON; the client renders exactly one message at a time
//! from the latest status frame.

use serde::{Deserialize, Serialize};

use crate::domain::{DraftField, MemberForm, SubmissionStatus};

/// Inbound payloads accepted from the client.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FormClientMessage {
    /// Overwrite one draft field.
    Edit { field: DraftField, value: String },
    /// Submit the current draft.
    Submit,
}

/// Submission status as exposed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusDto {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Outbound frames sent to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FormServerMessage {
    /// Status frame emitted after every state change.
    Status {
        status: StatusDto,
        /// Failing phase (`identity`, `profile` or `unexpected`), present
        /// only on failure.
        #[serde(skip_serializing_if = "Option::is_none")]
        phase: Option<&'static str>,
        /// The single user-visible message for this status.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// A submit was refused because a required field is missing; the form
    /// state is unchanged and no workflow was started.
    Invalid { field: DraftField, message: String },
}

impl FormServerMessage {
    /// Build the rejection frame for a submit with a missing required field.
    pub fn invalid(field: DraftField, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }

    /// Build the status frame for the form's current state.
    pub fn from_form(form: &MemberForm) -> Self {
        let (status, phase) = match form.status() {
            SubmissionStatus::Idle => (StatusDto::Idle, None),
            SubmissionStatus::Submitting => (StatusDto::Submitting, None),
            SubmissionStatus::Succeeded => (StatusDto::Succeeded, None),
            SubmissionStatus::Failed(detail) => (StatusDto::Failed, Some(detail.phase())),
        };
        Self::Status {
            status,
            phase,
            message: form.status_message(),
        }
    }
}
