//! In-progress member submission data.
//!
//! The draft is owned by [`crate::domain::MemberForm`] and mutated one field
//! at a time. The provisioning workflow only ever sees a snapshot taken at
//! submit time, so concurrent edits never leak into an in-flight submission.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Field identifiers accepted by draft updates.
///
/// Serialised names match the wire contract of the form session
/// (`email`, `password`, `displayName`, `bio`); unknown names are rejected
/// during deserialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Email,
    Password,
    DisplayName,
    Bio,
}

impl DraftField {
    /// Wire-level name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::DisplayName => "displayName",
            Self::Bio => "bio",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-entered, not-yet-submitted member data.
///
/// ## Lifecycle
/// - created empty when a form session starts;
/// - repopulated on every edit;
/// - cleared to empty exactly once, on successful provisioning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDraft {
    pub email: String,
    pub password: String,
    pub display_name: String,
    /// Optional presentation text; defaults to empty.
    pub bio: String,
}

impl MemberDraft {
    /// Overwrite a single field with the provided value.
    ///
    /// Setting a field to the value it already holds leaves the draft
    /// unchanged, so repeated identical edits are idempotent.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Email => self.email = value,
            DraftField::Password => self.password = value,
            DraftField::DisplayName => self.display_name = value,
            DraftField::Bio => self.bio = value,
        }
    }

    /// Reset every field to empty as a single update.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Return the first required field that is missing, if any.
    ///
    /// Presence is the only validation the core performs; `bio` is
    /// optional by contract.
    pub fn missing_required(&self) -> Option<DraftField> {
        if self.email.trim().is_empty() {
            return Some(DraftField::Email);
        }
        if self.password.trim().is_empty() {
            return Some(DraftField::Password);
        }
        if self.display_name.trim().is_empty() {
            return Some(DraftField::DisplayName);
        }
        None
    }
}
