//! Form state holder for the member provisioning workflow.
//!
//! One [`MemberForm`] exists per active form session. It owns the draft and
//! the submission lifecycle status; nothing else may write to either. The
//! workflow always operates on a snapshot of the draft taken at submit
//! time, so edits made while a submission is in flight never leak into it.

use crate::domain::draft::{DraftField, MemberDraft};
use crate::domain::ports::{ProvisionError, ProvisionMember};

/// Submission lifecycle of one form instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Draft editable, submit enabled.
    Idle,
    /// A submission is in flight; further submits are ignored.
    Submitting,
    /// The last submission provisioned the member; the draft was cleared.
    Succeeded,
    /// The last submission failed; the draft is preserved for correction.
    Failed(ProvisionError),
}

/// Mutable state behind the provisioning form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberForm {
    draft: MemberDraft,
    status: SubmissionStatus,
}

impl Default for MemberForm {
    fn default() -> Self {
        Self {
            draft: MemberDraft::default(),
            status: SubmissionStatus::Idle,
        }
    }
}

impl MemberForm {
    /// Create an empty, idle form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current draft contents.
    pub fn draft(&self) -> &MemberDraft {
        &self.draft
    }

    /// Current submission status.
    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Overwrite one draft field.
    ///
    /// Allowed in any state. Editing from a terminal state returns the form
    /// to [`SubmissionStatus::Idle`], clearing the surfaced message; an
    /// in-flight submission is unaffected because it holds a snapshot.
    pub fn update_field(&mut self, field: DraftField, value: impl Into<String>) {
        if matches!(
            self.status,
            SubmissionStatus::Succeeded | SubmissionStatus::Failed(_)
        ) {
            self.status = SubmissionStatus::Idle;
        }
        self.draft.set(field, value);
    }

    /// Enter [`SubmissionStatus::Submitting`] and return a draft snapshot.
    ///
    /// Returns `None` when a submission is already in flight; this is the
    /// duplicate-submission guard and the only mutual exclusion the form
    /// requires.
    pub fn try_begin_submission(&mut self) -> Option<MemberDraft> {
        if matches!(self.status, SubmissionStatus::Submitting) {
            return None;
        }
        self.status = SubmissionStatus::Submitting;
        Some(self.draft.clone())
    }

    /// Apply the workflow outcome of the in-flight submission.
    ///
    /// Success clears the draft as a single update; any failure preserves
    /// it verbatim so the operator can correct and resubmit.
    pub fn complete_submission(&mut self, outcome: Result<(), ProvisionError>) {
        match outcome {
            Ok(()) => {
                self.draft.clear();
                self.status = SubmissionStatus::Succeeded;
            }
            Err(detail) => {
                self.status = SubmissionStatus::Failed(detail);
            }
        }
    }

    /// Run one submission against the workflow.
    ///
    /// A no-op while a submission is already in flight.
    pub async fn submit<W>(&mut self, workflow: &W)
    where
        W: ProvisionMember + ?Sized,
    {
        let Some(snapshot) = self.try_begin_submission() else {
            return;
        };
        let outcome = workflow.provision(&snapshot).await;
        self.complete_submission(outcome);
    }

    /// The single user-visible message for the current status.
    ///
    /// Failure messages are prefixed with the failing phase so the operator
    /// can judge whether an orphaned identity may exist.
    pub fn status_message(&self) -> Option<String> {
        match &self.status {
            SubmissionStatus::Idle | SubmissionStatus::Submitting => None,
            SubmissionStatus::Succeeded => {
                Some("Member account created successfully.".to_owned())
            }
            SubmissionStatus::Failed(ProvisionError::IdentityCreation { message }) => {
                Some(format!("Identity error: {message}"))
            }
            SubmissionStatus::Failed(ProvisionError::ProfileInsert { message }) => {
                Some(format!("Profile error: {message}"))
            }
            SubmissionStatus::Failed(ProvisionError::Unexpected { message }) => {
                Some(format!("Unexpected error: {message}"))
            }
        }
    }
}
