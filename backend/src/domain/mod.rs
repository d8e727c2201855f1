//! Domain core: draft model, form state machine, and provisioning workflow.
//!
//! Public surface:
//! - [`MemberDraft`] / [`DraftField`] — operator-entered submission data.
//! - [`MemberForm`] / [`SubmissionStatus`] — the form state holder.
//! - [`ProvisioningService`] — the two-step provisioning workflow.
//! - [`ProvisionError`] — failure detail naming the failing phase.
//! - [`ports`] — traits at the boundary to the external collaborators.

pub mod draft;
pub mod form;
pub mod ports;
pub mod provisioning;

pub use self::draft::{DraftField, MemberDraft};
pub use self::form::{MemberForm, SubmissionStatus};
pub use self::ports::ProvisionError;
pub use self::provisioning::ProvisioningService;
