//! The submission gate: a per-attempt state machine that delays a form's
//! release until every upload tied to the attempt has settled.

use futures::future;
use tracing::{debug, info, warn};

use formpost_model::{
    Form, FormField, ObjectKey, SYNTHETIC_VALUE_MARKER, Submitter, UploadError,
};

use crate::uploader::{FileUploader, UploadRequest};

/// Gate position within one submission cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// No pending request; a submission attempt may start.
    #[default]
    Idle,
    /// Uploads for the current attempt are in flight.
    Uploading,
    /// All uploads settled; the form is being augmented and released.
    ReadyToSubmit,
}

/// Errors raised by the gate itself (as opposed to upload failures, which
/// surface on the controls).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// A submission attempt was made while another is still in flight.
    #[error("a submission attempt is already in flight")]
    SubmissionInFlight,
}

/// The result of a settled submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every upload succeeded; the augmented payload is released.
    Released(Vec<FormField>),
    /// At least one control failed validation; the form was not released.
    Blocked {
        /// Names of the controls whose uploads failed.
        invalid_controls: Vec<String>,
    },
}

/// Orchestrates one submission attempt at a time.
///
/// The gate intercepts a submission, dispatches every file of every
/// file-bearing control through the given [`FileUploader`], awaits the full
/// set, and only then touches the form: failed controls get their validity
/// message set and reported, successful controls get hidden fields carrying
/// their decoded keys plus a [`SYNTHETIC_VALUE_MARKER`] field, and the
/// submitter button's name/value pair is preserved. Release is strictly
/// ordered after every upload has settled; no ordering is guaranteed between
/// the uploads themselves.
///
/// State is scoped to one attempt and reset each cycle. There is no
/// cancellation or timeout: a stalled upload stalls the gate. If a `submit`
/// future is dropped mid-flight the gate stays [`GateState::Uploading`] and
/// rejects further attempts until [`reset`](Self::reset) is called.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGate {
    state: GateState,
}

impl SubmissionGate {
    /// Create a gate in the idle state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The gate's current position.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Force the gate back to idle, abandoning a cancelled attempt.
    pub fn reset(&mut self) {
        self.state = GateState::Idle;
    }

    /// Run one submission attempt.
    ///
    /// Hidden fields appended by a previous cycle are cleared first. A
    /// control with zero files contributes nothing and never blocks the
    /// attempt. Upload failures are local to their control: siblings are
    /// unaffected and still awaited.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::SubmissionInFlight`] when the gate is not idle;
    /// the in-flight attempt is unaffected.
    pub async fn submit<U: FileUploader>(
        &mut self,
        form: &mut Form,
        submitter: Option<&Submitter>,
        uploader: &U,
    ) -> Result<SubmitOutcome, GateError> {
        if self.state != GateState::Idle {
            return Err(GateError::SubmissionInFlight);
        }
        self.state = GateState::Uploading;
        form.clear_hidden();

        // One entry per file-bearing control; every file of every control is
        // dispatched concurrently and the whole set is awaited together.
        let pending: Vec<_> = form
            .controls()
            .iter()
            .enumerate()
            .filter(|(_, control)| control.has_files())
            .map(|(idx, control)| {
                let uploads: Vec<_> = control
                    .files()
                    .iter()
                    .map(|file| {
                        uploader.upload(UploadRequest {
                            destination_url: control.destination_url().to_owned(),
                            policy: control.policy().clone(),
                            file: file.clone(),
                        })
                    })
                    .collect();
                async move { (idx, future::join_all(uploads).await) }
            })
            .collect();

        debug!(controls = pending.len(), "submission intercepted, uploading");
        let settled = future::join_all(pending).await;
        self.state = GateState::ReadyToSubmit;

        let mut invalid_controls = Vec::new();
        for (idx, results) in settled {
            let control = &mut form.controls_mut()[idx];
            match partition_keys(results) {
                Ok(keys) => {
                    debug!(
                        control = control.name(),
                        keys = keys.len(),
                        "uploads complete"
                    );
                    control.set_keys(keys);
                }
                Err(err) => {
                    warn!(
                        control = control.name(),
                        error = %err,
                        "upload failed, blocking submission"
                    );
                    control
                        .validity_mut()
                        .set_custom_validity(err.validation_message());
                    control.validity_mut().report_validity();
                    invalid_controls.push(control.name().to_owned());
                }
            }
        }

        let outcome = if invalid_controls.is_empty() {
            let derived = derived_fields(form);
            for field in derived {
                form.append_hidden(field.name, field.value);
            }
            if let Some(field) = submitter.and_then(Submitter::as_field) {
                form.append_hidden(field.name, field.value);
            }
            let fields = form.submission_fields();
            info!(fields = fields.len(), "releasing augmented submission");
            SubmitOutcome::Released(fields)
        } else {
            info!(
                invalid = invalid_controls.len(),
                "submission blocked by failed uploads"
            );
            SubmitOutcome::Blocked { invalid_controls }
        };

        self.state = GateState::Idle;
        Ok(outcome)
    }
}

/// Collect the keys of a control's settled uploads, or the first failure.
///
/// Mirrors an await-all over the control's files: one failure invalidates
/// the control and its partial keys are discarded (no rollback of siblings
/// already stored).
fn partition_keys(
    results: Vec<Result<ObjectKey, UploadError>>,
) -> Result<Vec<ObjectKey>, UploadError> {
    results.into_iter().collect()
}

/// The hidden fields derived from the controls' collected keys: one field
/// per key named after its control, then one marker field per control.
fn derived_fields(form: &Form) -> Vec<FormField> {
    let mut fields = Vec::new();
    for control in form.controls() {
        if control.keys().is_empty() {
            continue;
        }
        for key in control.keys() {
            fields.push(FormField::new(control.name(), key.as_str()));
        }
        fields.push(FormField::new(SYNTHETIC_VALUE_MARKER, control.name()));
    }
    fields
}
