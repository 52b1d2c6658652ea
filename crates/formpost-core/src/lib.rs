//! The formpost submission gate.
//!
//! This crate orchestrates one submission attempt: it dispatches every file
//! of every file-bearing control through a [`FileUploader`], awaits the full
//! set, attaches validation failures to the controls that caused them, and —
//! when everything settled cleanly — augments the form with the derived
//! hidden fields and releases the submission.
//!
//! The [`FileUploader`] trait is the seam between orchestration and
//! transport; `formpost-http` provides the production implementation.

mod gate;
mod uploader;

pub use gate::{GateError, GateState, SubmissionGate, SubmitOutcome};
pub use uploader::{FileUploader, UploadRequest};
