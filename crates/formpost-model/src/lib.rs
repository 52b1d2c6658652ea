//! Core data types for formpost: forms, file-bearing controls, upload
//! policies, and the errors shared across the workspace.
//!
//! This crate is pure data — no I/O. The other formpost crates build on it:
//! `formpost-xml` decodes storage acknowledgements into [`ObjectKey`]s,
//! `formpost-http` turns [`UploadFile`]s and [`UploadPolicy`]s into outbound
//! requests, and `formpost-core` drives the submission gate over a [`Form`].

mod error;
mod file;
mod form;
mod policy;
mod types;

pub use error::UploadError;
pub use file::UploadFile;
pub use form::{
    FileControl, Form, FormField, SYNTHETIC_VALUE_MARKER, Submitter, ValidityState,
};
pub use policy::{FIELD_ATTRIBUTE_PREFIX, URL_ATTRIBUTE, UploadPolicy};
pub use types::ObjectKey;
