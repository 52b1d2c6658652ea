//! The formpost upload transport: multipart/form-data encoding, bytes-sent
//! accounting, and the reqwest-based dispatcher that POSTs each file to the
//! storage service.
//!
//! The dispatcher implements [`formpost_core::FileUploader`], so the
//! submission gate drives it without knowing anything about HTTP.

mod dispatch;
mod multipart;
mod progress;

pub use dispatch::UploadDispatcher;
pub use multipart::{
    FILE_FIELD, MultipartBody, SUCCESS_ACTION_STATUS_FIELD, SUCCESS_STATUS, encode_upload,
};
pub use progress::{Progress, ProgressObserver, ProgressTracker};
