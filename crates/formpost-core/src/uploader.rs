//! The seam between the submission gate and the upload transport.

use std::future::Future;
use std::pin::Pin;

use formpost_model::{ObjectKey, UploadError, UploadFile, UploadPolicy};

/// Everything needed to upload one file: where to send it, the pre-signed
/// policy fields to attach, and the file itself.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// The storage service endpoint the multipart POST goes to.
    pub destination_url: String,
    /// Policy fields forwarded verbatim with the file.
    pub policy: UploadPolicy,
    /// The file to upload.
    pub file: UploadFile,
}

/// Trait that the upload transport must implement.
///
/// This is the boundary between the submission gate and the network layer.
/// `formpost-http` implements it over a reqwest client; tests implement it
/// with stubs to drive the gate deterministically.
///
/// # Object Safety
///
/// The trait uses `async-trait`-style boxing so the gate can also be driven
/// through `Arc<dyn FileUploader>` where dynamic dispatch is preferred.
pub trait FileUploader: Send + Sync + 'static {
    /// Upload one file and return the object key assigned by the storage
    /// service.
    fn upload(
        &self,
        request: UploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ObjectKey, UploadError>> + Send>>;
}
