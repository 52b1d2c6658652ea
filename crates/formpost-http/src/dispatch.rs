//! The upload dispatcher: one multipart POST per file.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http::header::CONTENT_TYPE;
use tracing::{debug, warn};

use formpost_core::{FileUploader, UploadRequest};
use formpost_model::{ObjectKey, UploadError, UploadFile, UploadPolicy};
use formpost_xml::decode_object_key;

use crate::multipart::encode_upload;
use crate::progress::{ProgressObserver, ProgressTracker};

/// Sends encoded uploads to the storage service and decodes the
/// acknowledgements.
///
/// Wraps a shared [`reqwest::Client`]; cloning is cheap and clones share the
/// connection pool. The client carries no request timeout — a stalled upload
/// stalls the submission gate, by contract.
#[derive(Clone, Default)]
pub struct UploadDispatcher {
    client: reqwest::Client,
    observer: Option<ProgressObserver>,
}

impl std::fmt::Debug for UploadDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadDispatcher")
            .field("client", &self.client)
            .field("observer", &self.observer.as_ref().map(|_| "..."))
            .finish()
    }
}

impl UploadDispatcher {
    /// Create a dispatcher with its own client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher over an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            observer: None,
        }
    }

    /// Attach a progress observer, notified per upload as body chunks are
    /// handed to the transport.
    #[must_use]
    pub fn with_progress_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Upload one file with the given policy fields attached.
    ///
    /// # Errors
    ///
    /// - [`UploadError::Transport`] when the request never completes;
    /// - [`UploadError::UnexpectedStatus`] for any status other than 201;
    /// - [`UploadError::MalformedResponse`] when the acknowledgement body
    ///   cannot be decoded.
    pub async fn upload_file(
        &self,
        destination_url: &str,
        policy: &UploadPolicy,
        file: &UploadFile,
    ) -> Result<ObjectKey, UploadError> {
        let body = encode_upload(policy, file);
        let content_type = body.content_type();
        let total = body.len();

        debug!(
            url = destination_url,
            filename = file.name(),
            bytes = total,
            "dispatching upload"
        );

        let request = self.client.post(destination_url).header(CONTENT_TYPE, content_type);
        let request = match &self.observer {
            Some(observer) => {
                let tracker = ProgressTracker::new(total).with_observer(Arc::clone(observer));
                let stream = futures::stream::iter(body.into_chunks().into_iter().map(
                    move |chunk| {
                        tracker.record(chunk.len() as u64);
                        Ok::<Bytes, Infallible>(chunk)
                    },
                ));
                request.body(reqwest::Body::wrap_stream(stream))
            }
            None => request.body(body.to_bytes()),
        };

        let response = request.send().await.map_err(UploadError::transport)?;
        let status = response.status();
        if status != StatusCode::CREATED {
            warn!(
                url = destination_url,
                filename = file.name(),
                status = status.as_u16(),
                "upload rejected"
            );
            return Err(UploadError::unexpected_status(status));
        }

        let ack = response.bytes().await.map_err(UploadError::transport)?;
        let key = decode_object_key(&ack)?;
        debug!(filename = file.name(), key = %key, "upload acknowledged");
        Ok(key)
    }
}

impl FileUploader for UploadDispatcher {
    fn upload(
        &self,
        request: UploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ObjectKey, UploadError>> + Send>> {
        let dispatcher = self.clone();
        Box::pin(async move {
            dispatcher
                .upload_file(&request.destination_url, &request.policy, &request.file)
                .await
        })
    }
}
