//! Multipart form data encoding for browser-style bucket uploads.
//!
//! Builds the `multipart/form-data` body the storage service's POST endpoint
//! expects: the pre-signed policy fields verbatim, the success status and
//! content type fields, and the file payload as the **last** part (the
//! service ignores fields after it).

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

use formpost_model::{UploadFile, UploadPolicy};

/// Name of the field instructing the service which status to answer with.
pub const SUCCESS_ACTION_STATUS_FIELD: &str = "success_action_status";

/// The status requested on success; the dispatcher treats anything else as a
/// failed upload.
pub const SUCCESS_STATUS: u16 = 201;

/// Name of the file part.
pub const FILE_FIELD: &str = "file";

/// File data is split into chunks of this size so progress advances at a
/// useful granularity while streaming.
const FILE_CHUNK_SIZE: usize = 64 * 1024;

/// An encoded multipart body, framed into chunks ready for streaming.
#[derive(Debug)]
pub struct MultipartBody {
    boundary: String,
    chunks: Vec<Bytes>,
    len: u64,
}

impl MultipartBody {
    /// The boundary separating the parts.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Total body length in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the body is empty (never the case for an encoded upload).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Consume the body, yielding its chunks in wire order.
    #[must_use]
    pub fn into_chunks(self) -> Vec<Bytes> {
        self.chunks
    }

    /// The body as one contiguous buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(usize::try_from(self.len).unwrap_or(0));
        for chunk in &self.chunks {
            buf.put_slice(chunk);
        }
        buf.freeze()
    }
}

/// Encode one upload: policy fields, `success_action_status`, the file's
/// `Content-Type`, and the file part last.
#[must_use]
pub fn encode_upload(policy: &UploadPolicy, file: &UploadFile) -> MultipartBody {
    let boundary = format!("formpost-{}", Uuid::new_v4().simple());
    let mut chunks = Vec::new();

    for (name, value) in policy.fields() {
        chunks.push(text_part(&boundary, name, value));
    }
    chunks.push(text_part(
        &boundary,
        SUCCESS_ACTION_STATUS_FIELD,
        &SUCCESS_STATUS.to_string(),
    ));
    chunks.push(text_part(
        &boundary,
        "Content-Type",
        &file.content_type_field(),
    ));

    // File part header, then the data in streaming-sized chunks.
    let mut header = BytesMut::new();
    header.put_slice(format!("--{boundary}\r\n").as_bytes());
    header.put_slice(
        format!(
            "Content-Disposition: form-data; name=\"{FILE_FIELD}\"; filename=\"{}\"\r\n",
            escape_disposition_param(file.name())
        )
        .as_bytes(),
    );
    if let Some(content_type) = file.content_type() {
        header.put_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
    }
    header.put_slice(b"\r\n");
    chunks.push(header.freeze());

    let data = file.data();
    let mut offset = 0;
    while offset < data.len() {
        let end = usize::min(offset + FILE_CHUNK_SIZE, data.len());
        chunks.push(data.slice(offset..end));
        offset = end;
    }

    chunks.push(Bytes::from(format!("\r\n--{boundary}--\r\n")));

    let len = chunks.iter().map(|c| c.len() as u64).sum();
    MultipartBody {
        boundary,
        chunks,
        len,
    }
}

/// Frame one text field as a complete multipart part.
fn text_part(boundary: &str, name: &str, value: &str) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_slice(format!("--{boundary}\r\n").as_bytes());
    buf.put_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
            escape_disposition_param(name)
        )
        .as_bytes(),
    );
    buf.put_slice(value.as_bytes());
    buf.put_slice(b"\r\n");
    buf.freeze()
}

/// Escape a `Content-Disposition` parameter the way browsers serialize form
/// data: CR, LF, and double quotes are percent-escaped.
fn escape_disposition_param(value: &str) -> String {
    value
        .replace('\r', "%0D")
        .replace('\n', "%0A")
        .replace('"', "%22")
}
