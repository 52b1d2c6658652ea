//! In-memory representation of a file selected for upload.

use bytes::Bytes;
use mime::Mime;

/// A file queued for upload: filename, optional media type, and content.
///
/// Exists only for the duration of one upload request; nothing is persisted.
#[derive(Debug, Clone)]
pub struct UploadFile {
    name: String,
    content_type: Option<Mime>,
    data: Bytes,
}

impl UploadFile {
    /// Create a file from a name and its content.
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    /// Attach a media type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: Mime) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// The filename as selected by the user.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The media type, if known.
    #[must_use]
    pub fn content_type(&self) -> Option<&Mime> {
        self.content_type.as_ref()
    }

    /// The value sent in the `Content-Type` policy field: the media type's
    /// string form, or empty when unknown.
    #[must_use]
    pub fn content_type_field(&self) -> String {
        self.content_type
            .as_ref()
            .map(Mime::to_string)
            .unwrap_or_default()
    }

    /// The file content.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Content length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
