//! Errors raised while decoding an upload acknowledgement.

use formpost_model::UploadError;

/// Errors that can occur while decoding acknowledgement XML.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// The document ended where more content was expected.
    #[error("unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// An error parsing a value from XML text content.
    #[error("failed to parse value: {0}")]
    ParseError(String),
}

impl From<XmlError> for UploadError {
    fn from(err: XmlError) -> Self {
        UploadError::MalformedResponse(err.to_string())
    }
}
