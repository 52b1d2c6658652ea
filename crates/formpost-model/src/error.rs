//! Error types shared across the formpost crates.

/// Errors produced while uploading a single file to the storage service.
///
/// Failures are local to the file (and therefore to its control); the
/// submission gate still awaits sibling uploads when one of these occurs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UploadError {
    /// The storage service answered with something other than HTTP 201.
    #[error("upload rejected with HTTP {status}: {reason}")]
    UnexpectedStatus {
        /// The HTTP status code returned by the service.
        status: u16,
        /// The status text for that code.
        reason: String,
    },

    /// The request never completed (connection refused, reset, DNS, ...).
    #[error("{message}")]
    Transport {
        /// The stringified transport error.
        message: String,
    },

    /// The acknowledgement body could not be decoded.
    #[error("malformed upload acknowledgement: {0}")]
    MalformedResponse(String),

    /// A control declared no destination URL attribute.
    #[error("control {control:?} has no destination URL attribute")]
    MissingDestination {
        /// Name of the offending control.
        control: String,
    },
}

impl UploadError {
    /// Build an [`UploadError::UnexpectedStatus`] from an HTTP status code.
    #[must_use]
    pub fn unexpected_status(status: http::StatusCode) -> Self {
        Self::UnexpectedStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
        }
    }

    /// Build an [`UploadError::Transport`] from any displayable error.
    #[must_use]
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }

    /// The user-facing string the gate attaches to the failing control's
    /// validity state.
    ///
    /// For a status failure this is exactly the server's status text
    /// (e.g. `Bad Request`); for everything else it is the error's display
    /// form.
    #[must_use]
    pub fn validation_message(&self) -> String {
        match self {
            Self::UnexpectedStatus { reason, .. } => reason.clone(),
            _ => self.to_string(),
        }
    }
}
