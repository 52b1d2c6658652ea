//! The form model: regular fields, file-bearing controls, and the hidden
//! fields the submission gate appends once uploads settle.

use crate::error::UploadError;
use crate::file::UploadFile;
use crate::policy::{URL_ATTRIBUTE, UploadPolicy};
use crate::types::ObjectKey;

/// Name of the marker field signalling that a control's value was synthesized
/// from uploaded object keys rather than carried inline.
///
/// The consuming middleware looks this field up by name, so it is part of the
/// wire contract.
pub const SYNTHETIC_VALUE_MARKER: &str = "s3file";

/// One name/value pair of the submission payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: String,
}

impl FormField {
    /// Create a field.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The constraint-validation surface of a control.
///
/// Mirrors the custom-validity portion of the platform API: a custom message
/// marks the control invalid, an empty message clears it, and reporting
/// records that the message was surfaced to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidityState {
    custom_message: Option<String>,
    reported: bool,
}

impl ValidityState {
    /// Set the custom validity message. An empty message clears it.
    pub fn set_custom_validity(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.custom_message = if message.is_empty() {
            None
        } else {
            Some(message)
        };
        self.reported = false;
    }

    /// Surface the current validity to the user. Returns whether the control
    /// is valid.
    pub fn report_validity(&mut self) -> bool {
        self.reported = true;
        self.is_valid()
    }

    /// Whether the control currently has no custom error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.custom_message.is_none()
    }

    /// The custom validity message, if any.
    #[must_use]
    pub fn custom_message(&self) -> Option<&str> {
        self.custom_message.as_deref()
    }

    /// Whether the validity has been reported since it last changed.
    #[must_use]
    pub fn was_reported(&self) -> bool {
        self.reported
    }
}

/// The name/value identity of the button that triggered a submission attempt.
///
/// A programmatic resubmission does not carry the clicked button, so the gate
/// preserves this pair as a hidden field before releasing the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitter {
    /// Button name.
    pub name: String,
    /// Button value.
    pub value: String,
}

impl Submitter {
    /// Create a submitter identity.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The hidden field carrying this identity, or `None` for an anonymous
    /// button.
    #[must_use]
    pub fn as_field(&self) -> Option<FormField> {
        if self.name.is_empty() {
            None
        } else {
            Some(FormField::new(self.name.clone(), self.value.clone()))
        }
    }
}

/// A file-bearing control: destination, policy fields, selected files, and
/// the keys collected for them.
#[derive(Debug, Clone)]
pub struct FileControl {
    name: String,
    destination_url: String,
    policy: UploadPolicy,
    files: Vec<UploadFile>,
    keys: Vec<ObjectKey>,
    validity: ValidityState,
}

impl FileControl {
    /// Create a control pointed at a destination URL.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        destination_url: impl Into<String>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            destination_url: destination_url.into(),
            policy,
            files: Vec::new(),
            keys: Vec::new(),
            validity: ValidityState::default(),
        }
    }

    /// Build a control from its attribute list: `data-url` is the destination
    /// and `data-fields-*` attributes become policy fields.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::MissingDestination`] when no `data-url`
    /// attribute is present.
    pub fn from_attributes<'a>(
        name: impl Into<String>,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)> + Clone,
    ) -> Result<Self, UploadError> {
        let name = name.into();
        let destination_url = attrs
            .clone()
            .into_iter()
            .find(|(n, _)| *n == URL_ATTRIBUTE)
            .map(|(_, v)| v.to_owned())
            .ok_or(UploadError::MissingDestination {
                control: name.clone(),
            })?;
        let policy = UploadPolicy::from_attributes(attrs);
        Ok(Self::new(name, destination_url, policy))
    }

    /// Control name; hidden key fields are named after it.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where uploads for this control are POSTed.
    #[must_use]
    pub fn destination_url(&self) -> &str {
        &self.destination_url
    }

    /// The pre-signed policy fields attached to each upload.
    #[must_use]
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Replace the file selection.
    ///
    /// Keys collected for a previous selection are discarded and any custom
    /// validity is cleared, matching the behavior of re-picking files in the
    /// original widget.
    pub fn set_files(&mut self, files: Vec<UploadFile>) {
        self.files = files;
        self.keys.clear();
        self.validity.set_custom_validity("");
    }

    /// The currently selected files.
    #[must_use]
    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    /// Whether any files are selected.
    #[must_use]
    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Keys collected for the current selection.
    #[must_use]
    pub fn keys(&self) -> &[ObjectKey] {
        &self.keys
    }

    /// Record the keys collected for the current selection.
    pub fn set_keys(&mut self, keys: Vec<ObjectKey>) {
        self.keys = keys;
    }

    /// The control's validity state.
    #[must_use]
    pub fn validity(&self) -> &ValidityState {
        &self.validity
    }

    /// Mutable access to the validity state.
    pub fn validity_mut(&mut self) -> &mut ValidityState {
        &mut self.validity
    }
}

/// A form: ordered regular fields, file-bearing controls, and the hidden
/// fields appended by the submission gate.
#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<FormField>,
    controls: Vec<FileControl>,
    hidden: Vec<FormField>,
}

impl Form {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a regular field.
    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(FormField::new(name, value));
    }

    /// Attach a file-bearing control.
    pub fn push_control(&mut self, control: FileControl) {
        self.controls.push(control);
    }

    /// The file-bearing controls.
    #[must_use]
    pub fn controls(&self) -> &[FileControl] {
        &self.controls
    }

    /// Mutable access to the controls.
    pub fn controls_mut(&mut self) -> &mut [FileControl] {
        &mut self.controls
    }

    /// Append a hidden field derived by the gate.
    pub fn append_hidden(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.hidden.push(FormField::new(name, value));
    }

    /// The hidden fields appended so far.
    #[must_use]
    pub fn hidden_fields(&self) -> &[FormField] {
        &self.hidden
    }

    /// Drop all appended hidden fields, returning the form to its
    /// pre-augmentation shape.
    pub fn clear_hidden(&mut self) {
        self.hidden.clear();
    }

    /// The final submission payload: regular fields in declaration order,
    /// then the appended hidden fields.
    ///
    /// File controls contribute no native value; their uploads are
    /// represented by the hidden key fields.
    #[must_use]
    pub fn submission_fields(&self) -> Vec<FormField> {
        self.fields.iter().chain(self.hidden.iter()).cloned().collect()
    }

    /// Whether every control passes constraint validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.controls.iter().all(|c| c.validity().is_valid())
    }
}
