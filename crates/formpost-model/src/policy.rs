//! Pre-signed upload policies and the attribute contract they are read from.

/// Attribute carrying the destination URL of a file-bearing control.
pub const URL_ATTRIBUTE: &str = "data-url";

/// Prefix marking an attribute as an upload policy field.
///
/// `data-fields-policy="..."` becomes the policy field `policy`, and so on;
/// the mapping is 1:1 with the prefix stripped.
pub const FIELD_ATTRIBUTE_PREFIX: &str = "data-fields-";

/// An opaque, ordered set of pre-signed authorization fields.
///
/// The host supplies these (policy document, signature, credential, key
/// template, ...) and they are attached verbatim to each outgoing upload
/// request. Order is preserved: the fields appear on the wire in the order
/// they were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPolicy {
    fields: Vec<(String, String)>,
}

impl UploadPolicy {
    /// Create an empty policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect policy fields from a control's attribute list.
    ///
    /// Attributes whose name starts with [`FIELD_ATTRIBUTE_PREFIX`] map to
    /// fields with the prefix stripped; everything else is ignored.
    #[must_use]
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let fields = attrs
            .into_iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(FIELD_ATTRIBUTE_PREFIX)
                    .map(|field| (field.to_owned(), value.to_owned()))
            })
            .collect();
        Self { fields }
    }

    /// Append a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Iterate the fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the policy has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
