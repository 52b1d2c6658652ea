//! Decoding of the `PostResponse` acknowledgement document.

use percent_encoding::percent_decode_str;
use quick_xml::Reader;
use quick_xml::events::Event;

use formpost_model::ObjectKey;

use crate::error::XmlError;

/// The storage service's acknowledgement of a browser-style POST upload.
///
/// `key` holds the element text verbatim (percent-escaped);
/// [`object_key`](Self::object_key) yields the decoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostResponse {
    /// Full URL of the stored object, if reported.
    pub location: Option<String>,
    /// Bucket that accepted the upload, if reported.
    pub bucket: Option<String>,
    /// The assigned object key, percent-escaped as received.
    pub key: String,
    /// Entity tag of the stored object, if reported.
    pub etag: Option<String>,
}

impl PostResponse {
    /// Decode an acknowledgement body.
    ///
    /// The `Key` element is located anywhere in the document, matching how
    /// the acknowledgement is consumed in the wild; sibling elements are
    /// captured when present and ignored otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if the body is not well-formed XML, contains no
    /// elements, or lacks a `Key` element.
    pub fn from_xml(xml: &[u8]) -> Result<Self, XmlError> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut location = None;
        let mut bucket = None;
        let mut key = None;
        let mut etag = None;
        let mut saw_element = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    saw_element = true;
                    let name = e.name();
                    let tag = std::str::from_utf8(name.as_ref())
                        .map_err(|e| XmlError::ParseError(e.to_string()))?;
                    match tag {
                        "Location" => location = Some(read_text_content(&mut reader)?),
                        "Bucket" => bucket = Some(read_text_content(&mut reader)?),
                        "Key" => key = Some(read_text_content(&mut reader)?),
                        "ETag" => etag = Some(read_text_content(&mut reader)?),
                        // Descend into unknown wrappers; their children are
                        // inspected in turn.
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_element {
            return Err(XmlError::MissingElement("root element".to_owned()));
        }

        let key = key.ok_or_else(|| XmlError::MissingElement("Key".to_owned()))?;
        Ok(Self {
            location,
            bucket,
            key,
            etag,
        })
    }

    /// The assigned object key, percent-decoded
    /// (`tmp%2Fx%20y.jpg` → `tmp/x y.jpg`).
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::ParseError`] if the decoded bytes are not valid
    /// UTF-8.
    pub fn object_key(&self) -> Result<ObjectKey, XmlError> {
        let decoded = percent_decode_str(&self.key)
            .decode_utf8()
            .map_err(|e| XmlError::ParseError(format!("invalid key encoding: {e}")))?;
        Ok(ObjectKey::new(decoded))
    }
}

/// Decode an acknowledgement body straight to the object key.
///
/// # Errors
///
/// Propagates any [`XmlError`] from parsing or key decoding.
pub fn decode_object_key(xml: &[u8]) -> Result<ObjectKey, XmlError> {
    PostResponse::from_xml(xml)?.object_key()
}

/// Read the text content of the current element and consume its end tag.
///
/// Expects the reader to be positioned right after a `Start` event. Entity
/// references in the text are unescaped.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::End(_) => {
                return Ok(text);
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while reading text content".to_owned(),
                ));
            }
            _ => {}
        }
    }
}
