//! XML decoding of the storage service's upload acknowledgement.
//!
//! A successful browser-style POST upload is acknowledged with HTTP 201 and
//! an XML body:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <PostResponse>
//!   <Location>https://bucket.s3.amazonaws.com/tmp%2Ffile.jpg</Location>
//!   <Bucket>bucket</Bucket>
//!   <Key>tmp/file%20name.jpg</Key>
//!   <ETag>"a38155039ec348f97dfd63da4cb2619d"</ETag>
//! </PostResponse>
//! ```
//!
//! Only the `Key` element is load-bearing: [`PostResponse::object_key`]
//! returns its text percent-decoded. Malformed input is not defended
//! against — decoding failures propagate as [`XmlError`].

mod error;
mod response;

pub use error::XmlError;
pub use response::{PostResponse, decode_object_key};
