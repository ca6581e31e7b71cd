//! Request bodies and the data callers hand to `send`.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream of body chunks.
pub type BodyStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + 'static>>;

/// Files to upload, keyed by form field name.
pub type Files = BTreeMap<String, PathBuf>;

/// A request built by a [`crate::MessageFactory`].
pub type Request = http::Request<Body>;

/// The body of a [`Request`].
///
/// Stream bodies are opaque here; reading them is the adapter's job.
#[derive(Default)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// A body held fully in memory.
    Full(Bytes),
    /// A body produced incrementally.
    Stream(BodyStream),
}

impl Body {
    /// Returns `true` for [`Body::Stream`].
    pub fn is_stream(&self) -> bool {
        matches!(self, Body::Stream(_))
    }

    /// Returns `true` if the body is known to be empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Full(bytes) => bytes.is_empty(),
            Body::Stream(_) => false,
        }
    }

    /// Returns the in-memory bytes, or `None` for empty and stream bodies.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Full(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Body::Empty"),
            Body::Full(bytes) => f.debug_tuple("Body::Full").field(bytes).finish(),
            Body::Stream(_) => f.write_str("Body::Stream(..)"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Full(bytes)
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Full(Bytes::from(s))
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Body::Full(Bytes::from_static(s.as_bytes()))
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Body::Full(Bytes::from(v))
    }
}

// ---------------------------------------------------------------------------

/// Body data passed to `send`.
///
/// Defaults to an empty set of form fields.
pub enum RequestData {
    /// Form fields, encoded by the message factory.
    Fields(Vec<(String, String)>),
    /// A raw body.
    Raw(Bytes),
    /// A streamed body. Cannot be combined with file uploads.
    Stream(BodyStream),
}

impl RequestData {
    /// Creates form-field data from any iterator of key/value pairs.
    pub fn fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        RequestData::Fields(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Creates stream data.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        RequestData::Stream(Box::pin(stream))
    }

    /// Returns `true` for [`RequestData::Stream`].
    pub fn is_stream(&self) -> bool {
        matches!(self, RequestData::Stream(_))
    }
}

impl Default for RequestData {
    fn default() -> Self {
        RequestData::Fields(Vec::new())
    }
}

impl fmt::Debug for RequestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestData::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            RequestData::Raw(bytes) => f.debug_tuple("Raw").field(bytes).finish(),
            RequestData::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Bytes> for RequestData {
    fn from(bytes: Bytes) -> Self {
        RequestData::Raw(bytes)
    }
}

impl From<String> for RequestData {
    fn from(s: String) -> Self {
        RequestData::Raw(Bytes::from(s))
    }
}

impl From<&'static str> for RequestData {
    fn from(s: &'static str) -> Self {
        RequestData::Raw(Bytes::from_static(s.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[test]
    fn default_request_data_is_empty_fields() {
        assert!(matches!(RequestData::default(), RequestData::Fields(f) if f.is_empty()));
    }

    #[test]
    fn only_stream_data_reports_stream() {
        let chunks = stream::iter(vec![Ok(Bytes::from_static(b"chunk"))]);
        assert!(RequestData::stream(chunks).is_stream());
        assert!(!RequestData::from("raw").is_stream());
        assert!(!RequestData::fields([("a", "b")]).is_stream());
    }

    #[test]
    fn body_emptiness() {
        assert!(Body::Empty.is_empty());
        assert!(Body::from(Vec::new()).is_empty());
        assert!(!Body::from("x").is_empty());
        assert_eq!(Body::from("x").as_bytes(), Some(&Bytes::from_static(b"x")));
    }
}
