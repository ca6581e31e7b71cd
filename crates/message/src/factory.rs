//! The request-building port and its default implementation.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use url::form_urlencoded;

use crate::body::{Body, Request, RequestData};
use crate::errors::HttpError;
use crate::options::ProtocolVersion;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Builds requests for the delegating client.
pub trait MessageFactory: Send + Sync {
    /// Builds a request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::MalformedRequest`] if the method, URI, or a header
    /// is invalid. Implementations may return other variants for their own
    /// failures.
    fn create_request(
        &self,
        method: &str,
        uri: &str,
        protocol_version: ProtocolVersion,
        headers: &[(String, String)],
        data: RequestData,
    ) -> Result<Request, HttpError>;
}

/// [`MessageFactory`] built on the `http` crate.
///
/// Form fields are urlencoded; a form content type is added unless the
/// caller already supplied a `content-type` header. Raw and stream data are
/// used as the body unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpMessageFactory;

impl HttpMessageFactory {
    /// Creates the factory.
    pub fn new() -> Self {
        Self
    }
}

impl MessageFactory for HttpMessageFactory {
    fn create_request(
        &self,
        method: &str,
        uri: &str,
        protocol_version: ProtocolVersion,
        headers: &[(String, String)],
        data: RequestData,
    ) -> Result<Request, HttpError> {
        let mut builder = http::Request::builder()
            .method(method)
            .uri(uri)
            .version(protocol_version.as_version());

        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = match data {
            RequestData::Fields(fields) if fields.is_empty() => Body::Empty,
            RequestData::Fields(fields) => {
                let has_content_type = headers
                    .iter()
                    .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
                if !has_content_type {
                    builder = builder.header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
                }
                Body::Full(encode_fields(&fields))
            }
            RequestData::Raw(bytes) => Body::Full(bytes),
            RequestData::Stream(stream) => Body::Stream(stream),
        };

        let request = builder.body(body)?;
        tracing::trace!(
            method = %request.method(),
            uri = %request.uri(),
            version = %protocol_version,
            "built request"
        );
        Ok(request)
    }
}

fn encode_fields(fields: &[(String, String)]) -> Bytes {
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();
    Bytes::from(encoded)
}
