//! The response contract every adapter returns.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};

use crate::parameterable::Params;

/// A response returned by an adapter.
pub type Response = Box<dyn HttpResponse>;

/// Read access to an HTTP response.
///
/// Implemented for [`http::Response<Bytes>`] and by decorators such as
/// [`crate::ParameterableResponse`].
pub trait HttpResponse: fmt::Debug + Send + Sync {
    /// Status code.
    fn status(&self) -> StatusCode;

    /// Reason phrase. Defaults to the canonical phrase for the status code.
    fn reason_phrase(&self) -> &str {
        self.status().canonical_reason().unwrap_or("")
    }

    /// Protocol version.
    fn version(&self) -> Version;

    /// Response headers.
    fn headers(&self) -> &HeaderMap;

    /// Response body.
    fn body(&self) -> &Bytes;

    /// Out-of-band parameters attached by the adapter, if this response
    /// carries any.
    fn parameters(&self) -> Option<&Params> {
        None
    }
}

impl HttpResponse for http::Response<Bytes> {
    fn status(&self) -> StatusCode {
        http::Response::status(self)
    }

    fn version(&self) -> Version {
        http::Response::version(self)
    }

    fn headers(&self) -> &HeaderMap {
        http::Response::headers(self)
    }

    fn body(&self) -> &Bytes {
        http::Response::body(self)
    }
}

impl<T: HttpResponse + ?Sized> HttpResponse for Box<T> {
    fn status(&self) -> StatusCode {
        (**self).status()
    }

    fn reason_phrase(&self) -> &str {
        (**self).reason_phrase()
    }

    fn version(&self) -> Version {
        (**self).version()
    }

    fn headers(&self) -> &HeaderMap {
        (**self).headers()
    }

    fn body(&self) -> &Bytes {
        (**self).body()
    }

    fn parameters(&self) -> Option<&Params> {
        (**self).parameters()
    }
}

impl<T: HttpResponse + ?Sized> HttpResponse for Arc<T> {
    fn status(&self) -> StatusCode {
        (**self).status()
    }

    fn reason_phrase(&self) -> &str {
        (**self).reason_phrase()
    }

    fn version(&self) -> Version {
        (**self).version()
    }

    fn headers(&self) -> &HeaderMap {
        (**self).headers()
    }

    fn body(&self) -> &Bytes {
        (**self).body()
    }

    fn parameters(&self) -> Option<&Params> {
        (**self).parameters()
    }
}
