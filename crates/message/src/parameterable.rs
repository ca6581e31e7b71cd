//! The parameterable capability and the response decorator implementing it.
//!
//! Adapters use [`ParameterableResponse`] to attach out-of-band metadata
//! (timings, the redirect chain, the effective URI) to a response without
//! changing the [`HttpResponse`] contract. Parameter updates follow the
//! immutable-message convention: [`Parameterable::with_param`] returns a new
//! value and leaves the receiver untouched.

use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};
use serde_json::{Map, Value};

use crate::response::HttpResponse;

/// The parameter bag: string keys to arbitrary JSON values.
pub type Params = Map<String, Value>;

/// A message carrying an auxiliary parameter bag.
pub trait Parameterable: Sized {
    /// Returns every parameter.
    fn params(&self) -> &Params;

    /// Returns the parameter stored under `key`.
    fn param(&self, key: &str) -> Option<&Value>;

    /// Returns a copy of `self` with `key` set to `value`.
    #[must_use]
    fn with_param(&self, key: impl Into<String>, value: impl Into<Value>) -> Self;

    /// Returns the parameter stored under `key`, or `default` when absent.
    fn param_or(&self, key: &str, default: Value) -> Value {
        self.param(key).cloned().unwrap_or(default)
    }
}

/// A response decorated with a parameter bag.
///
/// The wrapped response is shared, so `with_param` is cheap and never copies
/// the body.
#[derive(Debug)]
pub struct ParameterableResponse<R: ?Sized = dyn HttpResponse> {
    params: Params,
    response: Arc<R>,
}

impl<R: HttpResponse> ParameterableResponse<R> {
    /// Wraps `response` with an empty parameter bag.
    pub fn new(response: R) -> Self {
        Self::with_params(response, Params::new())
    }

    /// Wraps `response` with an initial parameter bag.
    pub fn with_params(response: R, params: Params) -> Self {
        Self {
            params,
            response: Arc::new(response),
        }
    }
}

impl<R: HttpResponse + ?Sized> ParameterableResponse<R> {
    /// Wraps an already shared response.
    pub fn from_shared(response: Arc<R>, params: Params) -> Self {
        Self { params, response }
    }

    /// Returns the wrapped response.
    pub fn inner(&self) -> &R {
        &self.response
    }

    /// Consumes the decorator, returning the shared response and the bag.
    pub fn into_parts(self) -> (Arc<R>, Params) {
        (self.response, self.params)
    }
}

impl<R: HttpResponse + ?Sized> Clone for ParameterableResponse<R> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            response: Arc::clone(&self.response),
        }
    }
}

impl<R: HttpResponse + ?Sized> Parameterable for ParameterableResponse<R> {
    fn params(&self) -> &Params {
        &self.params
    }

    fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    fn with_param(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.params.insert(key.into(), value.into());
        next
    }
}

impl<R: HttpResponse + ?Sized> HttpResponse for ParameterableResponse<R> {
    fn status(&self) -> StatusCode {
        self.response.status()
    }

    fn reason_phrase(&self) -> &str {
        self.response.reason_phrase()
    }

    fn version(&self) -> Version {
        self.response.version()
    }

    fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    fn body(&self) -> &Bytes {
        self.response.body()
    }

    fn parameters(&self) -> Option<&Params> {
        Some(&self.params)
    }
}
