//! Shared fakes for the client integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use message::http::{StatusCode, Version};
use message::{
    Bytes, HttpAdapter, HttpError, HttpMessageFactory, MessageFactory, Options, Parameterable,
    ParameterableResponse, ProtocolVersion, Request, RequestData, Response,
};

/// Installs a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// What a [`RecordingAdapter`] saw for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub method: String,
    pub uri: String,
    pub version: Version,
    pub body: Option<Bytes>,
    pub streamed: bool,
    pub options: Options,
}

/// Adapter that records every request and answers `200 OK`.
///
/// Responses are decorated with an `adapter` parameter and the request URI.
#[derive(Default)]
pub struct RecordingAdapter {
    seen: Mutex<Vec<Seen>>,
    single_calls: AtomicUsize,
    batch_calls: AtomicUsize,
    fail_with: Option<String>,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// An adapter whose every send fails with a transport error.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().expect("seen lock").clone()
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn respond(&self, request: Request, options: &Options) -> Result<Response, HttpError> {
        if let Some(message) = &self.fail_with {
            return Err(HttpError::transport(message.clone()));
        }

        let uri = request.uri().to_string();
        self.seen.lock().expect("seen lock").push(Seen {
            method: request.method().to_string(),
            uri: uri.clone(),
            version: request.version(),
            body: request.body().as_bytes().cloned(),
            streamed: request.body().is_stream(),
            options: options.clone(),
        });

        let response = message::http::Response::builder()
            .status(StatusCode::OK)
            .version(request.version())
            .body(Bytes::from_static(b"ok"))
            .map_err(HttpError::from)?;

        Ok(Box::new(
            ParameterableResponse::new(response)
                .with_param("adapter", "recording")
                .with_param("uri", uri),
        ))
    }
}

#[async_trait]
impl HttpAdapter for RecordingAdapter {
    async fn send_request(
        &self,
        request: Request,
        options: &Options,
    ) -> Result<Response, HttpError> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(request, options)
    }

    async fn send_requests(
        &self,
        requests: Vec<Request>,
        options: &Options,
    ) -> Result<Vec<Response>, HttpError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        requests
            .into_iter()
            .map(|request| self.respond(request, options))
            .collect()
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Message factory that counts calls and delegates to [`HttpMessageFactory`].
#[derive(Default)]
pub struct CountingFactory {
    calls: AtomicUsize,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MessageFactory for CountingFactory {
    fn create_request(
        &self,
        method: &str,
        uri: &str,
        protocol_version: ProtocolVersion,
        headers: &[(String, String)],
        data: RequestData,
    ) -> Result<Request, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        HttpMessageFactory.create_request(method, uri, protocol_version, headers, data)
    }
}

/// Builds a GET request for batch tests.
pub fn get_request(uri: &str) -> Request {
    message::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(message::Body::Empty)
        .expect("valid test request")
}

/// Shared call counter for registry constructors.
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
