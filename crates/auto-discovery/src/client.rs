//! The discovery-backed delegating client.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use discovery::Discovery;
use message::{
    Capability, DiscoveryError, Files, HttpAdapter, HttpError, MessageFactory, Options, Request,
    RequestData, Response,
};

/// An [`HttpAdapter`] that forwards to an adapter located through discovery.
///
/// The adapter and the message factory are either injected or discovered on
/// first use. A discovered value is cached for the life of the client; a
/// setter replaces whatever is cached. Discovery happens under a write lock,
/// so concurrent first use discovers once.
///
/// ```no_run
/// # async fn demo() -> Result<(), message::HttpError> {
/// use auto_discovery::Client;
/// use message::{Files, HttpResponse, Options, RequestData};
///
/// let client = Client::new();
/// let response = client
///     .send("GET", "http://example.com", &[], RequestData::default(), &Files::new(), &Options::new())
///     .await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
pub struct Client {
    discovery: Arc<Discovery>,
    adapter: RwLock<Option<Arc<dyn HttpAdapter>>>,
    message_factory: RwLock<Option<Arc<dyn MessageFactory>>>,
}

impl Client {
    /// Name reported by [`HttpAdapter::name`].
    pub const NAME: &'static str = "auto-discovery-adapter";

    /// Creates a client resolving from the process-wide registry.
    pub fn new() -> Self {
        Self::with_discovery(discovery::global())
    }

    /// Creates a client resolving from `discovery`.
    pub fn with_discovery(discovery: Arc<Discovery>) -> Self {
        Self {
            discovery,
            adapter: RwLock::new(None),
            message_factory: RwLock::new(None),
        }
    }

    /// Injects the adapter at construction time.
    pub fn with_adapter(mut self, adapter: Arc<dyn HttpAdapter>) -> Self {
        *self
            .adapter
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = Some(adapter);
        self
    }

    /// Injects the message factory at construction time.
    pub fn with_message_factory(mut self, factory: Arc<dyn MessageFactory>) -> Self {
        *self
            .message_factory
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = Some(factory);
        self
    }

    /// Returns the registry this client discovers from.
    pub fn discovery(&self) -> &Arc<Discovery> {
        &self.discovery
    }

    /// Returns the adapter, discovering and caching it on first use.
    ///
    /// # Errors
    ///
    /// [`HttpError::Discovery`] if nothing was injected and discovery fails.
    /// A failed discovery is not cached; the next call tries again.
    pub fn adapter(&self) -> Result<Arc<dyn HttpAdapter>, HttpError> {
        resolve(&self.adapter, Capability::Adapter, || {
            self.discovery.find_adapter()
        })
    }

    /// Returns the message factory, discovering and caching it on first use.
    ///
    /// # Errors
    ///
    /// As for [`Client::adapter`].
    pub fn message_factory(&self) -> Result<Arc<dyn MessageFactory>, HttpError> {
        resolve(&self.message_factory, Capability::MessageFactory, || {
            self.discovery.find_message_factory()
        })
    }

    /// Replaces the adapter, discovered or not.
    pub fn set_adapter(&self, adapter: Arc<dyn HttpAdapter>) -> &Self {
        tracing::debug!(adapter = adapter.name(), "adapter set explicitly");
        *self.adapter.write().unwrap_or_else(PoisonError::into_inner) = Some(adapter);
        self
    }

    /// Replaces the message factory, discovered or not.
    pub fn set_message_factory(&self, factory: Arc<dyn MessageFactory>) -> &Self {
        tracing::debug!("message factory set explicitly");
        *self
            .message_factory
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(factory);
        self
    }

    /// Builds a request and sends it.
    ///
    /// The request uses `options.protocol_version`, defaulting to HTTP/1.1.
    /// `files` only takes part in argument validation; the message factory
    /// contract has no file parameter.
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidArgument`] if `data` is a stream and `files` is
    /// not empty; nothing is resolved, built, or sent in that case. Otherwise
    /// any discovery, factory, or adapter error, unchanged.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        headers: &[(String, String)],
        data: RequestData,
        files: &Files,
        options: &Options,
    ) -> Result<Response, HttpError> {
        if data.is_stream() && !files.is_empty() {
            return Err(HttpError::invalid_argument(
                "a stream body and files cannot be sent together",
            ));
        }

        let request = self.message_factory()?.create_request(
            method,
            uri,
            options.protocol_version_or_default(),
            headers,
            data,
        )?;

        self.send_request(request, options).await
    }

    /// Sends a `GET` request.
    pub async fn get(
        &self,
        uri: &str,
        headers: &[(String, String)],
        options: &Options,
    ) -> Result<Response, HttpError> {
        self.send_without_body("GET", uri, headers, options).await
    }

    /// Sends a `HEAD` request.
    pub async fn head(
        &self,
        uri: &str,
        headers: &[(String, String)],
        options: &Options,
    ) -> Result<Response, HttpError> {
        self.send_without_body("HEAD", uri, headers, options).await
    }

    /// Sends a `DELETE` request.
    pub async fn delete(
        &self,
        uri: &str,
        headers: &[(String, String)],
        options: &Options,
    ) -> Result<Response, HttpError> {
        self.send_without_body("DELETE", uri, headers, options).await
    }

    /// Sends an `OPTIONS` request.
    pub async fn options(
        &self,
        uri: &str,
        headers: &[(String, String)],
        options: &Options,
    ) -> Result<Response, HttpError> {
        self.send_without_body("OPTIONS", uri, headers, options).await
    }

    /// Sends a `TRACE` request.
    pub async fn trace(
        &self,
        uri: &str,
        headers: &[(String, String)],
        options: &Options,
    ) -> Result<Response, HttpError> {
        self.send_without_body("TRACE", uri, headers, options).await
    }

    /// Sends a `POST` request.
    pub async fn post(
        &self,
        uri: &str,
        headers: &[(String, String)],
        data: RequestData,
        files: &Files,
        options: &Options,
    ) -> Result<Response, HttpError> {
        self.send("POST", uri, headers, data, files, options).await
    }

    /// Sends a `PUT` request.
    pub async fn put(
        &self,
        uri: &str,
        headers: &[(String, String)],
        data: RequestData,
        files: &Files,
        options: &Options,
    ) -> Result<Response, HttpError> {
        self.send("PUT", uri, headers, data, files, options).await
    }

    /// Sends a `PATCH` request.
    pub async fn patch(
        &self,
        uri: &str,
        headers: &[(String, String)],
        data: RequestData,
        files: &Files,
        options: &Options,
    ) -> Result<Response, HttpError> {
        self.send("PATCH", uri, headers, data, files, options).await
    }

    async fn send_without_body(
        &self,
        method: &str,
        uri: &str,
        headers: &[(String, String)],
        options: &Options,
    ) -> Result<Response, HttpError> {
        self.send(
            method,
            uri,
            headers,
            RequestData::default(),
            &Files::new(),
            options,
        )
        .await
    }
}

/// Returns the cached value, or discovers and caches one.
///
/// The second check under the write lock keeps concurrent first callers from
/// discovering twice.
fn resolve<T: ?Sized>(
    slot: &RwLock<Option<Arc<T>>>,
    capability: Capability,
    discover: impl FnOnce() -> Result<Arc<T>, DiscoveryError>,
) -> Result<Arc<T>, HttpError> {
    if let Some(cached) = slot.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
        return Ok(Arc::clone(cached));
    }

    let mut slot = slot.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(cached) = slot.as_ref() {
        return Ok(Arc::clone(cached));
    }

    let found = discover()?;
    tracing::debug!(capability = capability.as_str(), "discovered and cached");
    *slot = Some(Arc::clone(&found));
    Ok(found)
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let adapter = self
            .adapter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|a| a.name().to_string());
        let has_factory = self
            .message_factory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        f.debug_struct("Client")
            .field("adapter", &adapter)
            .field("message_factory_resolved", &has_factory)
            .field("discovery", &self.discovery)
            .finish()
    }
}

#[async_trait]
impl HttpAdapter for Client {
    async fn send_request(
        &self,
        request: Request,
        options: &Options,
    ) -> Result<Response, HttpError> {
        let adapter = self.adapter()?;
        tracing::trace!(
            adapter = adapter.name(),
            method = %request.method(),
            uri = %request.uri(),
            "forwarding request"
        );
        adapter.send_request(request, options).await
    }

    async fn send_requests(
        &self,
        requests: Vec<Request>,
        options: &Options,
    ) -> Result<Vec<Response>, HttpError> {
        let adapter = self.adapter()?;
        tracing::trace!(
            adapter = adapter.name(),
            count = requests.len(),
            "forwarding batch"
        );
        adapter.send_requests(requests, options).await
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}
