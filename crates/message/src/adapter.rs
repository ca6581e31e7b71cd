//! The request-sending port.

use async_trait::async_trait;

use crate::body::Request;
use crate::errors::HttpError;
use crate::options::Options;
use crate::response::Response;

/// Something that transmits requests and produces responses.
///
/// Implementations own every transport concern: connections, TLS, timeouts,
/// retries, and honouring [`Options`]. Callers treat errors as final.
#[async_trait]
pub trait HttpAdapter: Send + Sync {
    /// Sends one request.
    async fn send_request(&self, request: Request, options: &Options)
        -> Result<Response, HttpError>;

    /// Sends a batch of requests.
    ///
    /// The provided implementation sends them one after another and stops at
    /// the first error. Adapters able to send concurrently should override
    /// it; responses must keep the order of `requests`.
    async fn send_requests(
        &self,
        requests: Vec<Request>,
        options: &Options,
    ) -> Result<Vec<Response>, HttpError> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            responses.push(self.send_request(request, options).await?);
        }
        Ok(responses)
    }

    /// Name identifying this adapter.
    fn name(&self) -> &str;
}
