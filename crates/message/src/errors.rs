//! Error types shared by every crate in the workspace.
//!
//! [`HttpError`] is the single error type crossing the [`crate::HttpAdapter`]
//! and [`crate::MessageFactory`] ports. Adapters report their own failures
//! through it and the delegating client passes them through unchanged.
//!
//! [`DiscoveryError`] covers the registry failing to produce an implementation
//! of a [`Capability`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed error used as the source of adapter-reported failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// A pluggable capability the discovery registry can supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Something that transmits requests ([`crate::HttpAdapter`]).
    Adapter,
    /// Something that builds requests ([`crate::MessageFactory`]).
    MessageFactory,
}

impl Capability {
    /// Returns the registry key for this capability.
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Adapter => "adapter",
            Capability::MessageFactory => "message_factory",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Adapter => write!(f, "HTTP adapter"),
            Capability::MessageFactory => write!(f, "message factory"),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// The discovery registry could not supply an implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// Nothing usable is registered for the capability.
    ///
    /// Produced when the registry is empty for the capability, or when every
    /// registered candidate failed to construct.
    #[error("no {capability} could be discovered")]
    NotFound {
        /// The capability that was requested.
        capability: Capability,
    },

    /// The configuration pins a candidate name that was never registered.
    #[error("{capability} '{name}' is not registered")]
    UnknownCandidate {
        /// The capability that was requested.
        capability: Capability,
        /// The configured candidate name.
        name: String,
    },

    /// The configured candidate exists but its constructor failed.
    #[error("{capability} '{name}' is unavailable: {reason}")]
    Unavailable {
        /// The capability that was requested.
        capability: Capability,
        /// The configured candidate name.
        name: String,
        /// Display form of the constructor's error.
        reason: String,
    },
}

impl DiscoveryError {
    /// Returns the capability this failure relates to.
    pub fn capability(&self) -> Capability {
        match self {
            DiscoveryError::NotFound { capability }
            | DiscoveryError::UnknownCandidate { capability, .. }
            | DiscoveryError::Unavailable { capability, .. } => *capability,
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP errors
// ---------------------------------------------------------------------------

/// Errors raised while building or sending requests.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The caller passed arguments that cannot be used together.
    ///
    /// Produced by: the delegating client when a stream body is combined with
    /// file uploads.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected combination.
        message: String,
    },

    /// No adapter or message factory could be discovered.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The method, URI, or a header could not form a valid request.
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] http::Error),

    /// The adapter failed to transmit a request or read its response.
    #[error("transport error: {message}")]
    Transport {
        /// Human-readable description of the failure.
        message: String,
        /// The adapter's underlying error, if any.
        #[source]
        source: Option<BoxError>,
    },
}

impl HttpError {
    /// Creates an [`HttpError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        HttpError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an [`HttpError::Transport`] without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        HttpError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an [`HttpError::Transport`] wrapping the adapter's own error.
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        HttpError::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}
