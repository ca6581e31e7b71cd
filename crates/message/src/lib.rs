//! Ports and message types for pluggable HTTP adapters.
//!
//! This crate defines *what* an HTTP adapter and a request factory must do;
//! concrete transports live elsewhere and are located at run time through the
//! `discovery` crate.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`adapter`] | [`HttpAdapter`], the request-sending port |
//! | [`factory`] | [`MessageFactory`] and the default [`HttpMessageFactory`] |
//! | [`body`] | [`Request`], [`Body`], [`RequestData`], [`Files`] |
//! | [`response`] | [`HttpResponse`] and the boxed [`Response`] |
//! | [`parameterable`] | [`Parameterable`] and [`ParameterableResponse`] |
//! | [`options`] | [`Options`] and [`ProtocolVersion`] |
//! | [`errors`] | [`HttpError`], [`DiscoveryError`], [`Capability`] |

pub mod adapter;
pub mod body;
pub mod errors;
pub mod factory;
pub mod options;
pub mod parameterable;
pub mod response;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use adapter::HttpAdapter;
pub use body::{Body, BodyStream, Files, Request, RequestData};
pub use errors::{BoxError, Capability, DiscoveryError, HttpError};
pub use factory::{HttpMessageFactory, MessageFactory};
pub use options::{Options, ParseProtocolVersionError, ProtocolVersion};
pub use parameterable::{Parameterable, ParameterableResponse, Params};
pub use response::{HttpResponse, Response};

pub use bytes::Bytes;
pub use http;
