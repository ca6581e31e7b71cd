//! Auto-discovering HTTP client.
//!
//! [`Client`] presents one stable entry point for sending HTTP requests while
//! leaving the choice of transport ([`message::HttpAdapter`]) and request
//! construction ([`message::MessageFactory`]) to a [`discovery::Discovery`]
//! registry. It adds no protocol handling, retries, or error translation of
//! its own: requests and errors pass through unchanged.
//!
//! ## Architectural Layer
//!
//! **Delegation.** The client itself implements [`message::HttpAdapter`], so it
//! can stand in anywhere a concrete adapter is expected.

mod client;

pub use client::Client;
