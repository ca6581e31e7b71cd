//! Run-time discovery of HTTP adapters and message factories.
//!
//! A [`Discovery`] is an explicit registration table: each capability maps to
//! an ordered list of named constructors. Adapter crates register themselves
//! at startup; consumers ask for "an adapter" without naming one.
//!
//! ```
//! use discovery::{Discovery, DEFAULT_MESSAGE_FACTORY};
//!
//! let discovery = Discovery::with_defaults();
//! assert_eq!(discovery.message_factory_names(), vec![DEFAULT_MESSAGE_FACTORY]);
//! assert!(discovery.find_adapter().is_err());
//! ```
//!
//! The registry is normally injected into whatever needs it. [`global`] and
//! [`install`] provide a process-wide instance for code that cannot take one.

mod config;
mod global;
mod registry;

pub use config::{DiscoveryConfig, ADAPTER_ENV, MESSAGE_FACTORY_ENV};
pub use global::{global, install};
pub use registry::{Discovery, DEFAULT_MESSAGE_FACTORY};
