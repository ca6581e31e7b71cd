//! Discovery configuration.

use serde::{Deserialize, Serialize};

/// Environment variable naming the adapter candidate to use.
pub const ADAPTER_ENV: &str = "HTTP_DISCOVERY_ADAPTER";

/// Environment variable naming the message factory candidate to use.
pub const MESSAGE_FACTORY_ENV: &str = "HTTP_DISCOVERY_MESSAGE_FACTORY";

/// Pins discovery to named candidates.
///
/// With a field left `None`, every registered candidate is tried in
/// registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Name of the adapter candidate to use.
    #[serde(default)]
    pub adapter: Option<String>,

    /// Name of the message factory candidate to use.
    #[serde(default)]
    pub message_factory: Option<String>,
}

impl DiscoveryConfig {
    /// Reads [`ADAPTER_ENV`] and [`MESSAGE_FACTORY_ENV`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Self {
            adapter: read(ADAPTER_ENV),
            message_factory: read(MESSAGE_FACTORY_ENV),
        }
    }
}
