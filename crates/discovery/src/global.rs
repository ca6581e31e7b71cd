//! Process-wide registry.
//!
//! Applications that cannot thread a [`Discovery`] through their call graph
//! install one at startup. If nothing is installed, the first call to
//! [`global`] builds [`Discovery::with_defaults`] configured from the
//! environment and keeps it for the rest of the process.

use std::sync::{Arc, OnceLock};

use crate::config::DiscoveryConfig;
use crate::registry::Discovery;

static GLOBAL_DISCOVERY: OnceLock<Arc<Discovery>> = OnceLock::new();

/// Installs the process-wide registry. Call once at application startup.
///
/// Returns the rejected registry if one was already installed or already
/// built by [`global`].
pub fn install(discovery: Discovery) -> Result<(), Arc<Discovery>> {
    GLOBAL_DISCOVERY.set(Arc::new(discovery)).inspect(|()| {
        tracing::debug!("installed process-wide discovery registry");
    })
}

/// Returns the process-wide registry.
pub fn global() -> Arc<Discovery> {
    Arc::clone(GLOBAL_DISCOVERY.get_or_init(|| {
        let config = DiscoveryConfig::from_env();
        tracing::debug!(?config, "building default discovery registry");
        Arc::new(Discovery::with_defaults().with_config(config))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_is_built_once_and_cannot_be_replaced() {
        let first = global();
        let second = global();
        assert!(Arc::ptr_eq(&first, &second));

        let rejected = install(Discovery::new()).expect_err("registry already built");
        assert!(rejected.adapter_names().is_empty());
        assert!(Arc::ptr_eq(&global(), &first));
    }
}
