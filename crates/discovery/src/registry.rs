//! The registration table.

use std::fmt;
use std::sync::Arc;

use message::{Capability, DiscoveryError, HttpAdapter, HttpMessageFactory, MessageFactory};

use crate::config::DiscoveryConfig;

/// Name under which [`Discovery::with_defaults`] registers [`HttpMessageFactory`].
pub const DEFAULT_MESSAGE_FACTORY: &str = "http";

type Constructor<T> = Arc<dyn Fn() -> Result<Arc<T>, String> + Send + Sync>;

struct Candidate<T: ?Sized> {
    name: String,
    construct: Constructor<T>,
}

/// Ordered candidates for one capability.
struct Candidates<T: ?Sized> {
    capability: Capability,
    entries: Vec<Candidate<T>>,
}

impl<T: ?Sized> Candidates<T> {
    fn new(capability: Capability) -> Self {
        Self {
            capability,
            entries: Vec::new(),
        }
    }

    /// Registering an existing name replaces its constructor in place.
    fn register(&mut self, name: String, construct: Constructor<T>) {
        match self.entries.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.construct = construct,
            None => self.entries.push(Candidate { name, construct }),
        }
    }

    fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|c| c.name.as_str()).collect()
    }

    fn find(&self, preferred: Option<&str>) -> Result<Arc<T>, DiscoveryError> {
        let capability = self.capability;

        if let Some(name) = preferred {
            let candidate = self
                .entries
                .iter()
                .find(|c| c.name == name)
                .ok_or_else(|| DiscoveryError::UnknownCandidate {
                    capability,
                    name: name.to_string(),
                })?;
            return (candidate.construct)().map_err(|reason| {
                tracing::warn!(capability = capability.as_str(), candidate = name, %reason, "configured candidate failed");
                DiscoveryError::Unavailable {
                    capability,
                    name: name.to_string(),
                    reason,
                }
            });
        }

        for candidate in &self.entries {
            match (candidate.construct)() {
                Ok(found) => {
                    tracing::debug!(
                        capability = capability.as_str(),
                        candidate = %candidate.name,
                        "discovered"
                    );
                    return Ok(found);
                }
                Err(reason) => {
                    tracing::warn!(
                        capability = capability.as_str(),
                        candidate = %candidate.name,
                        %reason,
                        "candidate unavailable, trying next"
                    );
                }
            }
        }

        tracing::debug!(
            capability = capability.as_str(),
            tried = self.entries.len(),
            "nothing discovered"
        );
        Err(DiscoveryError::NotFound { capability })
    }
}

/// Registry of HTTP adapter and message factory constructors.
///
/// Candidates are tried in registration order and the first one whose
/// constructor succeeds is returned. A [`DiscoveryConfig`] can pin each
/// capability to a single named candidate.
///
/// Every `find_*` call runs a constructor; callers cache the result.
pub struct Discovery {
    adapters: Candidates<dyn HttpAdapter>,
    message_factories: Candidates<dyn MessageFactory>,
    config: DiscoveryConfig,
}

impl Discovery {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            adapters: Candidates::new(Capability::Adapter),
            message_factories: Candidates::new(Capability::MessageFactory),
            config: DiscoveryConfig::default(),
        }
    }

    /// Creates a registry with the built-in message factory registered as
    /// [`DEFAULT_MESSAGE_FACTORY`]. No adapter is built in.
    pub fn with_defaults() -> Self {
        let mut discovery = Self::new();
        discovery.register_message_factory(DEFAULT_MESSAGE_FACTORY, || {
            Ok::<_, std::convert::Infallible>(HttpMessageFactory::new())
        });
        discovery
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Registers an adapter constructor.
    ///
    /// A constructor returning `Err` marks the candidate as unavailable (for
    /// example because its backend is not usable on this host).
    pub fn register_adapter<A, E, F>(&mut self, name: impl Into<String>, construct: F) -> &mut Self
    where
        A: HttpAdapter + 'static,
        E: fmt::Display,
        F: Fn() -> Result<A, E> + Send + Sync + 'static,
    {
        self.adapters.register(
            name.into(),
            Arc::new(move || {
                construct()
                    .map(|adapter| Arc::new(adapter) as Arc<dyn HttpAdapter>)
                    .map_err(|e| e.to_string())
            }),
        );
        self
    }

    /// Registers an already built adapter; every lookup returns the same instance.
    pub fn register_adapter_instance(
        &mut self,
        name: impl Into<String>,
        adapter: Arc<dyn HttpAdapter>,
    ) -> &mut Self {
        self.adapters
            .register(name.into(), Arc::new(move || Ok(Arc::clone(&adapter))));
        self
    }

    /// Registers a message factory constructor.
    pub fn register_message_factory<M, E, F>(
        &mut self,
        name: impl Into<String>,
        construct: F,
    ) -> &mut Self
    where
        M: MessageFactory + 'static,
        E: fmt::Display,
        F: Fn() -> Result<M, E> + Send + Sync + 'static,
    {
        self.message_factories.register(
            name.into(),
            Arc::new(move || {
                construct()
                    .map(|factory| Arc::new(factory) as Arc<dyn MessageFactory>)
                    .map_err(|e| e.to_string())
            }),
        );
        self
    }

    /// Registers an already built message factory.
    pub fn register_message_factory_instance(
        &mut self,
        name: impl Into<String>,
        factory: Arc<dyn MessageFactory>,
    ) -> &mut Self {
        self.message_factories
            .register(name.into(), Arc::new(move || Ok(Arc::clone(&factory))));
        self
    }

    /// Finds an adapter.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::NotFound`] when no candidate could be constructed;
    /// [`DiscoveryError::UnknownCandidate`] or [`DiscoveryError::Unavailable`]
    /// when the configured candidate is missing or fails.
    pub fn find_adapter(&self) -> Result<Arc<dyn HttpAdapter>, DiscoveryError> {
        self.adapters.find(self.config.adapter.as_deref())
    }

    /// Finds a message factory. Errors as for [`Discovery::find_adapter`].
    pub fn find_message_factory(&self) -> Result<Arc<dyn MessageFactory>, DiscoveryError> {
        self.message_factories
            .find(self.config.message_factory.as_deref())
    }

    /// Names of the registered adapters, in lookup order.
    pub fn adapter_names(&self) -> Vec<&str> {
        self.adapters.names()
    }

    /// Names of the registered message factories, in lookup order.
    pub fn message_factory_names(&self) -> Vec<&str> {
        self.message_factories.names()
    }
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discovery")
            .field("adapters", &self.adapter_names())
            .field("message_factories", &self.message_factory_names())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use message::{HttpError, Options, Request, Response};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NamedAdapter(&'static str);

    #[async_trait]
    impl HttpAdapter for NamedAdapter {
        async fn send_request(
            &self,
            _request: Request,
            _options: &Options,
        ) -> Result<Response, HttpError> {
            Err(HttpError::transport("not a real transport"))
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    fn ok(name: &'static str) -> impl Fn() -> Result<NamedAdapter, String> + Send + Sync {
        move || Ok(NamedAdapter(name))
    }

    fn unavailable() -> Result<NamedAdapter, String> {
        Err("backend missing".to_string())
    }

    #[test]
    fn empty_registry_reports_not_found() {
        let discovery = Discovery::new();
        assert_eq!(
            discovery.find_adapter().err(),
            Some(DiscoveryError::NotFound {
                capability: Capability::Adapter
            })
        );
        assert_eq!(
            discovery.find_message_factory().err(),
            Some(DiscoveryError::NotFound {
                capability: Capability::MessageFactory
            })
        );
    }

    #[test]
    fn defaults_provide_a_message_factory_only() {
        let discovery = Discovery::with_defaults();
        assert_eq!(discovery.message_factory_names(), vec![DEFAULT_MESSAGE_FACTORY]);
        assert!(discovery.find_message_factory().is_ok());
        assert!(discovery.adapter_names().is_empty());
        assert!(discovery.find_adapter().is_err());
    }

    #[test]
    fn first_constructible_candidate_wins() {
        let mut discovery = Discovery::new();
        discovery
            .register_adapter("broken", unavailable)
            .register_adapter("first", ok("first"))
            .register_adapter("second", ok("second"));

        let adapter = discovery.find_adapter().expect("an adapter should be found");
        assert_eq!(adapter.name(), "first");
        assert_eq!(discovery.adapter_names(), vec!["broken", "first", "second"]);
    }

    #[test]
    fn all_candidates_failing_is_not_found() {
        let mut discovery = Discovery::new();
        discovery.register_adapter("broken", unavailable);
        assert!(matches!(
            discovery.find_adapter(),
            Err(DiscoveryError::NotFound { .. })
        ));
    }

    #[test]
    fn reregistering_a_name_keeps_its_position() {
        let mut discovery = Discovery::new();
        discovery
            .register_adapter("a", ok("old"))
            .register_adapter("b", ok("b"))
            .register_adapter("a", ok("new"));

        assert_eq!(discovery.adapter_names(), vec!["a", "b"]);
        let adapter = discovery.find_adapter().expect("an adapter should be found");
        assert_eq!(adapter.name(), "new");
    }

    #[test]
    fn configured_candidate_is_used_exclusively() {
        let mut discovery = Discovery::new().with_config(DiscoveryConfig {
            adapter: Some("second".into()),
            message_factory: None,
        });
        discovery
            .register_adapter("first", ok("first"))
            .register_adapter("second", ok("second"));

        let adapter = discovery.find_adapter().expect("an adapter should be found");
        assert_eq!(adapter.name(), "second");
    }

    #[test]
    fn configured_candidate_must_exist() {
        let mut discovery = Discovery::new().with_config(DiscoveryConfig {
            adapter: Some("missing".into()),
            message_factory: None,
        });
        discovery.register_adapter("first", ok("first"));

        assert_eq!(
            discovery.find_adapter().err(),
            Some(DiscoveryError::UnknownCandidate {
                capability: Capability::Adapter,
                name: "missing".into(),
            })
        );
    }

    #[test]
    fn configured_candidate_failure_does_not_fall_back() {
        let mut discovery = Discovery::new().with_config(DiscoveryConfig {
            adapter: Some("broken".into()),
            message_factory: None,
        });
        discovery
            .register_adapter("broken", unavailable)
            .register_adapter("fine", ok("fine"));

        assert_eq!(
            discovery.find_adapter().err(),
            Some(DiscoveryError::Unavailable {
                capability: Capability::Adapter,
                name: "broken".into(),
                reason: "backend missing".into(),
            })
        );
    }

    #[test]
    fn each_lookup_runs_the_constructor() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut discovery = Discovery::new();
        discovery.register_adapter("counted", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(NamedAdapter("counted"))
        });

        discovery.find_adapter().expect("first lookup");
        discovery.find_adapter().expect("second lookup");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn registered_instances_are_shared() {
        let shared: Arc<dyn HttpAdapter> = Arc::new(NamedAdapter("shared"));
        let mut discovery = Discovery::new();
        discovery.register_adapter_instance("shared", Arc::clone(&shared));

        let found = discovery.find_adapter().expect("an adapter should be found");
        assert!(Arc::ptr_eq(&found, &shared));
    }

    #[test]
    fn registered_factory_instances_are_shared() {
        let shared: Arc<dyn MessageFactory> = Arc::new(HttpMessageFactory::new());
        let mut discovery = Discovery::with_defaults();
        discovery.register_message_factory_instance("shared", Arc::clone(&shared));

        assert_eq!(
            discovery.message_factory_names(),
            vec![DEFAULT_MESSAGE_FACTORY, "shared"]
        );
        let pinned = discovery.with_config(DiscoveryConfig {
            adapter: None,
            message_factory: Some("shared".into()),
        });
        let found = pinned
            .find_message_factory()
            .expect("a message factory should be found");
        assert!(Arc::ptr_eq(&found, &shared));
    }

    #[test]
    fn config_reflects_the_latest_with_config() {
        let discovery = Discovery::new();
        assert_eq!(discovery.config(), &DiscoveryConfig::default());

        let config = DiscoveryConfig {
            adapter: Some("curl".into()),
            message_factory: Some("http".into()),
        };
        let discovery = discovery.with_config(config.clone());
        assert_eq!(discovery.config(), &config);
    }
}
