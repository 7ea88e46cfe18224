//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use echo_common::Sleeper;
use echo_core::{
    AuthSessionManager, CollectionSynchronizer, EntrySaveWorkflow, EntryStore,
    GenerationTransport, IdentityProvider, ResilientApiClient,
};
use echo_domain::{AppConfig, JournalError, Result, Session};
use echo_infra::{GeminiTransport, InMemoryEntryStore, LocalIdentityProvider};
use tracing::{error, info};

/// Type alias for entry store port trait object
type DynEntryStore = dyn EntryStore + 'static;

/// Type alias for identity provider port trait object
type DynIdentityProvider = dyn IdentityProvider + 'static;

/// Type alias for generation transport port trait object
type DynGenerationTransport = dyn GenerationTransport + 'static;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: AppConfig,
    pub auth: Arc<AuthSessionManager>,
    pub sync: Arc<CollectionSynchronizer>,
    pub workflow: Arc<EntrySaveWorkflow>,
}

impl AppContext {
    /// Create a context on the default adapters.
    ///
    /// # Errors
    /// Returns `JournalError::Configuration` if `config` is invalid.
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Start building a context with replaceable adapters.
    pub fn builder(config: AppConfig) -> AppContextBuilder {
        AppContextBuilder {
            config,
            store: None,
            identity: None,
            transport: None,
            sleeper: None,
        }
    }

    /// Begin identity resolution and let the synchronizer follow it.
    pub fn start(&self) {
        self.sync.follow(self.auth.watch());
        self.auth.start();
        info!(app_id = %self.config.store.app_id, "echo journal started");
    }

    /// Wait until the session is ready (resolved or failed).
    ///
    /// # Errors
    /// Returns `JournalError::Internal` if resolution does not settle within
    /// `timeout`.
    pub async fn wait_until_ready(&self, timeout: Duration) -> Result<Session> {
        let mut sessions = self.auth.watch();
        let result = match tokio::time::timeout(timeout, sessions.wait_for(|session| session.ready)).await {
            Ok(Ok(session)) => Ok(session.clone()),
            Ok(Err(_)) => Err(JournalError::Internal("session manager stopped".into())),
            Err(_) => {
                error!(timeout_ms = timeout.as_millis() as u64, "identity resolution timed out");
                Err(JournalError::Internal("identity resolution timed out".into()))
            }
        };
        result
    }

    /// Stop background tasks and release every subscription.
    pub async fn shutdown(&self) {
        self.sync.shutdown().await;
        self.auth.shutdown().await;
        info!("echo journal stopped");
    }
}

/// Builder for [`AppContext`].
pub struct AppContextBuilder {
    config: AppConfig,
    store: Option<Arc<DynEntryStore>>,
    identity: Option<Arc<DynIdentityProvider>>,
    transport: Option<Arc<DynGenerationTransport>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl AppContextBuilder {
    pub fn store(mut self, store: Arc<DynEntryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn identity_provider(mut self, provider: Arc<DynIdentityProvider>) -> Self {
        self.identity = Some(provider);
        self
    }

    pub fn transport(mut self, transport: Arc<DynGenerationTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the timer used between rate-limited attempts.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Validate the configuration and wire the services.
    ///
    /// # Errors
    /// Returns `JournalError::Configuration` if the configuration or the
    /// backoff policy derived from it is invalid.
    pub fn build(self) -> Result<AppContext> {
        let config = self.config;
        config.validate()?;

        let store: Arc<DynEntryStore> = match self.store {
            Some(store) => store,
            None => Arc::new(InMemoryEntryStore::new()),
        };
        let identity: Arc<DynIdentityProvider> = match self.identity {
            Some(provider) => provider,
            None => Arc::new(LocalIdentityProvider::new()),
        };
        let transport: Arc<DynGenerationTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(GeminiTransport::new(&config.generation)?),
        };

        let mut api = ResilientApiClient::from_config(transport, &config.generation)?;
        if let Some(sleeper) = self.sleeper {
            api = api.with_sleeper(sleeper);
        }

        let auth = Arc::new(AuthSessionManager::new(
            identity,
            config.auth.bootstrap_credential.clone(),
        ));
        let sync = Arc::new(CollectionSynchronizer::new(store.clone(), config.store.clone()));
        let workflow =
            Arc::new(EntrySaveWorkflow::new(store, Arc::new(api), config.store.clone()));

        Ok(AppContext { config, auth, sync, workflow })
    }
}
