/*
[INPUT]:  HTTP configuration (timeouts, cooldowns), persisted backend config, session tracker
[OUTPUT]: Configured reqwest client ready for backend calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::http::{ClientError, Result};
use crate::session::SessionTracker;
use crate::storage::{BACKEND_URL_KEY, DEMO_KEY_KEY, KeyValueStore};
use crate::types::BackendStatus;

/// Backend used when nothing is configured or persisted
pub const DEFAULT_BACKEND_URL: &str = "https://your-app.railway.app";
/// Shared demo secret sent as `X-Demo-Key`
pub const DEFAULT_DEMO_KEY: &str = "LifxDemo";

const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0", "::1", "[::1]"];

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Timeout for `make_api_request` and log fetches
    pub api_timeout: Duration,
    /// Timeout for `GET /health`
    pub health_timeout: Duration,
    pub connect_timeout: Duration,
    /// Minimum spacing of unforced health checks against a deployed backend
    pub health_cooldown_production: Duration,
    /// Minimum spacing of unforced health checks against a local backend
    pub health_cooldown_development: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_timeout: Duration::from_secs(30),
            health_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(10),
            health_cooldown_production: Duration::from_secs(300),
            health_cooldown_development: Duration::from_secs(120),
        }
    }
}

/// Where the backend lives and the key it expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub demo_key: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
            demo_key: DEFAULT_DEMO_KEY.to_string(),
        }
    }
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, demo_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            demo_key: demo_key.into(),
        }
    }

    /// Persisted values win over `defaults`, key by key
    pub fn load(store: &dyn KeyValueStore, defaults: &BackendConfig) -> Result<Self> {
        let url = store
            .get(BACKEND_URL_KEY)?
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| defaults.url.clone());
        let demo_key = store
            .get(DEMO_KEY_KEY)?
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| defaults.demo_key.clone());
        Ok(Self { url, demo_key })
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(BACKEND_URL_KEY, &self.url)?;
        store.set(DEMO_KEY_KEY, &self.demo_key)?;
        Ok(())
    }

    /// Whether the backend is a deployed service rather than a local dev server
    pub fn is_production(&self) -> bool {
        match Url::parse(&self.url) {
            Ok(url) => url
                .host_str()
                .map(|host| !LOCAL_HOSTS.contains(&host))
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct HealthCheckState {
    pub(crate) last_run: Option<Instant>,
    pub(crate) initial_done: bool,
}

/// HTTP client for the LIFX demo backend
#[derive(Debug)]
pub struct BackendClient {
    http_client: Client,
    config: ClientConfig,
    session: SessionTracker,
    backend: RwLock<BackendConfig>,
    status: RwLock<BackendStatus>,
    pub(crate) health: Mutex<HealthCheckState>,
}

impl BackendClient {
    /// Create a client with default configuration
    pub fn new(session: SessionTracker, defaults: BackendConfig) -> Result<Self> {
        Self::with_config(ClientConfig::default(), session, defaults)
    }

    /// Create a client with custom configuration.
    ///
    /// The backend URL and demo key are read from the local store, falling
    /// back to `defaults` for anything not persisted.
    pub fn with_config(
        config: ClientConfig,
        session: SessionTracker,
        defaults: BackendConfig,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        let backend = BackendConfig::load(session.browser_state().local.as_ref(), &defaults)?;

        Ok(Self {
            http_client,
            config,
            session,
            backend: RwLock::new(backend),
            status: RwLock::new(BackendStatus::Checking),
            health: Mutex::new(HealthCheckState::default()),
        })
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionTracker {
        &self.session
    }

    pub fn backend_config(&self) -> BackendConfig {
        self.backend.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn backend_url(&self) -> String {
        self.backend_config().url
    }

    pub fn demo_key(&self) -> String {
        self.backend_config().demo_key
    }

    pub fn backend_status(&self) -> BackendStatus {
        *self.status.read().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn set_backend_status(&self, status: BackendStatus) {
        let mut guard = self.status.write().unwrap_or_else(|e| e.into_inner());
        *guard = status;
    }

    /// Persist a new backend URL and key; the next health check re-evaluates
    pub fn update_backend_config(
        &self,
        url: impl Into<String>,
        demo_key: impl Into<String>,
    ) -> Result<()> {
        let config = BackendConfig::new(url, demo_key);
        Url::parse(&config.url)?;
        config.save(self.session.browser_state().local.as_ref())?;

        info!(backend_url = %config.url, "backend config updated");
        *self.backend.write().unwrap_or_else(|e| e.into_inner()) = config;
        self.set_backend_status(BackendStatus::Checking);
        Ok(())
    }

    /// Build full URL for a backend endpoint.
    ///
    /// Plain concatenation, so a backend mounted under a path prefix keeps it.
    pub(crate) fn url(&self, endpoint: &str) -> Result<Url> {
        let base = self.backend_url();
        let full = format!("{}{}", base.trim_end_matches('/'), endpoint);
        Url::parse(&full).map_err(ClientError::from)
    }

    /// Build request builder for a backend endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }
}
