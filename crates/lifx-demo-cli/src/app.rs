/*
[INPUT]:  Resolved settings and a clipboard implementation
[OUTPUT]: Wired client state shared by all commands
[POS]:    Application layer - start-up wiring of the adapter objects
[UPDATE]: When new adapter services are exposed through the CLI
*/

use std::sync::Arc;

use anyhow::{Context, Result};
use lifx_demo_adapter::{
    ApiKeyStore, BackendClient, BrowserState, ClipboardService, ServerLogs, SessionTracker,
    SystemClipboard,
};
use tracing::debug;

use crate::config::Settings;

/// Everything a command may touch, created once per process
#[derive(Debug)]
pub struct App {
    pub settings: Settings,
    pub state: BrowserState,
    pub client: Arc<BackendClient>,
    pub logs: ServerLogs,
    pub keys: ApiKeyStore,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_clipboard(settings, Arc::new(SystemClipboard::new()))
    }

    pub fn with_clipboard(settings: Settings, clipboard: Arc<dyn ClipboardService>) -> Result<Self> {
        let state = BrowserState::open(&settings.state_dir).with_context(|| {
            format!("open state directory {}", settings.state_dir.display())
        })?;
        debug!(state_dir = %settings.state_dir.display(), "state opened");

        let tracker = SessionTracker::new(state.clone());
        let client = BackendClient::new(tracker, settings.backend.clone())
            .context("create backend client")?
            .into_shared();
        let logs = ServerLogs::new(client.clone(), clipboard);
        let keys = ApiKeyStore::new(state.local.clone());

        Ok(Self {
            settings,
            state,
            client,
            logs,
            keys,
        })
    }
}
