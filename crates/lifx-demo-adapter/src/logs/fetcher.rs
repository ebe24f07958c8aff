/*
[INPUT]:  Backend client, fetch options (limit, level, since)
[OUTPUT]: Cached backend/MCP log lists and per-endpoint availability
[POS]:    Logs layer - fetching server logs with 404 and partial-failure tolerance
[UPDATE]: When log endpoints, query options or failure policy change
*/

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::form_urlencoded;

use crate::clipboard::ClipboardService;
use crate::http::{BackendClient, ClientError, Result};
use crate::types::{EndpointStatus, LogEntry, LogSource, LogsResponse};

/// Query options for one log endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Defaults to 25 for backend logs and 20 for MCP logs; 0 omits the parameter
    pub limit: Option<u32>,
    pub level: Option<String>,
    pub since: Option<String>,
}

impl FetchOptions {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// `<endpoint>?limit=..&level=..&since=..` for `source`
    pub fn endpoint(&self, source: LogSource) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        let limit = self.limit.unwrap_or_else(|| source.default_limit());
        if limit > 0 {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(level) = self.level.as_deref().filter(|v| !v.is_empty()) {
            query.append_pair("level", level);
        }
        if let Some(since) = self.since.as_deref().filter(|v| !v.is_empty()) {
            query.append_pair("since", since);
        }

        let query = query.finish();
        if query.is_empty() {
            source.endpoint().to_string()
        } else {
            format!("{}?{query}", source.endpoint())
        }
    }
}

/// Per-source options for [`ServerLogs::fetch_all_logs`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllLogsOptions {
    pub backend: FetchOptions,
    pub mcp: FetchOptions,
}

/// Availability of both log endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointStatuses {
    pub backend: EndpointStatus,
    pub mcp: EndpointStatus,
}

impl EndpointStatuses {
    pub fn get(&self, source: LogSource) -> EndpointStatus {
        match source {
            LogSource::Backend => self.backend,
            LogSource::Mcp => self.mcp,
        }
    }

    fn set(&mut self, source: LogSource, status: EndpointStatus) {
        match source {
            LogSource::Backend => self.backend = status,
            LogSource::Mcp => self.mcp = status,
        }
    }
}

/// Snapshot of everything the log viewer shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogsState {
    pub backend_logs: Vec<LogEntry>,
    pub mcp_logs: Vec<LogEntry>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub endpoint_status: EndpointStatuses,
}

impl LogsState {
    pub fn logs(&self, source: LogSource) -> &[LogEntry] {
        match source {
            LogSource::Backend => &self.backend_logs,
            LogSource::Mcp => &self.mcp_logs,
        }
    }

    fn logs_mut(&mut self, source: LogSource) -> &mut Vec<LogEntry> {
        match source {
            LogSource::Backend => &mut self.backend_logs,
            LogSource::Mcp => &mut self.mcp_logs,
        }
    }
}

/// Outcome of [`ServerLogs::fetch_all_logs`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllLogsResult {
    /// `None` when the backend fetch failed
    pub backend: Option<LogsResponse>,
    /// `None` when the MCP fetch failed
    pub mcp: Option<LogsResponse>,
    pub timestamp: DateTime<Utc>,
    /// At least one side returned data (404s count as data)
    pub partial_success: bool,
    /// Failure messages joined with `"; "`
    pub error: Option<String>,
}

/// Fetches and caches server logs from the backend
#[derive(Debug)]
pub struct ServerLogs {
    client: Arc<BackendClient>,
    pub(crate) clipboard: Arc<dyn ClipboardService>,
    state: RwLock<LogsState>,
}

impl ServerLogs {
    pub fn new(client: Arc<BackendClient>, clipboard: Arc<dyn ClipboardService>) -> Self {
        Self {
            client,
            clipboard,
            state: RwLock::new(LogsState::default()),
        }
    }

    pub fn client(&self) -> &Arc<BackendClient> {
        &self.client
    }

    pub fn state(&self) -> LogsState {
        self.read_state().clone()
    }

    pub fn logs(&self, source: LogSource) -> Vec<LogEntry> {
        self.read_state().logs(source).to_vec()
    }

    pub fn endpoint_status(&self, source: LogSource) -> EndpointStatus {
        self.read_state().endpoint_status.get(source)
    }

    pub fn error(&self) -> Option<String> {
        self.read_state().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().is_loading
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.read_state().last_updated
    }

    /// `GET /api/logs/backend`
    pub async fn fetch_backend_logs(&self, options: &FetchOptions) -> Result<LogsResponse> {
        self.fetch_logs(LogSource::Backend, options).await
    }

    /// `GET /api/logs/mcp`
    pub async fn fetch_mcp_logs(&self, options: &FetchOptions) -> Result<LogsResponse> {
        self.fetch_logs(LogSource::Mcp, options).await
    }

    /// Fetch one source's logs.
    ///
    /// A 404 means the server does not serve this source yet: the result is an
    /// empty success and the endpoint is marked unavailable. Any other failure
    /// marks the endpoint as errored and is returned.
    pub async fn fetch_logs(&self, source: LogSource, options: &FetchOptions) -> Result<LogsResponse> {
        let endpoint = options.endpoint(source);
        debug!(%source, endpoint = %endpoint, "fetching server logs");

        match self.request_logs(source, &endpoint).await {
            Ok(body) => {
                info!(%source, count = body.count, "server logs fetched");
                let mut state = self.write_state();
                *state.logs_mut(source) = body.logs.clone();
                state.endpoint_status.set(source, EndpointStatus::Available);
                Ok(body)
            }
            Err(err) if err.is_not_found() => {
                warn!(%source, "log endpoint not implemented (404)");
                let mut state = self.write_state();
                state.logs_mut(source).clear();
                state.endpoint_status.set(source, EndpointStatus::Unavailable);
                Ok(LogsResponse::not_implemented(format!(
                    "{} logs endpoint not yet implemented on server",
                    source.label()
                )))
            }
            Err(err) => {
                warn!(%source, error = %err, "failed to fetch server logs");
                let mut state = self.write_state();
                state.endpoint_status.set(source, EndpointStatus::Error);
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// `GET /api/logs`, returned as sent
    pub async fn fetch_logs_info(&self) -> Result<Value> {
        match self
            .client
            .make_api_request("/api/logs", &Value::Null, Method::GET)
            .await
        {
            Ok(response) => Ok(response.body),
            Err(err) => {
                warn!(error = %err, "failed to fetch logs info");
                self.write_state().error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Fetch both sources concurrently; one failing does not fail the other
    pub async fn fetch_all_logs(&self, options: &AllLogsOptions) -> AllLogsResult {
        {
            let mut state = self.write_state();
            state.is_loading = true;
            state.error = None;
        }

        let (backend, mcp) = tokio::join!(
            self.fetch_backend_logs(&options.backend),
            self.fetch_mcp_logs(&options.mcp)
        );

        let failures: Vec<String> = [&backend, &mcp]
            .into_iter()
            .filter_map(|result| result.as_ref().err())
            .map(ToString::to_string)
            .collect();
        let error = (!failures.is_empty()).then(|| failures.join("; "));

        let backend = backend.ok();
        let mcp = mcp.ok();
        let partial_success = backend.is_some() || mcp.is_some();
        let timestamp = Utc::now();

        {
            let mut state = self.write_state();
            state.error = error.clone();
            state.last_updated = Some(timestamp);
            state.is_loading = false;
        }

        match &error {
            Some(message) => warn!(error = %message, partial_success, "some log endpoints failed"),
            None => info!("server logs refreshed"),
        }

        AllLogsResult {
            backend,
            mcp,
            timestamp,
            partial_success,
            error,
        }
    }

    async fn request_logs(&self, source: LogSource, endpoint: &str) -> Result<LogsResponse> {
        let response = self
            .client
            .make_api_request(endpoint, &Value::Null, Method::GET)
            .await?;
        let body: LogsResponse = response.json()?;

        if !body.success {
            let message = body
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| fetch_failed_message(source));
            return Err(ClientError::LogsUnavailable(message));
        }
        Ok(body)
    }

    pub(crate) fn read_state(&self) -> RwLockReadGuard<'_, LogsState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn write_state(&self) -> RwLockWriteGuard<'_, LogsState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    #[cfg(test)]
    pub(crate) fn set_logs(&self, source: LogSource, logs: Vec<LogEntry>) {
        *self.write_state().logs_mut(source) = logs;
    }
}

fn fetch_failed_message(source: LogSource) -> String {
    match source {
        LogSource::Backend => "Failed to fetch backend logs".to_string(),
        LogSource::Mcp => "Failed to fetch MCP logs".to_string(),
    }
}
