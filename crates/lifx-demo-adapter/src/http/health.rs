/*
[INPUT]:  Backend URL, cooldown settings, caller intent (force/source)
[OUTPUT]: Updated BackendStatus (never an error)
[POS]:    HTTP layer - rate-limited backend reachability probe
[UPDATE]: When health endpoint, cooldowns or status mapping change
*/

use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode};
use tracing::{debug, info, warn};

use crate::http::BackendClient;
use crate::types::{BackendStatus, HealthCheckSource};

impl BackendClient {
    /// Probe `GET <backend>/health` and record the outcome.
    ///
    /// 200 → `Connected`, any other 2xx → `Error`, non-2xx or transport
    /// failure → `Disconnected`. Unforced calls inside the cooldown window
    /// are skipped; an `Initial` call runs at most once per client, even if
    /// forced.
    pub async fn check_backend_health(&self, force: bool, source: HealthCheckSource) {
        if !self.claim_health_check(force, source) {
            return;
        }

        self.set_backend_status(BackendStatus::Checking);

        let outcome = match self.request(Method::GET, "/health") {
            Ok(builder) => builder.timeout(self.config().health_timeout).send().await,
            Err(err) => {
                warn!(error = %err, "invalid backend URL for health check");
                self.set_backend_status(BackendStatus::Disconnected);
                return;
            }
        };

        let status = match outcome {
            Ok(response) if response.status() == StatusCode::OK => BackendStatus::Connected,
            Ok(response) if response.status().is_success() => {
                warn!(status = %response.status(), "unexpected health check status");
                BackendStatus::Error
            }
            Ok(response) => {
                warn!(status = %response.status(), "backend health check failed");
                BackendStatus::Disconnected
            }
            Err(err) => {
                warn!(error = %err, "backend health check failed");
                BackendStatus::Disconnected
            }
        };

        info!(?status, ?source, "backend health checked");
        self.set_backend_status(status);
    }

    /// Cooldown that applies to the current backend
    pub fn health_cooldown(&self) -> Duration {
        if self.backend_config().is_production() {
            self.config().health_cooldown_production
        } else {
            self.config().health_cooldown_development
        }
    }

    /// Decide whether this call may run, and mark it as running
    fn claim_health_check(&self, force: bool, source: HealthCheckSource) -> bool {
        let cooldown = self.health_cooldown();
        let mut state = self.health.lock().unwrap_or_else(|e| e.into_inner());

        if source == HealthCheckSource::Initial {
            if state.initial_done {
                debug!("initial health check already ran");
                return false;
            }
            state.initial_done = true;
        } else if !force {
            if let Some(last) = state.last_run {
                if last.elapsed() < cooldown {
                    debug!(
                        remaining_secs = cooldown.saturating_sub(last.elapsed()).as_secs(),
                        "health check in cooldown"
                    );
                    return false;
                }
            }
        }

        state.last_run = Some(Instant::now());
        true
    }
}
