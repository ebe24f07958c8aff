/*
[INPUT]:  Session store, response headers, optional backend notifier
[OUTPUT]: Stable session id and server-reported usage counters
[POS]:    Session layer - per-session identity and rate-limit bookkeeping
[UPDATE]: When session id format, usage headers or reset flow change
*/

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::http::Result;
use crate::storage::{BrowserState, SESSION_ID_KEY};
use crate::types::{DEFAULT_DAILY_LIMIT, UsageCounters};

use super::headers::{
    DAILY_LIMIT_HEADER, HeaderLookup, REQUESTS_REMAINING_HEADER, REQUESTS_USED_HEADER,
};
use super::id::{generate_fresh_session_id, generate_session_id};

/// Time the server gets to drop the old session before a new id is issued
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(500);

/// Receives session teardown notifications
#[async_trait]
pub trait SessionNotifier: Send + Sync {
    async fn notify_session_cleared(&self, session_id: &str) -> Result<()>;
}

/// Owns the session id and the usage counters.
///
/// Clones share state. Concurrent updates to the counters are last write
/// wins; the server is the source of truth and re-reports on every response.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    state: BrowserState,
    usage: Arc<RwLock<UsageCounters>>,
    reset_delay: Duration,
}

impl SessionTracker {
    pub fn new(state: BrowserState) -> Self {
        Self {
            state,
            usage: Arc::new(RwLock::new(UsageCounters::default())),
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }

    /// Override the pause taken by [`force_session_reset`](Self::force_session_reset)
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn browser_state(&self) -> &BrowserState {
        &self.state
    }

    /// Current session id, creating and persisting one if none exists
    pub fn get_session_id(&self) -> String {
        if let Some(id) = self.stored_session_id() {
            return id;
        }

        let id = generate_session_id();
        self.persist_session_id(&id);
        info!(session_id = %id, "created session");
        id
    }

    /// Overwrite all three counters from `X-Requests-*` / `X-Daily-Limit`
    pub fn update_usage_from_response(&self, headers: &impl HeaderLookup) {
        let counters = UsageCounters {
            used: headers.header_i64(REQUESTS_USED_HEADER).unwrap_or(0),
            remaining: headers
                .header_i64(REQUESTS_REMAINING_HEADER)
                .unwrap_or(DEFAULT_DAILY_LIMIT),
            limit: headers
                .header_i64(DAILY_LIMIT_HEADER)
                .unwrap_or(DEFAULT_DAILY_LIMIT),
        };

        debug!(
            used = counters.used,
            remaining = counters.remaining,
            limit = counters.limit,
            "usage updated"
        );
        self.set_usage(counters);
    }

    pub fn usage(&self) -> UsageCounters {
        *self.usage.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn requests_used(&self) -> i64 {
        self.usage().used
    }

    pub fn requests_remaining(&self) -> i64 {
        self.usage().remaining
    }

    pub fn daily_limit(&self) -> i64 {
        self.usage().limit
    }

    pub fn usage_percentage(&self) -> i64 {
        self.usage().percentage()
    }

    pub fn can_send_request(&self) -> bool {
        self.usage().remaining > 0
    }

    /// Drop the stored id, issue a new one and reset the counters
    pub fn reset_session(&self) -> String {
        if let Err(err) = self.state.session.remove(SESSION_ID_KEY) {
            warn!(error = %err, "failed to remove session id");
        }
        self.set_usage(UsageCounters::default());

        let id = generate_session_id();
        self.persist_session_id(&id);
        info!(session_id = %id, "session reset");
        id
    }

    /// Tear the session down everywhere and start over.
    ///
    /// Notifies the backend if a notifier is given (errors are ignored),
    /// wipes every key of both the local and the session store, waits for
    /// the server to settle, then issues a fresh two-segment id. Never fails.
    pub async fn force_session_reset(&self, notifier: Option<&dyn SessionNotifier>) -> String {
        if let (Some(notifier), Some(old_id)) = (notifier, self.stored_session_id()) {
            match notifier.notify_session_cleared(&old_id).await {
                Ok(()) => debug!(session_id = %old_id, "backend notified of session reset"),
                Err(err) => warn!(error = %err, "session clear notification failed"),
            }
        }

        if let Err(err) = self.state.clear_all() {
            warn!(error = %err, "failed to clear stored state");
        }

        tokio::time::sleep(self.reset_delay).await;

        let id = generate_fresh_session_id();
        self.persist_session_id(&id);
        self.set_usage(UsageCounters::default());
        info!(session_id = %id, "forced session reset");
        id
    }

    fn stored_session_id(&self) -> Option<String> {
        match self.state.session.get(SESSION_ID_KEY) {
            Ok(id) => id.filter(|id| !id.is_empty()),
            Err(err) => {
                warn!(error = %err, "failed to read session id");
                None
            }
        }
    }

    fn persist_session_id(&self, id: &str) {
        if let Err(err) = self.state.session.set(SESSION_ID_KEY, id) {
            warn!(error = %err, "failed to persist session id");
        }
    }

    fn set_usage(&self, counters: UsageCounters) {
        let mut guard = self.usage.write().unwrap_or_else(|e| e.into_inner());
        *guard = counters;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::http::ClientError;
    use crate::storage::{DEMO_KEY_KEY, LIFX_API_KEY};

    fn tracker() -> SessionTracker {
        SessionTracker::new(BrowserState::in_memory()).with_reset_delay(Duration::from_millis(1))
    }

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[derive(Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl SessionNotifier for RecordingNotifier {
        async fn notify_session_cleared(&self, session_id: &str) -> Result<()> {
            self.seen.lock().unwrap().push(session_id.to_string());
            if self.fail {
                Err(ClientError::InvalidResponse("backend down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_session_id_is_stable_until_reset() {
        let tracker = tracker();
        let first = tracker.get_session_id();
        assert_eq!(tracker.get_session_id(), first);

        let reset = tracker.reset_session();
        assert_ne!(reset, first);
        assert_eq!(tracker.get_session_id(), reset);
    }

    #[test]
    fn test_session_id_is_persisted() {
        let state = BrowserState::in_memory();
        let id = SessionTracker::new(state.clone()).get_session_id();
        assert_eq!(state.session.get(SESSION_ID_KEY).unwrap(), Some(id.clone()));

        // a second tracker over the same store sees the same session
        assert_eq!(SessionTracker::new(state).get_session_id(), id);
    }

    #[test]
    fn test_update_usage_from_headers() {
        let tracker = tracker();
        tracker.update_usage_from_response(&headers(&[
            ("x-requests-used", "5"),
            ("x-requests-remaining", "95"),
            ("x-daily-limit", "100"),
        ]));
        assert_eq!(
            tracker.usage(),
            UsageCounters { used: 5, remaining: 95, limit: 100 }
        );
        assert_eq!(tracker.usage_percentage(), 5);
    }

    #[test]
    fn test_update_usage_defaults_when_missing() {
        let tracker = tracker();
        tracker.update_usage_from_response(&headers(&[("x-requests-used", "42")]));
        tracker.update_usage_from_response(&headers(&[]));
        assert_eq!(
            tracker.usage(),
            UsageCounters { used: 0, remaining: 100, limit: 100 }
        );
    }

    #[test]
    fn test_update_usage_accepts_any_casing() {
        let tracker = tracker();
        tracker.update_usage_from_response(&headers(&[
            ("X-Requests-Used", "10"),
            ("X-REQUESTS-REMAINING", "0"),
            ("x-Daily-Limit", "10"),
        ]));
        assert_eq!(tracker.requests_used(), 10);
        assert_eq!(tracker.requests_remaining(), 0);
        assert_eq!(tracker.daily_limit(), 10);
    }

    #[test]
    fn test_can_send_request_tracks_remaining() {
        let tracker = tracker();
        assert!(tracker.can_send_request());

        tracker.update_usage_from_response(&headers(&[("x-requests-remaining", "0")]));
        assert!(!tracker.can_send_request());

        tracker.update_usage_from_response(&headers(&[("x-requests-remaining", "1")]));
        assert!(tracker.can_send_request());
    }

    #[test]
    fn test_negative_remaining_blocks_requests() {
        let tracker = tracker();
        tracker.update_usage_from_response(&headers(&[
            ("x-requests-used", "101"),
            ("x-requests-remaining", "-1"),
            ("x-daily-limit", "100"),
        ]));

        assert_eq!(
            tracker.usage(),
            UsageCounters { used: 101, remaining: -1, limit: 100 }
        );
        assert!(!tracker.can_send_request());
        assert_eq!(tracker.usage_percentage(), 101);
    }

    #[test]
    fn test_reset_session_restores_default_counters() {
        let tracker = tracker();
        tracker.update_usage_from_response(&headers(&[
            ("x-requests-used", "99"),
            ("x-requests-remaining", "1"),
        ]));
        tracker.reset_session();
        assert_eq!(tracker.usage(), UsageCounters::default());
    }

    #[tokio::test]
    async fn test_force_reset_wipes_all_storage() {
        let tracker = tracker();
        let state = tracker.browser_state().clone();
        let old = tracker.get_session_id();
        state.local.set(LIFX_API_KEY, "key").unwrap();
        state.local.set(DEMO_KEY_KEY, "LifxDemo").unwrap();

        let notifier = RecordingNotifier::default();
        let new_id = tracker.force_session_reset(Some(&notifier)).await;

        assert_ne!(new_id, old);
        assert_eq!(new_id.split('_').count(), 4);
        assert_eq!(notifier.seen.lock().unwrap().as_slice(), &[old]);
        assert!(state.local.keys().unwrap().is_empty());
        assert_eq!(state.session.keys().unwrap(), vec![SESSION_ID_KEY.to_string()]);
        assert_eq!(tracker.get_session_id(), new_id);
    }

    #[tokio::test]
    async fn test_force_reset_ignores_notifier_failure() {
        let tracker = tracker();
        tracker.get_session_id();
        tracker.update_usage_from_response(&headers(&[("x-requests-used", "3")]));

        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        let new_id = tracker.force_session_reset(Some(&notifier)).await;

        assert!(new_id.starts_with("session_"));
        assert_eq!(tracker.usage(), UsageCounters::default());
    }

    #[tokio::test]
    async fn test_force_reset_without_notifier() {
        let tracker = tracker();
        let new_id = tracker.force_session_reset(None).await;
        assert_eq!(tracker.get_session_id(), new_id);
    }
}
