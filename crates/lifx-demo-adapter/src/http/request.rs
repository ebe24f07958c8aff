/*
[INPUT]:  Endpoint paths, JSON payloads, session id and demo key
[OUTPUT]: Decoded responses or classified errors (429 remapped)
[POS]:    HTTP layer - generic backend calls carrying session headers
[UPDATE]: When request headers or error remapping change
*/

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::http::{ApiResponse, BackendClient, ClientError, Result};
use crate::session::SessionNotifier;
use crate::types::RateLimitBody;

pub const SESSION_ID_HEADER: &str = "X-Session-ID";
pub const DEMO_KEY_HEADER: &str = "X-Demo-Key";
pub const FORCE_NEW_SESSION_HEADER: &str = "X-Force-New-Session";
pub const RESET_SESSION_HEADER: &str = "X-Reset-Session";

impl BackendClient {
    /// Call `<backend><endpoint>` with the session and demo-key headers.
    ///
    /// Non-GET requests send `data` as the JSON body. Successful responses
    /// update the usage counters. A 429 carrying `SESSION_LIMIT` or
    /// `MULTIPLE_SESSIONS` becomes [`ClientError::SessionLimit`] or
    /// [`ClientError::MultipleSessions`]; everything else propagates as is.
    pub async fn make_api_request(
        &self,
        endpoint: &str,
        data: &Value,
        method: Method,
    ) -> Result<ApiResponse> {
        self.send_api_request(endpoint, data, method, false).await
    }

    /// POST with headers asking the server to drop the old session first.
    ///
    /// Recovery path for [`ClientError::MultipleSessions`].
    pub async fn make_api_request_with_session_reset(
        &self,
        endpoint: &str,
        data: &Value,
    ) -> Result<ApiResponse> {
        self.send_api_request(endpoint, data, Method::POST, true).await
    }

    /// Tear the session down on both sides and return the new session id
    pub async fn force_session_reset(&self) -> String {
        self.session()
            .force_session_reset(Some(self as &dyn SessionNotifier))
            .await
    }

    async fn send_api_request(
        &self,
        endpoint: &str,
        data: &Value,
        method: Method,
        reset_session: bool,
    ) -> Result<ApiResponse> {
        let session_id = self.session().get_session_id();
        let has_body = method != Method::GET && method != Method::HEAD;

        let mut builder = self
            .request(method.clone(), endpoint)?
            .header(CONTENT_TYPE, "application/json")
            .header(SESSION_ID_HEADER, &session_id)
            .header(DEMO_KEY_HEADER, self.demo_key())
            .timeout(self.config().api_timeout);
        if reset_session {
            builder = builder
                .header(FORCE_NEW_SESSION_HEADER, "true")
                .header(RESET_SESSION_HEADER, "true");
        }
        if has_body {
            builder = builder.json(data);
        }

        debug!(%method, endpoint, reset_session, "backend request");
        let response = ApiResponse::from_reqwest(builder.send().await?).await?;

        if !(200..300).contains(&response.status) {
            return Err(classify_failure(response));
        }

        self.session().update_usage_from_response(&response);
        Ok(response)
    }
}

fn classify_failure(response: ApiResponse) -> ClientError {
    if response.status == 429 {
        if let Ok(body) = serde_json::from_value::<RateLimitBody>(response.body.clone()) {
            if let Some(err) = ClientError::from_rate_limit_code(&body.code) {
                warn!(code = %body.code, "backend rate limited the session");
                return err;
            }
        }
    }

    ClientError::Status {
        status: response.status,
        body: response.body,
    }
}

#[async_trait]
impl SessionNotifier for BackendClient {
    /// POST /clear-session
    async fn notify_session_cleared(&self, session_id: &str) -> Result<()> {
        let response = self
            .request(Method::POST, "/clear-session")?
            .header(SESSION_ID_HEADER, session_id)
            .header(DEMO_KEY_HEADER, self.demo_key())
            .timeout(self.config().health_timeout)
            .json(&json!({ "sessionId": session_id }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = ApiResponse::from_reqwest(response).await?.body;
            Err(ClientError::status(status, body))
        }
    }
}
