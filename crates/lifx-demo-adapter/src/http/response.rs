/*
[INPUT]:  Status, headers and body bytes of a backend reply
[OUTPUT]: ApiResponse with a decoded JSON body and header access
[POS]:    HTTP layer - response value passed back to callers
[UPDATE]: When callers need more of the raw reply
*/

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::http::Result;
use crate::session::HeaderLookup;

/// Decoded backend response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// JSON body; `Null` when empty, a JSON string when the body is not JSON
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let text = response.text().await?;
        Ok(Self {
            status,
            headers,
            body: decode_body(&text),
        })
    }

    /// Deserialize the body into a typed response
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

impl HeaderLookup for ApiResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.header(name)
    }
}

pub(crate) fn decode_body(text: &str) -> serde_json::Value {
    if text.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}
