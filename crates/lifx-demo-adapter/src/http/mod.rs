/*
[INPUT]:  HTTP client configuration and backend endpoints
[OUTPUT]: HTTP responses, backend status and typed API results
[POS]:    HTTP layer - backend communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod health;
pub mod request;
pub mod response;

pub use error::{ClientError, Result};
pub use reqwest::Method;
pub use response::ApiResponse;

pub use client::{BackendClient, BackendConfig, ClientConfig, DEFAULT_BACKEND_URL, DEFAULT_DEMO_KEY};
