//! HTTP backend abstraction for the back office REST gateway.
//!
//! The resource client talks to an `HttpBackend` trait object so stores can
//! be exercised against canned responses. The production implementation
//! uses reqwest and performs no retries.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::{ClientError, ClientResult};

// ============================================================================
// Request / Response
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Patch => write!(f, "PATCH"),
            HttpMethod::Delete => write!(f, "DELETE"),
        }
    }
}

/// One JSON request to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub body: Option<Value>,
    /// Session token sent as `Authorization: Bearer …`.
    pub bearer: Option<String>,
}

/// Whatever the backend answered, success or not.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `Value::Null` for an empty body.
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Sends one request and hands back the raw status and JSON body.
///
/// Only transport failures are errors here; a 4xx/5xx answer is a normal
/// `ApiResponse` that the resource client interprets.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        if let Some(ref token) = request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            // Error pages are often HTML; keep them as text so the status
            // still reaches the caller.
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        Ok(ApiResponse { status, body })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Canned answer for the fake backend.
    #[derive(Debug, Clone)]
    pub struct CannedResponse {
        pub status: u16,
        pub body: Value,
        /// When set, the request fails as if the network dropped.
        pub transport_error: Option<String>,
        /// Held before answering, to order racing requests.
        pub delay: Option<Duration>,
    }

    impl CannedResponse {
        pub fn ok(body: Value) -> Self {
            Self::status(200, body)
        }

        pub fn status(status: u16, body: Value) -> Self {
            Self {
                status,
                body,
                transport_error: None,
                delay: None,
            }
        }

        pub fn transport(message: &str) -> Self {
            Self {
                status: 0,
                body: Value::Null,
                transport_error: Some(message.to_string()),
                delay: None,
            }
        }

        pub fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    struct Route {
        method: HttpMethod,
        path_suffix: String,
        responses: VecDeque<CannedResponse>,
    }

    /// A fake HTTP backend that answers from a per-route queue.
    ///
    /// Routes match on method plus the end of the URL path. Each request
    /// pops the next queued answer; the last one is repeated. Unmatched
    /// requests get a 404 with a `message` field.
    pub struct FakeBackend {
        routes: Mutex<Vec<Route>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self {
                routes: Mutex::new(Vec::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_response(self, method: HttpMethod, path_suffix: &str, response: CannedResponse) -> Self {
            self.push_response(method, path_suffix, response);
            self
        }

        /// Queues an answer after construction (e.g. behind an `Arc`).
        pub fn push_response(&self, method: HttpMethod, path_suffix: &str, response: CannedResponse) {
            let mut routes = self.routes.lock().expect("fake routes poisoned");
            match routes
                .iter_mut()
                .find(|r| r.method == method && r.path_suffix == path_suffix)
            {
                Some(route) => route.responses.push_back(response),
                None => routes.push(Route {
                    method,
                    path_suffix: path_suffix.to_string(),
                    responses: VecDeque::from([response]),
                }),
            }
        }

        /// Every request seen so far, in arrival order.
        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().expect("fake requests poisoned").clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().expect("fake requests poisoned").len()
        }

        fn next_response(&self, method: HttpMethod, path: &str) -> Option<CannedResponse> {
            let mut routes = self.routes.lock().expect("fake routes poisoned");
            let route = routes
                .iter_mut()
                .find(|r| r.method == method && path.ends_with(&r.path_suffix))?;
            if route.responses.len() > 1 {
                route.responses.pop_front()
            } else {
                route.responses.front().cloned()
            }
        }
    }

    impl Default for FakeBackend {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
            let canned = self.next_response(request.method, request.url.path());
            let method = request.method;
            let url = request.url.to_string();
            self.requests
                .lock()
                .expect("fake requests poisoned")
                .push(request);

            let Some(canned) = canned else {
                return Ok(ApiResponse {
                    status: 404,
                    body: serde_json::json!({ "message": format!("No canned response for {method} {url}") }),
                });
            };

            if let Some(delay) = canned.delay {
                tokio::time::sleep(delay).await;
            }

            match canned.transport_error {
                Some(message) => Err(ClientError::Transport(message)),
                None => Ok(ApiResponse {
                    status: canned.status,
                    body: canned.body,
                }),
            }
        }
    }
}
