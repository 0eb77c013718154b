//! # HTTP Transport
//!
//! Providers and the saver talk to the network through [`HttpTransport`] so they can be
//! driven by canned responses in tests. [`ReqwestTransport`] is the production client.

use crate::error::{Result, StockError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("stockpix/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A GET request: url, query-string pairs and extra headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.push((key.to_string(), value.into()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as lossy UTF-8, trimmed for use in error messages.
    pub fn body_snippet(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        text.chars().take(200).collect::<String>().trim().to_string()
    }
}

/// Network boundary used by providers and the saver.
///
/// Implementations only fail on transport problems (DNS, TLS, timeouts). Non-2xx
/// responses are returned as-is so callers can tell a 404 from an outage.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StockError::Configuration(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(url = %request.url, "GET");

        let mut builder = self.client.get(&request.url).query(&request.query);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let http_err = |e: reqwest::Error| StockError::Http {
            url: request.url.clone(),
            message: e.to_string(),
        };

        let response = builder.send().await.map_err(http_err)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(http_err)?.to_vec();

        debug!(url = %request.url, status, bytes = body.len(), "response");
        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport for unit tests.

    use super::*;
    use std::sync::Mutex;

    type Responder = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync>;

    /// Answers requests with a closure and records every request it sees.
    pub struct FakeTransport {
        responder: Responder,
        pub requests: Mutex<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        pub fn new<F>(responder: F) -> Self
        where
            F: Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync + 'static,
        {
            Self {
                responder: Box::new(responder),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn get(&self, request: HttpRequest) -> Result<HttpResponse> {
            let response = (self.responder)(&request);
            self.requests.lock().unwrap().push(request);
            response
        }
    }

    pub fn ok(body: impl Into<Vec<u8>>, content_type: &str) -> Result<HttpResponse> {
        Ok(HttpResponse {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        })
    }

    pub fn json(body: &str) -> Result<HttpResponse> {
        ok(body.as_bytes().to_vec(), "application/json")
    }

    pub fn status(code: u16) -> Result<HttpResponse> {
        Ok(HttpResponse {
            status: code,
            content_type: None,
            body: format!("status {}", code).into_bytes(),
        })
    }
}
