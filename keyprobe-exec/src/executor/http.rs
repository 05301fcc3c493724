use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::executor::types::{HttpRequestParts, HttpResponseParts};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    #[error("timeout")]
    Timeout,
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends one attempt. A zero `timeout` means no deadline.
    async fn send(
        &self,
        req: &HttpRequestParts,
        timeout: Duration,
    ) -> Result<HttpResponseParts, HttpError>;
}

pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn try_new() -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("keyprobe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self { client })
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::try_new().unwrap_or_else(|e| {
            panic!("failed to create reqwest HTTP client: {e}. This is a bug - please report it.");
        })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(
        &self,
        req: &HttpRequestParts,
        timeout: Duration,
    ) -> Result<HttpResponseParts, HttpError> {
        let method = reqwest::Method::from_bytes(req.method.as_bytes())
            .map_err(|e| HttpError::Other(e.to_string()))?;
        let mut rb = self.client.request(method, req.url.clone());
        if !timeout.is_zero() {
            rb = rb.timeout(timeout);
        }

        for (k, v) in &req.headers {
            rb = rb.header(k.as_str(), v.as_str());
        }

        if let Some(body) = &req.body {
            rb = rb.body(body.to_vec());
        }

        let resp = rb.send().await.map_err(map_reqwest_error)?;
        let status = resp.status().as_u16();

        let mut headers = BTreeMap::new();
        for (k, v) in resp.headers().iter() {
            if let Ok(s) = v.to_str() {
                headers.insert(k.to_string(), s.to_string());
            }
        }

        let body = resp.bytes().await.map_err(map_reqwest_error)?.to_vec();

        Ok(HttpResponseParts {
            status,
            headers,
            body,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    // The URL may hold a substituted secret.
    let e = e.without_url();
    let message = error_chain(&e);
    if e.is_timeout() || looks_like_timeout(&message) {
        return HttpError::Timeout;
    }
    if e.is_connect() || e.is_request() {
        return HttpError::Network(message);
    }
    HttpError::Other(message)
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut out = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        let msg = inner.to_string();
        if !out.contains(&msg) {
            out.push_str(": ");
            out.push_str(&msg);
        }
        source = inner.source();
    }
    out
}

/// Deadline exhaustion reported only through the error text.
pub fn looks_like_timeout(message: &str) -> bool {
    let m = message.to_ascii_lowercase();
    m.contains("timed out") || m.contains("timeout") || m.contains("deadline has elapsed")
}
