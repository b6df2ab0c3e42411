//! UpstreamTransport trait and implementations.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

// ------------------------------------------------------------------ //
//  Types                                                              //
// ------------------------------------------------------------------ //

/// Status and body text of one upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network-level failure: connect error, timeout, unreadable body.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

// ------------------------------------------------------------------ //
//  Trait                                                              //
// ------------------------------------------------------------------ //

/// Issues a GET for an already-signed URL.
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<UpstreamResponse, TransportError>;
}

// ------------------------------------------------------------------ //
//  ReqwestTransport (production)                                      //
// ------------------------------------------------------------------ //

/// Pooled `reqwest` client with a per-call timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl UpstreamTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<UpstreamResponse, TransportError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError(describe(e)))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError(describe(e)))?;
        Ok(UpstreamResponse { status, body })
    }
}

fn describe(err: reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else {
        // The URL carries the signature.
        err.without_url().to_string()
    }
}

// ------------------------------------------------------------------ //
//  FakeTransport (for tests)                                          //
// ------------------------------------------------------------------ //

/// In-memory transport answering from scripted replies keyed by the
/// upstream `function` parameter, and recording every URL it was given.
#[derive(Debug, Default, Clone)]
pub struct FakeTransport {
    replies: Arc<Mutex<HashMap<String, VecDeque<Result<UpstreamResponse, TransportError>>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next call to `function`.
    pub fn reply(&self, function: &str, status: u16, body: impl Into<String>) -> &Self {
        self.push(
            function,
            Ok(UpstreamResponse {
                status,
                body: body.into(),
            }),
        )
    }

    /// Queue a network failure for the next call to `function`.
    pub fn fail(&self, function: &str, message: &str) -> &Self {
        self.push(function, Err(TransportError(message.to_string())))
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// URLs requested for `function` only.
    pub fn requests_for(&self, function: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|url| function_of(url).as_deref() == Some(function))
            .collect()
    }

    fn push(&self, function: &str, reply: Result<UpstreamResponse, TransportError>) -> &Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(function.to_string())
            .or_default()
            .push_back(reply);
        self
    }
}

#[async_trait]
impl UpstreamTransport for FakeTransport {
    async fn get(&self, url: &str) -> Result<UpstreamResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        let function = function_of(url).unwrap_or_default();
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&function)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError(format!("no scripted reply for `{function}`"))))
    }
}

/// Value of the `function` query parameter of a signed URL.
pub fn function_of(url: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "function")
        .map(|(_, value)| urlencoding::decode(value).map_or_else(|_| value.to_string(), |v| v.into_owned()))
}
