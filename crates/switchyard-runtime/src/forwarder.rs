//! HTTP forwarding of accepted payloads
//!
//! A single POST per request, no retries. Any HTTP response counts as a
//! successful forward; only transport failures are errors, classified by
//! [`ForwardErrorKind`].

use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::{Duration, Instant};

/// User agent sent on every forwarded request
pub const USER_AGENT: &str = concat!("switchyard/", env!("CARGO_PKG_VERSION"));

/// Inbound headers copied onto the forwarded request (matched case-insensitively)
pub const FORWARDED_HEADERS: [&str; 3] = ["x-request-id", "x-correlation-id", "x-trace-id"];

const MAX_IDLE_PER_HOST: usize = 20;

/// Transport failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForwardErrorKind {
    ConnectionTimeout,
    ReadTimeout,
    ConnectionError,
    RequestError,
    UnexpectedError,
}

impl ForwardErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardErrorKind::ConnectionTimeout => "CONNECTION_TIMEOUT",
            ForwardErrorKind::ReadTimeout => "READ_TIMEOUT",
            ForwardErrorKind::ConnectionError => "CONNECTION_ERROR",
            ForwardErrorKind::RequestError => "REQUEST_ERROR",
            ForwardErrorKind::UnexpectedError => "UNEXPECTED_ERROR",
        }
    }
}

impl fmt::Display for ForwardErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one forwarding attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardingOutcome {
    pub success: bool,
    pub status_code: Option<u16>,
    pub headers: BTreeMap<String, String>,

    #[serde(skip)]
    pub body: Vec<u8>,

    /// Milliseconds from just before dispatch until the body was read or the request failed
    pub response_time_ms: f64,

    pub error_kind: Option<ForwardErrorKind>,
    pub error_message: Option<String>,
    pub destination_url: String,
}

impl ForwardingOutcome {
    fn failure(url: &str, kind: ForwardErrorKind, message: String, started: Instant) -> Self {
        Self {
            success: false,
            status_code: None,
            headers: BTreeMap::new(),
            body: Vec::new(),
            response_time_ms: elapsed_ms(started),
            error_kind: Some(kind),
            error_message: Some(message),
            destination_url: url.to_string(),
        }
    }

    /// Response body as JSON when it parses, otherwise as (lossy) text
    pub fn body_value(&self) -> Value {
        if self.body.is_empty() {
            return Value::String(String::new());
        }
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&self.body).into_owned()))
    }
}

/// Sends payloads to destinations
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// POST `payload` to `url`, carrying the allow-listed inbound headers
    async fn forward(
        &self,
        url: &str,
        payload: &Value,
        inbound_headers: &HashMap<String, String>,
    ) -> ForwardingOutcome;
}

/// [`Forwarder`] backed by a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct RequestForwarder {
    client: reqwest::Client,
    timeout: Duration,
}

impl RequestForwarder {
    /// Create a forwarder whose connect and total timeouts are both `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PipelineError::Internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    fn classify(&self, error: &reqwest::Error) -> (ForwardErrorKind, String) {
        let kind = classify_failure(FailureSignals::from_error(error));
        let seconds = self.timeout.as_secs_f64();
        let message = match kind {
            ForwardErrorKind::ConnectionTimeout => {
                format!("Connection timeout after {} seconds", seconds)
            }
            ForwardErrorKind::ReadTimeout => format!("Read timeout after {} seconds", seconds),
            ForwardErrorKind::ConnectionError => format!("Connection error: {}", error),
            ForwardErrorKind::RequestError => format!("Request error: {}", error),
            ForwardErrorKind::UnexpectedError => format!("Unexpected error: {}", error),
        };
        (kind, message)
    }
}

/// What a transport error says about where it happened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FailureSignals {
    timeout: bool,
    connect: bool,
    /// The peer closed, reset or abandoned an established connection
    connection_dropped: bool,
    request: bool,
}

impl FailureSignals {
    fn from_error(error: &reqwest::Error) -> Self {
        Self {
            timeout: error.is_timeout(),
            connect: error.is_connect(),
            connection_dropped: is_connection_dropped(error),
            request: error.is_request()
                || error.is_builder()
                || error.is_body()
                || error.is_decode(),
        }
    }
}

/// Most specific category first
fn classify_failure(signals: FailureSignals) -> ForwardErrorKind {
    if signals.timeout && signals.connect {
        ForwardErrorKind::ConnectionTimeout
    } else if signals.timeout {
        ForwardErrorKind::ReadTimeout
    } else if signals.connect || signals.connection_dropped {
        ForwardErrorKind::ConnectionError
    } else if signals.request {
        ForwardErrorKind::RequestError
    } else {
        ForwardErrorKind::UnexpectedError
    }
}

fn is_connection_dropped(error: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = std::error::Error::source(error);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if is_dropped_io_kind(io.kind()) {
                return true;
            }
        }
        if let Some(hyper_err) = err.downcast_ref::<hyper::Error>() {
            if hyper_err.is_canceled() || hyper_err.is_incomplete_message() {
                return true;
            }
        }
        source = err.source();
    }
    false
}

fn is_dropped_io_kind(kind: std::io::ErrorKind) -> bool {
    use std::io::ErrorKind;
    matches!(
        kind,
        ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof
    )
}

#[async_trait]
impl Forwarder for RequestForwarder {
    async fn forward(
        &self,
        url: &str,
        payload: &Value,
        inbound_headers: &HashMap<String, String>,
    ) -> ForwardingOutcome {
        let body = match serde_json::to_vec(payload) {
            Ok(body) => body,
            Err(e) => {
                return ForwardingOutcome::failure(
                    url,
                    ForwardErrorKind::UnexpectedError,
                    format!("Unexpected error: {}", e),
                    Instant::now(),
                )
            }
        };

        let mut request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        for (name, value) in select_forwarded_headers(inbound_headers) {
            request = request.header(name, value);
        }

        tracing::debug!(destination_url = %url, "Forwarding request");
        let started = Instant::now();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let (kind, message) = self.classify(&e);
                tracing::warn!(destination_url = %url, error_type = %kind, error = %e, "Forwarding failed");
                return ForwardingOutcome::failure(url, kind, message, started);
            }
        };

        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                let (kind, message) = self.classify(&e);
                tracing::warn!(destination_url = %url, error_type = %kind, error = %e, "Reading destination response failed");
                return ForwardingOutcome::failure(url, kind, message, started);
            }
        };

        let response_time_ms = elapsed_ms(started);
        tracing::info!(
            destination_url = %url,
            status_code = status,
            response_time_ms,
            "Request forwarded"
        );

        ForwardingOutcome {
            success: true,
            status_code: Some(status),
            headers,
            body,
            response_time_ms,
            error_kind: None,
            error_message: None,
            destination_url: url.to_string(),
        }
    }
}

/// Pick the allow-listed headers out of the inbound set, normalized to lowercase
pub fn select_forwarded_headers(inbound: &HashMap<String, String>) -> Vec<(&'static str, String)> {
    FORWARDED_HEADERS
        .iter()
        .filter_map(|wanted| {
            inbound
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
                .map(|(_, value)| (*wanted, value.clone()))
        })
        .collect()
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
