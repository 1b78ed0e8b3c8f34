//! Webhook delivery over HTTP/HTTPS
//!
//! ## Overview
//!
//! POSTs each notification as JSON to a single endpoint. The request itself
//! is made with the blocking `ureq` client on tokio's blocking pool, so
//! neither the thread that scored the sample nor a runtime worker ever
//! waits on the network.
//!
//! ## Retry Policy
//!
//! | response              | action            |
//! |-----------------------|-------------------|
//! | 2xx                   | done              |
//! | 429, 5xx              | retry with backoff|
//! | other 4xx             | fail immediately  |
//! | transport error       | retry with backoff|
//!
//! After `max_retries` retries the notification is dropped and counted as
//! failed.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use aura_connectors::{NotificationSink, WebhookConfig, WebhookNotifier};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WebhookConfig::new("https://alerts.example.com/aura")
//!     .bearer_token("your-api-token")
//!     .timeout_secs(5)
//!     .max_retries(2);
//!
//! let notifier = WebhookNotifier::new(config)?;
//! notifier.notify(&serde_json::json!({"entity_id": "CR-01", "kind": "machine"}));
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::{lock, AsyncConnector, ConnectionStats, NotificationSink};

#[derive(Debug, Error)]
pub enum HttpError {
    /// Connection, DNS, TLS or timeout failure
    #[error("webhook request failed: {0}")]
    Request(String),

    /// Endpoint answered with a non-2xx status
    #[error("webhook returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("payload is not valid JSON: {0}")]
    Serialization(String),

    #[error("invalid webhook configuration: {0}")]
    Config(String),
}

impl HttpError {
    /// Worth another attempt: throttling, server faults and transport errors
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::ServerError { status, .. } => *status == 429 || *status >= 500,
            Self::Serialization(_) | Self::Config(_) => false,
        }
    }
}

impl From<ureq::Error> for HttpError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(status, response) => Self::ServerError {
                status,
                message: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => Self::Request(transport.to_string()),
        }
    }
}

/// Where and how to POST notifications
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub auth: AuthMethod,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry
    pub backoff_base: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthMethod {
    None,
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `Authorization: Basic <base64(user:pass)>`
    Basic { username: String, password: String },
    /// Arbitrary header carrying a key
    ApiKey { header: String, value: String },
}

impl AuthMethod {
    /// Header name and value to attach, if any
    fn header(&self) -> Option<(String, String)> {
        match self {
            Self::None => None,
            Self::Bearer(token) => Some(("Authorization".into(), format!("Bearer {}", token))),
            Self::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{}:{}", username, password));
                Some(("Authorization".into(), format!("Basic {}", encoded)))
            }
            Self::ApiKey { header, value } => Some((header.clone(), value.clone())),
        }
    }
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(10),
            auth: AuthMethod::None,
            headers: HashMap::new(),
            max_retries: 3,
            backoff_base: Duration::from_millis(200),
            user_agent: format!("Aura/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.auth(AuthMethod::Bearer(token.into()))
    }

    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth(AuthMethod::Basic { username: username.into(), password: password.into() })
    }

    pub fn api_key(self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth(AuthMethod::ApiKey { header: header.into(), value: value.into() })
    }

    pub fn auth(mut self, auth: AuthMethod) -> Self {
        self.auth = auth;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(1 << attempt.saturating_sub(1).min(16))
    }

    fn validate(&self) -> Result<(), HttpError> {
        if self.url.starts_with("http://") || self.url.starts_with("https://") {
            Ok(())
        } else {
            Err(HttpError::Config(format!("{} is not an http(s) URL", self.url)))
        }
    }
}

/// Blocking ureq client driven from async code
pub struct WebhookConnector {
    config: WebhookConfig,
    agent: ureq::Agent,
    stats: Mutex<ConnectionStats>,
}

impl WebhookConnector {
    pub fn new(config: WebhookConfig) -> Result<Self, HttpError> {
        config.validate()?;
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();
        Ok(Self { config, agent, stats: Mutex::new(ConnectionStats::default()) })
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    /// POST one payload, retrying transient failures with backoff
    pub async fn deliver(&self, payload: &serde_json::Value) -> Result<(), HttpError> {
        let body = serde_json::to_string(payload).map_err(|e| HttpError::Serialization(e.to_string()))?;

        let mut attempt = 0;
        let outcome = loop {
            match self.post(body.clone()).await {
                Ok(()) => break Ok(()),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    log::debug!("webhook attempt {} failed ({}), retrying", attempt, e);
                    lock(&self.stats).retries += 1;
                    tokio::time::sleep(self.config.backoff(attempt)).await;
                }
                Err(e) => break Err(e),
            }
        };

        let mut stats = lock(&self.stats);
        match &outcome {
            Ok(()) => {
                stats.messages_sent += 1;
                stats.bytes_sent += body.len() as u64;
            }
            Err(e) => {
                stats.messages_failed += 1;
                stats.last_error = Some(e.to_string());
            }
        }
        outcome
    }

    /// One attempt, run on the blocking pool
    async fn post(&self, body: String) -> Result<(), HttpError> {
        let request = self.request();
        tokio::task::spawn_blocking(move || request.send_string(&body).map(drop).map_err(HttpError::from))
            .await
            .map_err(|e| HttpError::Request(format!("delivery task failed: {}", e)))?
    }

    fn request(&self) -> ureq::Request {
        let mut request = self.agent.post(&self.config.url).set("Content-Type", "application/json");
        if let Some((name, value)) = self.config.auth.header() {
            request = request.set(&name, &value);
        }
        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }
        request
    }
}

#[async_trait::async_trait]
impl AsyncConnector for WebhookConnector {
    type Error = HttpError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let payload = serde_json::from_slice(data).map_err(|e| HttpError::Serialization(e.to_string()))?;
        self.deliver(&payload).await
    }

    /// Stateless transport
    fn is_connected(&self) -> bool {
        true
    }

    fn stats(&self) -> ConnectionStats {
        lock(&self.stats).clone()
    }
}

/// Fire-and-forget webhook sink
///
/// Each notification is delivered on its own task of the current tokio
/// runtime. Outside a runtime there is nothing to run the delivery on, so
/// the notification is dropped and counted as failed.
#[derive(Clone)]
pub struct WebhookNotifier {
    connector: Arc<WebhookConnector>,
    dropped: Arc<AtomicU64>,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self, HttpError> {
        Ok(Self::from_connector(Arc::new(WebhookConnector::new(config)?)))
    }

    pub fn from_connector(connector: Arc<WebhookConnector>) -> Self {
        Self { connector, dropped: Arc::new(AtomicU64::new(0)) }
    }

    pub fn connector(&self) -> &Arc<WebhookConnector> {
        &self.connector
    }
}

impl NotificationSink for WebhookNotifier {
    fn notify(&self, payload: &serde_json::Value) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            log::warn!("no tokio runtime, dropping notification for {}", self.connector.config.url);
            return;
        };

        let connector = Arc::clone(&self.connector);
        let payload = payload.clone();
        runtime.spawn(async move {
            if let Err(e) = connector.deliver(&payload).await {
                log::warn!("webhook delivery to {} failed: {}", connector.config.url, e);
            }
        });
    }

    fn stats(&self) -> ConnectionStats {
        let mut stats = AsyncConnector::stats(self.connector.as_ref());
        stats.messages_failed += self.dropped.load(Ordering::Relaxed);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = WebhookConfig::new("https://alerts.example.com/aura")
            .bearer_token("site-7")
            .timeout_secs(3)
            .max_retries(1)
            .header("X-Site", "north-yard");

        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.headers.get("X-Site").map(String::as_str), Some("north-yard"));
        assert_eq!(config.auth, AuthMethod::Bearer("site-7".into()));
    }

    #[test]
    fn auth_headers() {
        let basic = AuthMethod::Basic { username: "aura".into(), password: "pw".into() };
        assert_eq!(basic.header(), Some(("Authorization".into(), "Basic YXVyYTpwdw==".into())));
        let key = AuthMethod::ApiKey { header: "X-Api-Key".into(), value: "k".into() };
        assert_eq!(key.header(), Some(("X-Api-Key".into(), "k".into())));
        assert_eq!(AuthMethod::None.header(), None);
    }

    #[test]
    fn transient_errors() {
        assert!(HttpError::Request("reset".into()).is_transient());
        assert!(HttpError::ServerError { status: 503, message: String::new() }.is_transient());
        assert!(HttpError::ServerError { status: 429, message: String::new() }.is_transient());
        assert!(!HttpError::ServerError { status: 404, message: String::new() }.is_transient());
    }

    #[test]
    fn backoff_doubles() {
        let config = WebhookConfig::new("http://localhost").backoff_base(Duration::from_millis(100));
        assert_eq!(config.backoff(1), Duration::from_millis(100));
        assert_eq!(config.backoff(2), Duration::from_millis(200));
        assert_eq!(config.backoff(3), Duration::from_millis(400));
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            WebhookConnector::new(WebhookConfig::new("mqtt://broker/aura")),
            Err(HttpError::Config(_))
        ));
        assert!(WebhookConnector::new(WebhookConfig::new("https://alerts.example.com")).is_ok());
    }

    #[test]
    fn notify_without_runtime_is_dropped() {
        let notifier = WebhookNotifier::new(WebhookConfig::new("http://127.0.0.1:9/hook")).unwrap();
        notifier.notify(&serde_json::json!({"kind": "worker"}));
        let stats = notifier.stats();
        assert_eq!(stats.messages_failed, 1);
        assert_eq!(stats.messages_sent, 0);
    }
}
