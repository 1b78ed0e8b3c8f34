//! Outbound Notification Connectors
//!
//! ## Overview
//!
//! Every scored sample Aura records is also pushed to downstream consumers:
//! dashboards, alerting pipelines, data lakes. Delivery is best effort and at
//! most once. A consumer being down must never slow ingest or fail it, so a
//! [`NotificationSink`] has no error channel back to the caller; failures are
//! logged and counted in [`ConnectionStats`].
//!
//! ## Sinks
//!
//! ### Webhook (feature `http`)
//!
//! **When to use:**
//! - Integration with existing web services
//! - Firewall-friendly environments
//!
//! **Characteristics:**
//! - JSON POST per notification, bounded timeout
//! - Retries on 5xx, 429 and transport errors
//! - Runs on the ambient tokio runtime; without one, notifications are
//!   dropped and counted as failed
//!
//! ### Recording
//!
//! Keeps every payload in memory. Used by tests and by embedders that poll
//! instead of subscribing.
//!
//! ## Retry Logic
//!
//! Exponential backoff:
//! ```text
//! retry_delay = base * 2^attempt
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use aura_connectors::{NotificationSink, RecordingSink};
//!
//! let sink = RecordingSink::new();
//! sink.notify(&serde_json::json!({"entity_id": "WK-1", "kind": "worker"}));
//!
//! assert_eq!(sink.payloads().len(), 1);
//! assert_eq!(sink.stats().messages_sent, 1);
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use thiserror::Error;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{AuthMethod, HttpError, WebhookConfig, WebhookConnector, WebhookNotifier};

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Not connected")]
    NotConnected,

    #[error("Timeout")]
    Timeout,

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Destination for outbound notification payloads
///
/// Implementations must not block the caller for network I/O and must not
/// panic; delivery failures stay inside the sink.
pub trait NotificationSink: Send + Sync {
    /// Hand one payload to the sink
    fn notify(&self, payload: &serde_json::Value);

    /// Delivery statistics so far
    fn stats(&self) -> ConnectionStats;
}

/// Async transport underneath a sink
///
/// This is the preferred trait for new network implementations
#[cfg(feature = "std")]
#[async_trait::async_trait]
pub trait AsyncConnector: Send + Sync {
    type Error;

    /// Send one JSON document asynchronously
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Get connection statistics
    fn stats(&self) -> ConnectionStats;
}

/// Connection statistics common to all connectors
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ConnectionStats {
    /// Total messages sent successfully
    pub messages_sent: u64,
    /// Total messages failed to send
    pub messages_failed: u64,
    /// Total bytes sent
    pub bytes_sent: u64,
    /// Retries performed across all messages
    pub retries: u64,
    /// Last error message
    pub last_error: Option<String>,
}

/// Lock a mutex, recovering the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sink that keeps every payload in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    payloads: Mutex<Vec<serde_json::Value>>,
    stats: Mutex<ConnectionStats>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every payload received, oldest first
    pub fn payloads(&self) -> Vec<serde_json::Value> {
        lock(&self.payloads).clone()
    }

    /// Most recent payload
    pub fn last(&self) -> Option<serde_json::Value> {
        lock(&self.payloads).last().cloned()
    }

    /// Remove and return every payload received so far
    pub fn drain(&self) -> Vec<serde_json::Value> {
        std::mem::take(&mut *lock(&self.payloads))
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, payload: &serde_json::Value) {
        let bytes = payload.to_string().len() as u64;
        lock(&self.payloads).push(payload.clone());
        let mut stats = lock(&self.stats);
        stats.messages_sent += 1;
        stats.bytes_sent += bytes;
    }

    fn stats(&self) -> ConnectionStats {
        lock(&self.stats).clone()
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _payload: &serde_json::Value) {}

    fn stats(&self) -> ConnectionStats {
        ConnectionStats::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.notify(&json!({"n": 1}));
        sink.notify(&json!({"n": 2}));

        assert_eq!(sink.payloads(), vec![json!({"n": 1}), json!({"n": 2})]);
        assert_eq!(sink.last(), Some(json!({"n": 2})));
        assert_eq!(sink.stats().messages_sent, 2);
        assert_eq!(sink.stats().bytes_sent, 14);
    }

    #[test]
    fn drain_empties() {
        let sink = RecordingSink::new();
        sink.notify(&json!(null));
        assert_eq!(sink.drain().len(), 1);
        assert!(sink.payloads().is_empty());
        assert_eq!(sink.stats().messages_sent, 1);
    }

    #[test]
    fn sinks_are_object_safe() {
        let sinks: Vec<Box<dyn NotificationSink>> = vec![Box::new(NullSink), Box::new(RecordingSink::new())];
        for sink in &sinks {
            sink.notify(&json!({}));
        }
        assert_eq!(sinks[0].stats(), ConnectionStats::default());
        assert_eq!(sinks[1].stats().messages_sent, 1);
    }
}
