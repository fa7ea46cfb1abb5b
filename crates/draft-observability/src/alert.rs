//! Failure alerting.
//!
//! Alerts are fire-and-forget: they run on their own task and a failing
//! sink is logged, never surfaced to the request that raised the alert.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::request_id::RequestId;

/// A notification about a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub subject: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            request_id: None,
            raised_at: Utc::now(),
        }
    }

    pub fn with_request_id(mut self, request_id: &RequestId) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

/// Alert delivery failure.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("Alert delivery failed: {0}")]
    Delivery(String),
}

/// Somewhere alerts go.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn notify(&self, alert: &Alert) -> Result<(), AlertError>;
}

/// Writes alerts to the log at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, alert: &Alert) -> Result<(), AlertError> {
        tracing::error!(
            subject = %alert.subject,
            request_id = alert.request_id.as_deref().unwrap_or("-"),
            "{}",
            alert.body
        );
        Ok(())
    }
}

/// Hands alerts to a sink on a background task.
#[derive(Clone)]
pub struct AlertDispatcher {
    sink: Arc<dyn AlertSink>,
    subject_prefix: String,
}

impl AlertDispatcher {
    pub fn new(sink: Arc<dyn AlertSink>) -> Self {
        Self {
            sink,
            subject_prefix: String::new(),
        }
    }

    /// Prefix every subject, e.g. `"[draft-bridge] "`.
    pub fn with_subject_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.subject_prefix = prefix.into();
        self
    }

    /// Send an alert without waiting for it.
    ///
    /// The returned handle is only useful to tests; the task never fails.
    pub fn fire(&self, mut alert: Alert) -> JoinHandle<()> {
        alert.subject = format!("{}{}", self.subject_prefix, alert.subject);
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(e) = sink.notify(&alert).await {
                tracing::warn!(sink = sink.name(), subject = %alert.subject, error = %e, "alert not delivered");
            }
        })
    }
}

impl std::fmt::Debug for AlertDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertDispatcher")
            .field("sink", &self.sink.name())
            .field("subject_prefix", &self.subject_prefix)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<Alert>>,
    }

    #[async_trait]
    impl AlertSink for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn notify(&self, alert: &Alert) -> Result<(), AlertError> {
            self.seen.lock().unwrap().push(alert.clone());
            Ok(())
        }
    }

    struct BrokenSink;

    #[async_trait]
    impl AlertSink for BrokenSink {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn notify(&self, _alert: &Alert) -> Result<(), AlertError> {
            Err(AlertError::Delivery("smtp down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_dispatch_prefixes_subject() {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = AlertDispatcher::new(sink.clone()).with_subject_prefix("[bridge] ");

        let request_id = RequestId::from_header(Some("req-9"));
        dispatcher
            .fire(Alert::new("Draft order failed", "HTTP 422").with_request_id(&request_id))
            .await
            .unwrap();

        let seen = sink.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].subject, "[bridge] Draft order failed");
        assert_eq!(seen[0].request_id.as_deref(), Some("req-9"));
    }

    #[tokio::test]
    async fn test_broken_sink_is_swallowed() {
        let dispatcher = AlertDispatcher::new(Arc::new(BrokenSink));
        let handle = dispatcher.fire(Alert::new("subject", "body"));
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_log_sink_accepts_everything() {
        assert!(LogAlertSink.notify(&Alert::new("s", "b")).await.is_ok());
    }

    #[test]
    fn test_alert_serialization() {
        let alert = Alert::new("s", "b");
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["subject"], "s");
        assert!(json.get("request_id").is_none());
        assert!(json["raised_at"].is_string());
    }
}
