//! Alert delivery to an automation webhook.

use async_trait::async_trait;
use draft_observability::{Alert, AlertError, AlertSink};

use crate::dependency::Dependency;
use crate::{FetchClient, FetchError};

/// Posts each alert as JSON to a webhook (an automation flow that mails the
/// team, a chat incoming-hook, ...).
#[derive(Debug, Clone)]
pub struct WebhookAlertSink {
    client: FetchClient,
    url: String,
}

impl WebhookAlertSink {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = FetchClient::new()?.with_default_timeout(Dependency::Alerts.default_timeout());
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AlertSink for WebhookAlertSink {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn notify(&self, alert: &Alert) -> Result<(), AlertError> {
        self.client
            .post(self.url.as_str())
            .json(alert)
            .map_err(|e| AlertError::Delivery(e.to_string()))?
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AlertError::Delivery(e.to_string()))?;
        Ok(())
    }
}
