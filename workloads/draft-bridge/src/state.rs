//! Shared application state.

use std::sync::Arc;

use draft_commerce::catalog::CatalogLookup;
use draft_commerce::draft::OrderSink;
use draft_data::{FetchError, PlatformCatalog, PlatformDraftOrders, ShopSettings, WebhookAlertSink};
use draft_observability::{AlertDispatcher, AlertSink, LogAlertSink};

use crate::config::BridgeConfig;

/// Everything a handler needs. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogLookup>,
    pub orders: Arc<dyn OrderSink>,
    pub alerts: AlertDispatcher,
    /// Note attached to drafts built from quotes.
    pub quote_note: Option<String>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogLookup>,
        orders: Arc<dyn OrderSink>,
        alerts: AlertDispatcher,
    ) -> Self {
        Self {
            catalog,
            orders,
            alerts,
            quote_note: None,
        }
    }

    pub fn with_quote_note(mut self, note: Option<String>) -> Self {
        self.quote_note = note;
        self
    }

    /// Wire the platform clients described by `config`.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, FetchError> {
        let shop = ShopSettings::new(&config.shop.domain, &config.shop.access_token)
            .with_api_version(&config.shop.api_version);

        let catalog = PlatformCatalog::new(shop.clone())?.with_timeout(config.catalog.timeout());
        let orders = PlatformDraftOrders::new(shop)?.with_timeout(config.submission.timeout());

        let sink: Arc<dyn AlertSink> = match &config.alerts.webhook_url {
            Some(url) => Arc::new(WebhookAlertSink::new(url)?),
            None => Arc::new(LogAlertSink),
        };
        let alerts = AlertDispatcher::new(sink).with_subject_prefix(&config.alerts.subject_prefix);

        Ok(Self::new(Arc::new(catalog), Arc::new(orders), alerts)
            .with_quote_note(config.submission.note.clone()))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("alerts", &self.alerts)
            .field("quote_note", &self.quote_note)
            .finish_non_exhaustive()
    }
}
