//! Draft-order submission.

use std::time::Duration;

use async_trait::async_trait;
use draft_commerce::draft::{DraftConfirmation, DraftOrderBody, OrderSink};
use draft_commerce::CommerceError;
use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;
use crate::response::Response;
use crate::shop::ShopSettings;
use crate::{FetchClient, FetchError};

/// [`OrderSink`] that creates draft orders through the admin REST API.
///
/// One attempt per call. Any non-2xx answer or transport failure becomes
/// [`CommerceError::Upstream`] carrying whatever text the shop returned.
#[derive(Debug, Clone)]
pub struct PlatformDraftOrders {
    client: FetchClient,
    shop: ShopSettings,
    timeout: Option<Duration>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    draft_order: &'a DraftOrderBody,
}

#[derive(Deserialize)]
struct Created {
    draft_order: DraftConfirmation,
}

impl PlatformDraftOrders {
    pub fn new(shop: ShopSettings) -> Result<Self, FetchError> {
        let client = shop.client(Dependency::DraftOrders.default_timeout())?;
        Ok(Self {
            client,
            shop,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl OrderSink for PlatformDraftOrders {
    async fn submit(&self, body: &DraftOrderBody) -> Result<DraftConfirmation, CommerceError> {
        let started = std::time::Instant::now();
        let response = self
            .client
            .post(self.shop.admin_path("draft_orders.json"))
            .for_dependency(Dependency::DraftOrders, self.timeout)
            .json(&Envelope { draft_order: body })
            .map_err(|e| CommerceError::Serialization(e.to_string()))?
            .send()
            .await
            .map_err(|e| CommerceError::upstream(e.status(), e.to_string()))?;

        tracing::info!(
            dependency = %Dependency::DraftOrders,
            status = response.status,
            line_items = body.line_items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "draft order submitted"
        );
        confirmation_from(response)
    }
}

/// Read the confirmation out of a draft-order response.
pub fn confirmation_from(response: Response) -> Result<DraftConfirmation, CommerceError> {
    if !response.is_success() {
        return Err(CommerceError::upstream(
            Some(response.status),
            response.diagnostic_text(),
        ));
    }
    let created: Created = response.json().map_err(|e| {
        CommerceError::upstream(Some(response.status), format!("unreadable confirmation: {e}"))
    })?;
    Ok(created.draft_order)
}
