//! The order-submission seam.

use crate::draft::DraftOrderBody;
use crate::error::CommerceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What the platform hands back for an accepted draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftConfirmation {
    /// Platform id of the created draft.
    #[serde(default)]
    pub id: Option<u64>,
    /// Checkout/invoice link for the customer.
    pub invoice_url: String,
}

/// Accepts a normalized draft order and returns a confirmation.
///
/// Implementations must not retry on their own; failures surface as
/// [`CommerceError::Upstream`].
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn submit(&self, body: &DraftOrderBody) -> Result<DraftConfirmation, CommerceError>;
}
