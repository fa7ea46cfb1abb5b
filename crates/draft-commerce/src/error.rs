//! Commerce error types.

use thiserror::Error;

/// Errors that can occur while building or submitting a draft order.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// The request was malformed or carried no rows.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Normalization left nothing worth submitting.
    #[error("Draft order has no line items and no shipping line")]
    EmptyOrder,

    /// A monetary amount could not be parsed.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// A discount percentage could not be parsed.
    #[error("Invalid percentage: {0:?}")]
    InvalidPercent(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// The catalog could not answer a lookup.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The order-submission sink rejected the draft or could not be reached.
    #[error("Upstream failure{}: {details}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Upstream { status: Option<u16>, details: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CommerceError {
    /// Build an upstream failure from an HTTP status and response text.
    pub fn upstream(status: Option<u16>, details: impl Into<String>) -> Self {
        CommerceError::Upstream {
            status,
            details: details.into(),
        }
    }

    /// Whether the caller sent something unusable (as opposed to a server-side fault).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CommerceError::Validation(_)
                | CommerceError::EmptyOrder
                | CommerceError::InvalidAmount(_)
                | CommerceError::InvalidPercent(_)
        )
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
