//! Named upstream dependencies.

use std::time::Duration;

/// The services the bridge calls out to.
///
/// Each carries a default timeout; configuration may override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// Variant-by-SKU lookups.
    Catalog,
    /// Product tag reads for legacy discounts.
    ProductTags,
    /// Draft-order creation.
    DraftOrders,
    /// Alert webhook.
    Alerts,
}

impl Dependency {
    /// Get the default timeout for this dependency.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::Catalog | Self::ProductTags => Duration::from_millis(2500),
            Self::DraftOrders => Duration::from_secs(10),
            Self::Alerts => Duration::from_secs(5),
        }
    }

    /// Get the name of this dependency.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::ProductTags => "product_tags",
            Self::DraftOrders => "draft_orders",
            Self::Alerts => "alerts",
        }
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
