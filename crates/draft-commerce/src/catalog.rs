//! The catalog seam: SKU resolution and product tags.

use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};
use crate::money::Money;
use async_trait::async_trait;
use std::collections::HashMap;

/// A sellable variant as the catalog reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogVariant {
    /// Variant identifier.
    pub id: VariantId,
    /// The SKU the catalog has on file.
    pub sku: String,
    /// Catalog base price.
    pub price: Money,
}

impl CatalogVariant {
    pub fn new(id: impl Into<VariantId>, sku: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            sku: sku.into(),
            price,
        }
    }

    /// Whether this variant is the one asked for. Lookups that come back with
    /// a different SKU count as misses.
    pub fn matches_sku(&self, sku: &str) -> bool {
        self.sku.trim().eq_ignore_ascii_case(sku.trim())
    }
}

/// Read access to the commerce platform's catalog.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Resolve a SKU to a variant. `Ok(None)` is a clean miss.
    async fn lookup_by_sku(&self, sku: &str) -> Result<Option<CatalogVariant>, CommerceError>;

    /// Tags on a product, in the order the catalog lists them.
    async fn product_tags(&self, product_id: &ProductId) -> Result<Vec<String>, CommerceError>;
}

/// Catalog held in memory. Used for local runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    variants: HashMap<String, CatalogVariant>,
    tags: HashMap<ProductId, Vec<String>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variant under its SKU.
    pub fn with_variant(mut self, variant: CatalogVariant) -> Self {
        self.variants
            .insert(variant.sku.trim().to_ascii_uppercase(), variant);
        self
    }

    /// Register tags for a product.
    pub fn with_tags<I, S>(mut self, product_id: impl Into<ProductId>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .insert(product_id.into(), tags.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl CatalogLookup for StaticCatalog {
    async fn lookup_by_sku(&self, sku: &str) -> Result<Option<CatalogVariant>, CommerceError> {
        Ok(self
            .variants
            .get(&sku.trim().to_ascii_uppercase())
            .filter(|variant| variant.matches_sku(sku))
            .cloned())
    }

    async fn product_tags(&self, product_id: &ProductId) -> Result<Vec<String>, CommerceError> {
        self.tags
            .get(product_id)
            .cloned()
            .ok_or_else(|| CommerceError::CatalogUnavailable(format!("product {product_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_sku_is_case_insensitive() {
        let variant = CatalogVariant::new("1", "Widget-1", Money::new(100));
        assert!(variant.matches_sku("WIDGET-1"));
        assert!(variant.matches_sku(" widget-1 "));
        assert!(!variant.matches_sku("WIDGET-10"));
    }

    #[tokio::test]
    async fn test_static_catalog_lookup() {
        let catalog = StaticCatalog::new()
            .with_variant(CatalogVariant::new("1", "WIDGET1", Money::new(10000)));

        let hit = catalog.lookup_by_sku("widget1").await.unwrap();
        assert_eq!(hit.map(|v| v.price), Some(Money::new(10000)));
        assert_eq!(catalog.lookup_by_sku("GADGET").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_static_catalog_tags() {
        let catalog = StaticCatalog::new().with_tags("99", ["Sale", "5% OFF"]);

        let tags = catalog.product_tags(&ProductId::new("99")).await.unwrap();
        assert_eq!(tags, vec!["Sale".to_string(), "5% OFF".to_string()]);
        assert!(catalog.product_tags(&ProductId::new("100")).await.is_err());
    }
}
