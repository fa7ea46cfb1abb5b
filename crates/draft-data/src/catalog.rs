//! Catalog lookups against the shop's admin API.

use std::time::Duration;

use async_trait::async_trait;
use draft_commerce::catalog::{CatalogLookup, CatalogVariant};
use draft_commerce::discount::split_tags;
use draft_commerce::{CommerceError, Money, ProductId, VariantId};
use serde::Deserialize;
use serde_json::json;

use crate::dependency::Dependency;
use crate::shop::ShopSettings;
use crate::{FetchClient, FetchError};

const VARIANTS_BY_SKU: &str = "query VariantsBySku($query: String!) { \
productVariants(first: 5, query: $query) { edges { node { id sku price } } } }";

/// [`CatalogLookup`] backed by the shop's admin API.
///
/// SKUs resolve through GraphQL; product tags come from the REST product
/// resource.
#[derive(Debug, Clone)]
pub struct PlatformCatalog {
    client: FetchClient,
    shop: ShopSettings,
    timeout: Option<Duration>,
}

impl PlatformCatalog {
    pub fn new(shop: ShopSettings) -> Result<Self, FetchError> {
        let client = shop.client(Dependency::Catalog.default_timeout())?;
        Ok(Self {
            client,
            shop,
            timeout: None,
        })
    }

    /// Override the per-lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn fetch_variants(&self, sku: &str) -> Result<VariantsResponse, FetchError> {
        let body = json!({
            "query": VARIANTS_BY_SKU,
            "variables": { "query": sku_search(sku) },
        });
        self.client
            .post(self.shop.graphql_path())
            .for_dependency(Dependency::Catalog, self.timeout)
            .json(&body)?
            .send()
            .await?
            .error_for_status()?
            .json()
    }

    async fn fetch_product(&self, product_id: &ProductId) -> Result<ProductResponse, FetchError> {
        let id = product_id.numeric().map(|n| n.to_string());
        let id = id.as_deref().unwrap_or(product_id.as_str());
        self.client
            .get(self.shop.admin_path(&format!("products/{id}.json?fields=id,tags")))
            .for_dependency(Dependency::ProductTags, self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
    }
}

#[async_trait]
impl CatalogLookup for PlatformCatalog {
    async fn lookup_by_sku(&self, sku: &str) -> Result<Option<CatalogVariant>, CommerceError> {
        let response = self
            .fetch_variants(sku)
            .await
            .map_err(|e| CommerceError::CatalogUnavailable(format!("sku {sku}: {e}")))?;
        pick_variant(response, sku)
    }

    async fn product_tags(&self, product_id: &ProductId) -> Result<Vec<String>, CommerceError> {
        let response = self
            .fetch_product(product_id)
            .await
            .map_err(|e| CommerceError::CatalogUnavailable(format!("product {product_id}: {e}")))?;
        Ok(split_tags(&response.product.tags))
    }
}

/// GraphQL search term for an exact SKU.
pub fn sku_search(sku: &str) -> String {
    let escaped = sku.trim().replace('\\', "\\\\").replace('"', "\\\"");
    format!("sku:\"{escaped}\"")
}

/// Choose the variant whose SKU equals `sku`.
///
/// The search is fuzzy on the platform side, so nodes with a different SKU
/// are ignored. GraphQL errors count as an unavailable catalog.
pub fn pick_variant(
    response: VariantsResponse,
    sku: &str,
) -> Result<Option<CatalogVariant>, CommerceError> {
    if let Some(first) = response.errors.first() {
        return Err(CommerceError::CatalogUnavailable(first.message.clone()));
    }
    let Some(data) = response.data else {
        return Ok(None);
    };

    for edge in data.product_variants.edges {
        let node = edge.node;
        let Some(node_sku) = node.sku else { continue };
        let candidate = CatalogVariant::new(VariantId::new(node.id), node_sku, Money::ZERO);
        if !candidate.matches_sku(sku) {
            continue;
        }
        let price = Money::parse(&node.price)?;
        return Ok(Some(CatalogVariant { price, ..candidate }));
    }
    Ok(None)
}

// === Wire shapes ===

#[derive(Debug, Deserialize)]
pub struct VariantsResponse {
    #[serde(default)]
    data: Option<VariantsData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantsData {
    product_variants: Connection,
}

#[derive(Debug, Deserialize)]
struct Connection {
    #[serde(default)]
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: VariantNode,
}

#[derive(Debug, Deserialize)]
struct VariantNode {
    id: String,
    #[serde(default)]
    sku: Option<String>,
    price: String,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    product: ProductTags,
}

#[derive(Debug, Deserialize)]
struct ProductTags {
    #[serde(default)]
    tags: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> VariantsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_sku_search_escapes_quotes() {
        assert_eq!(sku_search(" WIDGET1 "), r#"sku:"WIDGET1""#);
        assert_eq!(sku_search(r#"A"B"#), r#"sku:"A\"B""#);
    }

    #[test]
    fn test_pick_variant_exact_match() {
        let response = parse(
            r#"{"data":{"productVariants":{"edges":[
                {"node":{"id":"gid://shopify/ProductVariant/1","sku":"WIDGET10","price":"5.00"}},
                {"node":{"id":"gid://shopify/ProductVariant/2","sku":"widget1","price":"100.00"}}
            ]}}}"#,
        );
        let variant = pick_variant(response, "WIDGET1").unwrap().unwrap();
        assert_eq!(variant.id.numeric(), Some(2));
        assert_eq!(variant.price, Money::new(10000));
    }

    #[test]
    fn test_pick_variant_miss() {
        let response = parse(
            r#"{"data":{"productVariants":{"edges":[
                {"node":{"id":"gid://shopify/ProductVariant/1","sku":null,"price":"5.00"}}
            ]}}}"#,
        );
        assert_eq!(pick_variant(response, "WIDGET1").unwrap(), None);

        let empty = parse(r#"{"data":{"productVariants":{"edges":[]}}}"#);
        assert_eq!(pick_variant(empty, "WIDGET1").unwrap(), None);
    }

    #[test]
    fn test_pick_variant_graphql_errors() {
        let response = parse(r#"{"errors":[{"message":"Throttled"}]}"#);
        assert_eq!(
            pick_variant(response, "WIDGET1"),
            Err(CommerceError::CatalogUnavailable("Throttled".to_string()))
        );
    }

    #[test]
    fn test_product_tags_shape() {
        let response: ProductResponse =
            serde_json::from_str(r#"{"product":{"id":7,"tags":"Sale, 10% off"}}"#).unwrap();
        assert_eq!(split_tags(&response.product.tags), vec!["Sale", "10% off"]);
    }
}
