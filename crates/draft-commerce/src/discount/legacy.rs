//! Legacy percentage mode: per-item discounts read from product tags.

use crate::catalog::CatalogLookup;
use crate::discount::tags::{discount_percent_from_tags, DiscountPercent};
use crate::draft::{
    AppliedDiscount, CatalogItem, DraftOrderBody, OutputLineItem, LINE_DISCOUNT_DESCRIPTION,
};
use crate::error::CommerceError;
use crate::ids::{ProductId, VariantId};
use crate::money::Money;
use serde::Deserialize;
use tracing::{info, warn};

/// Note stamped on drafts built in this mode.
pub const LEGACY_DRAFT_NOTE: &str = "Created via custom discount app";

/// Lowest unit price a percentage discount may leave.
pub const MIN_FINAL_PRICE: Money = Money::ONE_CENT;

/// One cart line from the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LegacyItem {
    pub product_id: ProductId,
    pub price: Money,
    pub variant_id: VariantId,
    #[serde(default = "default_quantity", deserialize_with = "crate::quote::deserialize_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Unit pricing after a percentage discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyPricing {
    pub discount_percent: DiscountPercent,
    /// `price × percent`, before the floor.
    pub discount_amount: Money,
    /// `max(price − discount_amount, MIN_FINAL_PRICE)`.
    pub final_price: Money,
    /// What actually comes off the price once the floor is applied.
    pub applied_amount: Money,
}

/// Apply `percent` to a unit `price`.
pub fn price_with_percent(price: Money, percent: DiscountPercent) -> Result<LegacyPricing, CommerceError> {
    let discount_amount = percent.of(price)?;
    let final_price = price
        .checked_sub(discount_amount)
        .ok_or(CommerceError::Overflow)?
        .max(MIN_FINAL_PRICE);
    Ok(LegacyPricing {
        discount_percent: percent,
        discount_amount,
        final_price,
        applied_amount: price
            .checked_sub(final_price)
            .ok_or(CommerceError::Overflow)?
            .max(Money::ZERO),
    })
}

/// Build a draft order for storefront cart lines, one tag lookup per line.
///
/// A product whose tags cannot be read gets no discount.
pub async fn build_legacy_draft(
    catalog: &dyn CatalogLookup,
    items: &[LegacyItem],
) -> Result<DraftOrderBody, CommerceError> {
    if items.is_empty() {
        return Err(CommerceError::Validation("cart has no items".to_string()));
    }

    let mut line_items = Vec::with_capacity(items.len());
    for item in items {
        let percent = match catalog.product_tags(&item.product_id).await {
            Ok(tags) => discount_percent_from_tags(&tags),
            Err(e) => {
                warn!(product_id = %item.product_id, error = %e, "tag lookup failed, no discount");
                DiscountPercent::ZERO
            }
        };
        let pricing = price_with_percent(item.price, percent)?;

        info!(
            product_id = %item.product_id,
            percent = %pricing.discount_percent,
            discount = %pricing.discount_amount,
            final_price = %pricing.final_price,
            "priced cart line"
        );

        line_items.push(OutputLineItem::Catalog(CatalogItem {
            variant_id: item.variant_id.clone(),
            quantity: item.quantity.max(1),
            base_price: item.price,
            applied_discount: pricing
                .applied_amount
                .is_positive()
                .then(|| AppliedDiscount::fixed(LINE_DISCOUNT_DESCRIPTION, pricing.applied_amount)),
        }));
    }

    Ok(DraftOrderBody::new(line_items).with_note(LEGACY_DRAFT_NOTE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use serde_json::json;

    fn item(product: &str, variant: &str, cents: i64, quantity: u32) -> LegacyItem {
        LegacyItem {
            product_id: ProductId::new(product),
            price: Money::new(cents),
            variant_id: VariantId::new(variant),
            quantity,
        }
    }

    // === Pricing ===

    #[test]
    fn test_ten_percent() {
        let pricing = price_with_percent(Money::new(5000), DiscountPercent::from_hundredths(1000)).unwrap();
        assert_eq!(pricing.discount_amount, Money::new(500));
        assert_eq!(pricing.final_price, Money::new(4500));
        assert_eq!(pricing.applied_amount, Money::new(500));
    }

    #[test]
    fn test_over_one_hundred_percent_floors_at_one_cent() {
        let pricing = price_with_percent(Money::new(5000), DiscountPercent::from_hundredths(11000)).unwrap();
        assert_eq!(pricing.discount_amount.display_amount(), "55.00");
        assert_eq!(pricing.final_price.display_amount(), "0.01");
        assert_eq!(pricing.applied_amount.display_amount(), "49.99");
    }

    #[test]
    fn test_exactly_one_hundred_percent_floors_at_one_cent() {
        let pricing = price_with_percent(Money::new(2000), DiscountPercent::from_hundredths(10000)).unwrap();
        assert_eq!(pricing.final_price, MIN_FINAL_PRICE);
    }

    #[test]
    fn test_zero_percent() {
        let pricing = price_with_percent(Money::new(2000), DiscountPercent::ZERO).unwrap();
        assert_eq!(pricing.final_price, Money::new(2000));
        assert!(pricing.applied_amount.is_zero());
    }

    // === Draft building ===

    #[tokio::test]
    async fn test_build_legacy_draft() {
        let catalog = StaticCatalog::new()
            .with_tags("1", ["New", "10% OFF"])
            .with_tags("2", ["Clearance"]);
        let items = vec![item("1", "11", 5000, 2), item("2", "22", 1999, 1)];

        let body = build_legacy_draft(&catalog, &items).await.unwrap();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "line_items": [
                    {
                        "variant_id": 11,
                        "quantity": 2,
                        "price": "50.00",
                        "applied_discount": {
                            "description": "SAVING",
                            "value_type": "fixed_amount",
                            "value": "5.00",
                            "amount": "5.00"
                        }
                    },
                    {"variant_id": 22, "quantity": 1, "price": "19.99"}
                ],
                "use_customer_default_address": true,
                "note": "Created via custom discount app"
            })
        );
    }

    #[tokio::test]
    async fn test_tag_failure_means_no_discount() {
        let catalog = StaticCatalog::new();
        let body = build_legacy_draft(&catalog, &[item("404", "1", 1000, 1)])
            .await
            .unwrap();
        let line = body.line_items[0].as_catalog().unwrap();
        assert_eq!(line.applied_discount, None);
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let catalog = StaticCatalog::new();
        let result = build_legacy_draft(&catalog, &[]).await;
        assert!(matches!(result, Err(CommerceError::Validation(_))));
    }

    #[test]
    fn test_legacy_item_deserialization() {
        let item: LegacyItem = serde_json::from_value(json!({
            "product_id": 8812345,
            "price": 49.99,
            "variant_id": "4471",
            "quantity": 3
        }))
        .unwrap();
        assert_eq!(item.product_id, ProductId::new("8812345"));
        assert_eq!(item.price, Money::new(4999));
        assert_eq!(item.quantity, 3);
    }
}
