//! Request and response bodies.

use draft_commerce::discount::LegacyItem;
use draft_commerce::quote::{QuoteInfoEntry, QuoteRow};
use serde::{Deserialize, Serialize};

/// `POST /create-draft`.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyPayload {
    #[serde(default)]
    pub items: Vec<LegacyItem>,
}

/// `POST /create-draft-from-method`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotePayload {
    #[serde(default, alias = "productList")]
    pub product_list: Vec<QuoteRow>,

    #[serde(default, alias = "quoteInfo")]
    pub quote_info: Vec<QuoteInfoEntry>,
}

/// Success body for both draft routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use draft_commerce::Money;
    use serde_json::json;

    #[test]
    fn test_quote_payload_with_aliases() {
        let payload: QuotePayload = serde_json::from_value(json!({
            "productList": [
                { "SKU": "WIDGET1", "qty": "2", "Discounted Price": "$90.00" }
            ],
            "quoteInfo": [ { "label": "Quote #", "value": "Q-7" } ]
        }))
        .unwrap();

        assert_eq!(payload.product_list.len(), 1);
        assert_eq!(payload.product_list[0].sku, "WIDGET1");
        assert_eq!(payload.product_list[0].quantity, 2);
        assert_eq!(payload.product_list[0].discounted_price, Money::new(9000));
        assert_eq!(payload.quote_info[0].value, "Q-7");
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let payload: QuotePayload = serde_json::from_value(json!({})).unwrap();
        assert!(payload.product_list.is_empty());
        assert!(payload.quote_info.is_empty());

        let legacy: LegacyPayload = serde_json::from_value(json!({})).unwrap();
        assert!(legacy.items.is_empty());
    }

    #[test]
    fn test_legacy_payload() {
        let payload: LegacyPayload = serde_json::from_value(json!({
            "items": [ { "product_id": 7, "price": "50.00", "variant_id": "70", "quantity": 3 } ]
        }))
        .unwrap();
        assert_eq!(payload.items[0].quantity, 3);
        assert_eq!(payload.items[0].price, Money::new(5000));
    }
}
