//! Per-request accumulator threaded through row classification.

use crate::draft::{
    AppliedDiscount, CatalogItem, CustomItem, OutputLineItem, ShippingLine,
    LINE_DISCOUNT_DESCRIPTION,
};
use crate::error::CommerceError;
use crate::ids::VariantId;
use crate::money::Money;
use crate::quote::normalizer::NormalizedQuote;
use crate::quote::row::{QuoteMetadata, QuoteRow};

/// Title for unresolved rows that have no SKU.
pub const CUSTOM_ITEM_TITLE: &str = "Custom Item";

/// Title for sales-tax rows.
pub const SALES_TAX_TITLE: &str = "SALES TAX";

/// Everything learned while walking one request's rows.
///
/// Created fresh per request and consumed by [`QuoteContext::finish`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteContext {
    pub quote_number: Option<String>,
    pub quote_tax: Option<Money>,
    pub any_sales_tax_code_seen: bool,
    pub tax_exempt: bool,
    pub order_discount_total: Money,
    pub shipping_line: Option<ShippingLine>,
    pub line_items: Vec<OutputLineItem>,
    pub any_catalog_match_seen: bool,
}

impl QuoteContext {
    pub fn new(metadata: &QuoteMetadata) -> Self {
        Self {
            quote_number: metadata.quote_number.clone(),
            quote_tax: metadata.quote_tax,
            ..Self::default()
        }
    }

    /// Replace the shipping line; the last S&H row wins.
    pub fn set_shipping(&mut self, price: Money) {
        let number = self.quote_number.as_deref().unwrap_or_default();
        self.shipping_line = Some(ShippingLine::custom(format!("QUOTE # {number}"), price));
    }

    /// Accumulate `|amount|` into the order-level discount.
    pub fn add_order_discount(&mut self, amount: Money) -> Result<(), CommerceError> {
        self.order_discount_total = self
            .order_discount_total
            .checked_add(amount.abs())
            .ok_or(CommerceError::Overflow)?;
        Ok(())
    }

    /// Record an ST-code row. Ignored state codes only flip the "seen" flag.
    pub fn record_sales_tax(&mut self, row: &QuoteRow, ignored: bool) {
        self.any_sales_tax_code_seen = true;
        if ignored {
            return;
        }
        self.tax_exempt = true;
        self.line_items.push(OutputLineItem::Custom(CustomItem {
            title: SALES_TAX_TITLE.to_string(),
            price: row.discounted_price,
            quantity: row.quantity.max(1),
            taxable: false,
            requires_shipping: None,
        }));
    }

    /// Emit a row the catalog could not back as a custom item.
    ///
    /// Until a catalog match has been seen, custom items are flagged as
    /// shippable so the draft is not treated as digital-only.
    pub fn push_custom(&mut self, row: &QuoteRow) {
        let title = if row.has_blank_sku() {
            CUSTOM_ITEM_TITLE.to_string()
        } else {
            row.sku.trim().to_string()
        };
        self.line_items.push(OutputLineItem::Custom(CustomItem {
            title,
            price: row.discounted_price,
            quantity: row.quantity.max(1),
            taxable: true,
            requires_shipping: (!self.any_catalog_match_seen).then_some(true),
        }));
    }

    pub fn push_catalog(
        &mut self,
        row: &QuoteRow,
        variant_id: VariantId,
        base_price: Money,
        discount: Option<Money>,
    ) {
        self.any_catalog_match_seen = true;
        self.line_items.push(OutputLineItem::Catalog(CatalogItem {
            variant_id,
            quantity: row.quantity.max(1),
            base_price,
            applied_discount: discount
                .filter(Money::is_positive)
                .map(|amount| AppliedDiscount::fixed(LINE_DISCOUNT_DESCRIPTION, amount)),
        }));
    }

    /// With no ST code anywhere, a quote issued with zero tax is exempt.
    pub fn apply_tax_fallback(&mut self) {
        if self.any_sales_tax_code_seen {
            return;
        }
        if self.quote_tax.is_some_and(|tax| tax.is_zero()) {
            self.tax_exempt = true;
        }
    }

    /// Close out the request. Fails when there is nothing to submit.
    pub fn finish(self) -> Result<NormalizedQuote, CommerceError> {
        if self.line_items.is_empty() && self.shipping_line.is_none() {
            return Err(CommerceError::EmptyOrder);
        }
        Ok(NormalizedQuote {
            line_items: self.line_items,
            shipping_line: self.shipping_line,
            order_discount_total: self.order_discount_total,
            tax_exempt: self.tax_exempt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_discount_accumulates_absolute_values() {
        let mut ctx = QuoteContext::default();
        ctx.add_order_discount(Money::new(-1000)).unwrap();
        ctx.add_order_discount(Money::new(-250)).unwrap();
        assert_eq!(ctx.order_discount_total, Money::new(1250));
    }

    #[test]
    fn test_order_discount_overflow_keeps_total() {
        let mut ctx = QuoteContext::default();
        let huge = Money::new(-5_000_000_000_000_000_000);
        ctx.add_order_discount(huge).unwrap();
        assert_eq!(ctx.add_order_discount(huge), Err(CommerceError::Overflow));
        assert_eq!(ctx.order_discount_total, Money::new(5_000_000_000_000_000_000));
    }

    #[test]
    fn test_last_shipping_line_wins() {
        let mut ctx = QuoteContext::new(&QuoteMetadata::new().with_quote_number("Q-7"));
        ctx.set_shipping(Money::new(2500));
        ctx.set_shipping(Money::new(3000));

        let shipping = ctx.shipping_line.unwrap();
        assert_eq!(shipping.title, "QUOTE # Q-7");
        assert_eq!(shipping.price, Money::new(3000));
        assert!(shipping.custom);
    }

    #[test]
    fn test_custom_items_flag_shipping_until_catalog_match() {
        let mut ctx = QuoteContext::default();
        ctx.push_custom(&QuoteRow::new("", 1, Money::new(100)));
        ctx.push_catalog(
            &QuoteRow::new("W", 1, Money::new(100)),
            VariantId::new("1"),
            Money::new(100),
            None,
        );
        ctx.push_custom(&QuoteRow::new("LATER", 1, Money::new(100)));

        let first = ctx.line_items[0].as_custom().unwrap();
        assert_eq!(first.title, CUSTOM_ITEM_TITLE);
        assert_eq!(first.requires_shipping, Some(true));

        let later = ctx.line_items[2].as_custom().unwrap();
        assert_eq!(later.title, "LATER");
        assert_eq!(later.requires_shipping, None);
    }

    #[test]
    fn test_zero_discount_is_not_annotated() {
        let mut ctx = QuoteContext::default();
        ctx.push_catalog(
            &QuoteRow::new("W", 1, Money::new(100)),
            VariantId::new("1"),
            Money::new(100),
            Some(Money::ZERO),
        );
        assert_eq!(ctx.line_items[0].as_catalog().unwrap().applied_discount, None);
    }

    #[test]
    fn test_tax_fallback() {
        let mut ctx = QuoteContext::new(&QuoteMetadata::new().with_quote_tax(Money::ZERO));
        ctx.apply_tax_fallback();
        assert!(ctx.tax_exempt);

        let mut ctx = QuoteContext::new(&QuoteMetadata::new().with_quote_tax(Money::new(1200)));
        ctx.apply_tax_fallback();
        assert!(!ctx.tax_exempt);

        let mut ctx = QuoteContext::new(&QuoteMetadata::new().with_quote_tax(Money::ZERO));
        ctx.record_sales_tax(&QuoteRow::new("STCA", 1, Money::new(1500)), true);
        ctx.apply_tax_fallback();
        assert!(!ctx.tax_exempt);
    }

    #[test]
    fn test_finish_requires_content() {
        assert_eq!(
            QuoteContext::default().finish(),
            Err(CommerceError::EmptyOrder)
        );

        let mut ctx = QuoteContext::new(&QuoteMetadata::new().with_quote_number("1"));
        ctx.set_shipping(Money::new(500));
        let normalized = ctx.finish().unwrap();
        assert!(normalized.line_items.is_empty());
        assert!(normalized.shipping_line.is_some());
    }
}
