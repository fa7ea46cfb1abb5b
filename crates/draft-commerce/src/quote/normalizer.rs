//! Quote Line Normalizer: raw quote rows in, draft-order content out.

use crate::catalog::{CatalogLookup, CatalogVariant};
use crate::draft::{
    AppliedDiscount, DraftOrderBody, OutputLineItem, ShippingLine, ORDER_DISCOUNT_DESCRIPTION,
};
use crate::error::CommerceError;
use crate::money::Money;
use crate::quote::context::QuoteContext;
use crate::quote::row::{QuoteMetadata, QuoteRow};
use crate::quote::rules::{classify_row, resolve_catalog_match, CatalogResolution, RowClass};
use tracing::{debug, warn};

/// The result of normalizing one quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuote {
    pub line_items: Vec<OutputLineItem>,
    pub shipping_line: Option<ShippingLine>,
    pub order_discount_total: Money,
    pub tax_exempt: bool,
}

impl NormalizedQuote {
    /// Shape the result as a draft-order body.
    pub fn into_draft_order(self, note: Option<String>) -> DraftOrderBody {
        let applied_discount = self
            .order_discount_total
            .is_positive()
            .then(|| AppliedDiscount::fixed(ORDER_DISCOUNT_DESCRIPTION, self.order_discount_total));

        DraftOrderBody {
            line_items: self.line_items,
            shipping_line: self.shipping_line,
            applied_discount,
            tax_exempt: self.tax_exempt.then_some(true),
            use_customer_default_address: true,
            note,
        }
    }
}

/// Walks quote rows in order against a catalog.
pub struct QuoteNormalizer<'a> {
    catalog: &'a dyn CatalogLookup,
}

impl<'a> QuoteNormalizer<'a> {
    pub fn new(catalog: &'a dyn CatalogLookup) -> Self {
        Self { catalog }
    }

    /// Normalize `rows` in input order.
    ///
    /// Fails with [`CommerceError::Validation`] when there are no rows and
    /// with [`CommerceError::EmptyOrder`] when nothing submittable remains.
    /// Catalog failures never fail the quote; the row becomes a custom item.
    pub async fn normalize(
        &self,
        rows: &[QuoteRow],
        metadata: &QuoteMetadata,
    ) -> Result<NormalizedQuote, CommerceError> {
        if rows.is_empty() {
            return Err(CommerceError::Validation("quote has no rows".to_string()));
        }

        let mut ctx = QuoteContext::new(metadata);

        for (index, row) in rows.iter().enumerate() {
            let class = classify_row(row, &ctx);
            debug!(index, sku = %row.sku, price = %row.discounted_price, ?class, "classified quote row");

            match class {
                RowClass::Subtotal | RowClass::Blank => {}
                RowClass::Shipping => ctx.set_shipping(row.discounted_price),
                RowClass::OrderDiscount => ctx.add_order_discount(row.discounted_price)?,
                RowClass::SalesTax { ignored } => ctx.record_sales_tax(row, ignored),
                RowClass::Catalog => {
                    let variant = self.lookup(row).await;
                    match resolve_catalog_match(row, variant) {
                        CatalogResolution::Matched {
                            variant_id,
                            base_price,
                            discount,
                        } => ctx.push_catalog(row, variant_id, base_price, discount),
                        CatalogResolution::Custom(reason) => {
                            debug!(sku = %row.sku, ?reason, "row kept as custom item");
                            ctx.push_custom(row);
                        }
                    }
                }
            }
        }

        ctx.apply_tax_fallback();
        ctx.finish()
    }

    async fn lookup(&self, row: &QuoteRow) -> Option<CatalogVariant> {
        if row.has_blank_sku() {
            return None;
        }
        match self.catalog.lookup_by_sku(row.sku.trim()).await {
            Ok(variant) => variant,
            Err(e) => {
                warn!(sku = %row.sku, error = %e, "catalog lookup failed, treating as miss");
                None
            }
        }
    }
}
