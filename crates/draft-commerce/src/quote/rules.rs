//! Row classification.
//!
//! Rows are classified by an ordered rule table; the first rule that
//! matches decides what the row is. Rows no rule claims go to the catalog,
//! and [`resolve_catalog_match`] decides what a lookup result turns into.

use crate::catalog::CatalogVariant;
use crate::ids::VariantId;
use crate::money::Money;
use crate::quote::context::QuoteContext;
use crate::quote::row::QuoteRow;

/// State codes that are ordinary taxable amounts rather than exemptions.
pub const IGNORED_TAX_CODES: [&str; 6] = ["STCA", "STIN", "STNY", "STPA", "STTX", "STWA"];

const SUBTOTAL_MARKERS: [&str; 2] = ["SUBTOTAL", "SUB-TOTAL"];
const SHIPPING_PREFIX: &str = "S&H";
const SALES_TAX_PREFIX: &str = "ST";

/// What a row is, before any catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    /// Subtotal marker; dropped.
    Subtotal,
    /// Shipping charge for the quote.
    Shipping,
    /// Negative amount; accumulates into the order discount.
    OrderDiscount,
    /// Sales-tax code. `ignored` for the state codes in [`IGNORED_TAX_CODES`].
    SalesTax { ignored: bool },
    /// Blank SKU at zero; dropped.
    Blank,
    /// Anything else: resolve against the catalog.
    Catalog,
}

/// A named classification rule.
pub struct Rule {
    pub name: &'static str,
    matches: fn(&QuoteRow, &QuoteContext) -> Option<RowClass>,
}

impl Rule {
    pub fn apply(&self, row: &QuoteRow, ctx: &QuoteContext) -> Option<RowClass> {
        (self.matches)(row, ctx)
    }
}

/// Classification rules in priority order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "subtotal",
        matches: subtotal_marker,
    },
    Rule {
        name: "shipping",
        matches: shipping_marker,
    },
    Rule {
        name: "order_discount",
        matches: order_discount,
    },
    Rule {
        name: "sales_tax",
        matches: sales_tax_code,
    },
    Rule {
        name: "blank",
        matches: blank_row,
    },
];

/// Classify a row; the first matching rule wins.
pub fn classify_row(row: &QuoteRow, ctx: &QuoteContext) -> RowClass {
    RULES
        .iter()
        .find_map(|rule| rule.apply(row, ctx))
        .unwrap_or(RowClass::Catalog)
}

fn subtotal_marker(row: &QuoteRow, _: &QuoteContext) -> Option<RowClass> {
    SUBTOTAL_MARKERS
        .contains(&row.sku_key().as_str())
        .then_some(RowClass::Subtotal)
}

fn shipping_marker(row: &QuoteRow, ctx: &QuoteContext) -> Option<RowClass> {
    (row.sku_key().starts_with(SHIPPING_PREFIX) && ctx.quote_number.is_some())
        .then_some(RowClass::Shipping)
}

fn order_discount(row: &QuoteRow, _: &QuoteContext) -> Option<RowClass> {
    row.discounted_price
        .is_negative()
        .then_some(RowClass::OrderDiscount)
}

fn sales_tax_code(row: &QuoteRow, _: &QuoteContext) -> Option<RowClass> {
    let key = row.sku_key();
    key.starts_with(SALES_TAX_PREFIX).then(|| RowClass::SalesTax {
        ignored: IGNORED_TAX_CODES.contains(&key.as_str()),
    })
}

fn blank_row(row: &QuoteRow, _: &QuoteContext) -> Option<RowClass> {
    (row.has_blank_sku() && row.discounted_price.is_zero()).then_some(RowClass::Blank)
}

/// Why a catalog-bound row ended up as a custom item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
    /// No variant carries this SKU.
    Miss,
    /// The catalog price is zero or negative.
    NonPositiveBase,
    /// The quoted price is above the catalog price.
    AboveBase,
}

/// What a catalog lookup turns a row into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogResolution {
    /// Emit a custom item at the quoted price.
    Custom(Unresolved),
    /// Emit a catalog item at the base price with an optional discount.
    Matched {
        variant_id: VariantId,
        base_price: Money,
        discount: Option<Money>,
    },
}

/// Turn a lookup result into a resolution for `row`.
///
/// The per-unit discount is `base - quoted`, omitted when zero. A variant
/// whose SKU differs from the row's is a miss.
pub fn resolve_catalog_match(row: &QuoteRow, variant: Option<CatalogVariant>) -> CatalogResolution {
    let Some(variant) = variant.filter(|v| v.matches_sku(&row.sku)) else {
        return CatalogResolution::Custom(Unresolved::Miss);
    };
    if !variant.price.is_positive() {
        return CatalogResolution::Custom(Unresolved::NonPositiveBase);
    }
    if row.discounted_price > variant.price {
        return CatalogResolution::Custom(Unresolved::AboveBase);
    }

    let discount = variant
        .price
        .checked_sub(row.discounted_price)
        .unwrap_or(variant.price)
        .max(Money::ZERO);
    CatalogResolution::Matched {
        variant_id: variant.id,
        base_price: variant.price,
        discount: (!discount.is_zero()).then_some(discount),
    }
}
