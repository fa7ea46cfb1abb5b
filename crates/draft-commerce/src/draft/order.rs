//! Draft-order body types.
//!
//! These serialize to the shape the commerce platform's draft-order REST
//! endpoint accepts under its `draft_order` key.

use crate::ids::VariantId;
use crate::money::Money;
use serde::{Serialize, Serializer};

/// Description attached to per-line discounts.
pub const LINE_DISCOUNT_DESCRIPTION: &str = "SAVING";

/// Description attached to the order-level discount.
pub const ORDER_DISCOUNT_DESCRIPTION: &str = "QUOTE DISCOUNT";

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountValueType {
    /// Value is a fixed amount off.
    FixedAmount,
}

/// A discount annotation on a line item or on the whole order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedDiscount {
    /// Shown to the customer on the invoice.
    pub description: String,
    /// How `value` is interpreted.
    pub value_type: DiscountValueType,
    /// The discount value.
    pub value: Money,
    /// The resulting amount off.
    pub amount: Money,
}

impl AppliedDiscount {
    /// A fixed-amount discount where value and amount coincide.
    pub fn fixed(description: impl Into<String>, amount: Money) -> Self {
        Self {
            description: description.into(),
            value_type: DiscountValueType::FixedAmount,
            value: amount,
            amount,
        }
    }
}

/// A line backed by a catalog variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    /// The resolved variant.
    #[serde(serialize_with = "serialize_variant_id")]
    pub variant_id: VariantId,
    /// Units ordered, at least one.
    pub quantity: u32,
    /// The catalog's own unit price.
    #[serde(rename = "price")]
    pub base_price: Money,
    /// Per-unit discount, absent when nothing is taken off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_discount: Option<AppliedDiscount>,
}

impl CatalogItem {
    /// Per-unit discount amount, if any.
    pub fn applied_discount_amount(&self) -> Option<Money> {
        self.applied_discount.as_ref().map(|d| d.amount)
    }
}

/// A free-text line with no catalog backing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomItem {
    /// Line title.
    pub title: String,
    /// Unit price.
    pub price: Money,
    /// Units ordered, at least one.
    pub quantity: u32,
    /// Whether tax is charged on this line.
    pub taxable: bool,
    /// Whether the line ships physically.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_shipping: Option<bool>,
}

/// One draft-order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutputLineItem {
    Catalog(CatalogItem),
    Custom(CustomItem),
}

impl OutputLineItem {
    /// Units ordered.
    pub fn quantity(&self) -> u32 {
        match self {
            OutputLineItem::Catalog(item) => item.quantity,
            OutputLineItem::Custom(item) => item.quantity,
        }
    }

    pub fn as_catalog(&self) -> Option<&CatalogItem> {
        match self {
            OutputLineItem::Catalog(item) => Some(item),
            OutputLineItem::Custom(_) => None,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomItem> {
        match self {
            OutputLineItem::Custom(item) => Some(item),
            OutputLineItem::Catalog(_) => None,
        }
    }
}

/// The order's shipping charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingLine {
    /// Title shown on the invoice.
    pub title: String,
    /// Shipping price.
    pub price: Money,
    /// Always set: the rate is not one of the shop's configured rates.
    pub custom: bool,
}

impl ShippingLine {
    /// A custom shipping line.
    pub fn custom(title: impl Into<String>, price: Money) -> Self {
        Self {
            title: title.into(),
            price,
            custom: true,
        }
    }
}

/// The body sent to the order-submission sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftOrderBody {
    /// Ordered line items.
    pub line_items: Vec<OutputLineItem>,
    /// Optional shipping charge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_line: Option<ShippingLine>,
    /// Optional order-level discount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_discount: Option<AppliedDiscount>,
    /// Present and `true` only for tax-exempt orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_exempt: Option<bool>,
    /// Bill and ship to the customer's saved address.
    pub use_customer_default_address: bool,
    /// Internal note on the draft.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DraftOrderBody {
    /// A body with the given lines and nothing else.
    pub fn new(line_items: Vec<OutputLineItem>) -> Self {
        Self {
            line_items,
            shipping_line: None,
            applied_discount: None,
            tax_exempt: None,
            use_customer_default_address: true,
            note: None,
        }
    }

    /// Attach an internal note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Numeric ids go out as JSON numbers, anything else as a string.
fn serialize_variant_id<S: Serializer>(id: &VariantId, serializer: S) -> Result<S::Ok, S::Error> {
    match id.numeric() {
        Some(n) => serializer.serialize_u64(n),
        None => serializer.serialize_str(id.as_str()),
    }
}
