//! Raw quote rows and quote metadata as the quote-entry frontend sends them.
//!
//! The frontend is loose about types: prices arrive as strings or numbers,
//! blank cells arrive as `""` or `null`, and column names vary between
//! snake_case and the spreadsheet headers. Deserialization absorbs all of
//! that so the normalizer only ever sees clean values.

use crate::error::CommerceError;
use crate::money::Money;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// One quote line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuoteRow {
    /// Product code; may be empty.
    #[serde(default, alias = "SKU", alias = "Sku", deserialize_with = "deserialize_text")]
    pub sku: String,
    /// Units, at least one.
    #[serde(
        default = "default_quantity",
        alias = "qty",
        alias = "Qty",
        alias = "Quantity",
        deserialize_with = "deserialize_quantity"
    )]
    pub quantity: u32,
    /// Customer-facing price; negative for order-level discounts.
    #[serde(
        default,
        alias = "price",
        alias = "discountedPrice",
        alias = "Discounted Price",
        deserialize_with = "deserialize_price"
    )]
    pub discounted_price: Money,
    /// Catalog list price as printed on the quote.
    #[serde(
        default,
        alias = "listPrice",
        alias = "List Price",
        deserialize_with = "deserialize_optional_price"
    )]
    pub list_price: Option<Money>,
}

impl QuoteRow {
    pub fn new(sku: impl Into<String>, quantity: u32, discounted_price: Money) -> Self {
        Self {
            sku: sku.into(),
            quantity: quantity.max(1),
            discounted_price,
            list_price: None,
        }
    }

    pub fn with_list_price(mut self, list_price: Money) -> Self {
        self.list_price = Some(list_price);
        self
    }

    /// SKU trimmed and upper-cased for prefix and set comparisons.
    pub fn sku_key(&self) -> String {
        self.sku.trim().to_ascii_uppercase()
    }

    pub fn has_blank_sku(&self) -> bool {
        self.sku.trim().is_empty()
    }
}

/// One `quote_info` entry, e.g. `{"label": "Quote #", "value": "Q-1042"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuoteInfoEntry {
    #[serde(default, alias = "Label", alias = "key", alias = "name", deserialize_with = "deserialize_text")]
    pub label: String,
    #[serde(default, alias = "Value", deserialize_with = "deserialize_text")]
    pub value: String,
}

impl QuoteInfoEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Request-level facts pulled from the quote header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteMetadata {
    /// The quote's number, used to title the shipping line.
    pub quote_number: Option<String>,
    /// Tax amount the quote was issued with.
    pub quote_tax: Option<Money>,
}

impl QuoteMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote_number(mut self, number: impl Into<String>) -> Self {
        self.quote_number = Some(number.into());
        self
    }

    pub fn with_quote_tax(mut self, tax: Money) -> Self {
        self.quote_tax = Some(tax);
        self
    }

    /// Pick the quote number and tax value out of labelled header entries.
    ///
    /// Labels match case-insensitively; a label mentioning "tax" is the tax
    /// value, otherwise one mentioning "quote" is the quote number. Later
    /// entries overwrite earlier ones. A tax value that is not an amount is
    /// ignored.
    pub fn from_entries(entries: &[QuoteInfoEntry]) -> Self {
        let mut metadata = Self::default();
        for entry in entries {
            let label = entry.label.trim().to_ascii_lowercase();
            let value = entry.value.trim();
            if value.is_empty() {
                continue;
            }
            if label.contains("tax") {
                match Money::parse(value) {
                    Ok(tax) => metadata.quote_tax = Some(tax),
                    Err(e) => warn!(label = %entry.label, error = %e, "ignoring unparseable quote tax"),
                }
            } else if label.contains("quote") {
                metadata.quote_number = Some(value.to_string());
            }
        }
        metadata
    }
}

fn default_quantity() -> u32 {
    1
}

fn text_from_value(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

fn price_from_value(value: Option<Value>) -> Result<Option<Money>, CommerceError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Money::parse(&s).map(Some),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(units) => Money::from_units(units).map(Some),
            None => n
                .as_f64()
                .ok_or_else(|| CommerceError::InvalidAmount(n.to_string()))
                .and_then(Money::from_f64)
                .map(Some),
        },
        Some(other) => Err(CommerceError::InvalidAmount(other.to_string())),
    }
}

fn quantity_from_value(value: Option<Value>) -> Result<u32, CommerceError> {
    let raw = match value {
        None | Some(Value::Null) => return Ok(default_quantity()),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .ok_or_else(|| CommerceError::Validation(format!("bad quantity {n}")))?,
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(default_quantity()),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.round() as i64)
                })
                .ok_or_else(|| CommerceError::Validation(format!("bad quantity {s:?}")))?
        }
        Some(other) => return Err(CommerceError::Validation(format!("bad quantity {other}"))),
    };
    Ok(u32::try_from(raw.max(1)).unwrap_or(u32::MAX))
}

fn deserialize_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(text_from_value(Option::deserialize(d)?))
}

fn deserialize_price<'de, D: Deserializer<'de>>(d: D) -> Result<Money, D::Error> {
    price_from_value(Option::deserialize(d)?)
        .map(Option::unwrap_or_default)
        .map_err(de::Error::custom)
}

fn deserialize_optional_price<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Money>, D::Error> {
    price_from_value(Option::deserialize(d)?).map_err(de::Error::custom)
}

pub(crate) fn deserialize_quantity<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    quantity_from_value(Option::deserialize(d)?).map_err(de::Error::custom)
}
