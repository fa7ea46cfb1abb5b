//! Quote normalization and draft-order domain logic.
//!
//! This crate turns what a quote-entry frontend sends into the body of a
//! draft order on the commerce platform:
//!
//! - **Quote**: SKU-mode rows, ordered classification rules, the per-request
//!   [`QuoteContext`](quote::QuoteContext) and the [`QuoteNormalizer`](quote::QuoteNormalizer)
//! - **Discount**: legacy per-item percentages read from product tags
//! - **Draft**: the draft-order body and the [`OrderSink`](draft::OrderSink) seam
//! - **Catalog**: the [`CatalogLookup`](catalog::CatalogLookup) seam
//!
//! No I/O happens here; catalog and submission are traits implemented by
//! `draft-data`.
//!
//! # Example
//!
//! ```rust,ignore
//! use draft_commerce::prelude::*;
//!
//! let catalog = StaticCatalog::new()
//!     .with_variant(CatalogVariant::new("101", "WIDGET1", Money::parse("100.00")?));
//!
//! let rows = vec![QuoteRow::new("WIDGET1", 2, Money::parse("90.00")?)];
//! let quote = QuoteNormalizer::new(&catalog)
//!     .normalize(&rows, &QuoteMetadata::new())
//!     .await?;
//!
//! let body = quote.into_draft_order(None);
//! ```

pub mod catalog;
pub mod discount;
pub mod draft;
pub mod error;
pub mod ids;
pub mod money;
pub mod quote;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{CatalogLookup, CatalogVariant, StaticCatalog};
    pub use crate::discount::{build_legacy_draft, DiscountPercent, LegacyItem};
    pub use crate::draft::{DraftConfirmation, DraftOrderBody, OrderSink, OutputLineItem};
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;
    pub use crate::quote::{
        NormalizedQuote, QuoteInfoEntry, QuoteMetadata, QuoteNormalizer, QuoteRow,
    };
}
