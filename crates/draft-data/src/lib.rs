//! Outbound HTTP for the draft bridge.
//!
//! This crate provides:
//! - `FetchClient` - Builder-style HTTP client with JSON helpers and timeouts
//! - `Dependency` - Named upstream dependencies with default timeouts
//! - `PlatformCatalog` - SKU and product-tag lookups against the shop
//! - `PlatformDraftOrders` - Draft-order submission
//! - `WebhookAlertSink` - Alert delivery to an automation webhook

mod catalog;
mod client;
mod dependency;
mod draft_orders;
mod error;
mod request;
mod response;
mod shop;
mod webhook;

pub use catalog::*;
pub use client::*;
pub use dependency::*;
pub use draft_orders::*;
pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use shop::*;
pub use webhook::*;
