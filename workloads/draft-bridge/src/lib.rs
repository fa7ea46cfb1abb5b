//! Draft Bridge - quote entry to commerce draft orders.
//!
//! Routes:
//! - `POST /create-draft` - storefront cart lines, discounted by product tags
//! - `POST /create-draft-from-method` - quote rows normalized by SKU
//! - `GET /ping` - liveness
//!
//! Both draft routes answer `{checkout_url}` on success and
//! `{error, details?}` otherwise. Failures on the shop side raise one alert.

pub mod config;
pub mod error;
pub mod handlers;
pub mod payload;
pub mod routes;
pub mod server;
pub mod state;

pub use config::BridgeConfig;
pub use error::ApiError;
pub use state::AppState;
