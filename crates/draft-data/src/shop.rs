//! Shop connection settings and admin API URLs.

use std::time::Duration;

use crate::{FetchClient, FetchError};

/// Header carrying the admin API token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Admin API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2024-01";

/// Where the shop lives and how to authenticate against it.
#[derive(Clone)]
pub struct ShopSettings {
    /// `my-shop.myshopify.com`, or a full origin such as `http://127.0.0.1:9000`.
    pub domain: String,
    pub api_version: String,
    pub access_token: String,
}

impl ShopSettings {
    pub fn new(domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Origin all admin calls are made against.
    pub fn base_url(&self) -> String {
        let domain = self.domain.trim().trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        }
    }

    /// Path of an admin REST resource, e.g. `admin_path("draft_orders.json")`.
    pub fn admin_path(&self, resource: &str) -> String {
        format!(
            "/admin/api/{}/{}",
            self.api_version,
            resource.trim_start_matches('/')
        )
    }

    pub fn graphql_path(&self) -> String {
        self.admin_path("graphql.json")
    }

    /// A client preconfigured with the shop origin and token.
    pub fn client(&self, default_timeout: Duration) -> Result<FetchClient, FetchError> {
        Ok(FetchClient::new()?
            .with_base_url(self.base_url())
            .with_default_header(ACCESS_TOKEN_HEADER, self.access_token.clone())
            .with_default_header("Accept", "application/json")
            .with_default_timeout(default_timeout))
    }
}

impl std::fmt::Debug for ShopSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopSettings")
            .field("domain", &self.domain)
            .field("api_version", &self.api_version)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
