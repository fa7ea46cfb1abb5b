//! Service configuration.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use draft_observability::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};

/// Bridge configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Shop the drafts are created in.
    #[serde(default)]
    pub shop: ShopConfig,

    /// SKU and tag lookups.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Draft-order submission.
    #[serde(default)]
    pub submission: SubmissionConfig,

    /// Failure alerts.
    #[serde(default)]
    pub alerts: AlertsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Load config from a file, or defaults when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Apply overrides from the process environment, returning the
    /// variables that were set but could not be used.
    pub fn apply_env(&mut self) -> Vec<&'static str> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// `SHOPIFY_TOKEN`, `SHOP_NAME`, `SHOPIFY_API_VERSION`, `PORT` and
    /// `ALERT_WEBHOOK_URL` are recognised. Blank values are ignored;
    /// unparseable ones are skipped and their names returned.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Vec<&'static str>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ignored = Vec::new();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("SHOPIFY_TOKEN") {
            self.shop.access_token = token;
        }
        if let Some(name) = get("SHOP_NAME") {
            self.shop.domain = shop_domain(&name);
        }
        if let Some(version) = get("SHOPIFY_API_VERSION") {
            self.shop.api_version = version;
        }
        if let Some(port) = get("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => ignored.push("PORT"),
            }
        }
        if let Some(url) = get("ALERT_WEBHOOK_URL") {
            self.alerts.webhook_url = Some(url);
        }
        ignored
    }

    /// Reject settings the service cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.shop.domain.trim().is_empty() {
            bail!("shop.domain is not set (config file or SHOP_NAME)");
        }
        if self.shop.access_token.trim().is_empty() {
            bail!("shop.access_token is not set (config file or SHOPIFY_TOKEN)");
        }
        if self.catalog.timeout_ms == 0 {
            bail!("catalog.timeout_ms must be greater than zero");
        }
        if self.submission.timeout_ms == 0 {
            bail!("submission.timeout_ms must be greater than zero");
        }
        Ok(())
    }
}

/// `acme` becomes `acme.myshopify.com`; anything with a dot or scheme is kept.
fn shop_domain(name: &str) -> String {
    let name = name.trim();
    if name.contains('.') || name.contains("://") {
        name.to_string()
    } else {
        format!("{name}.myshopify.com")
    }
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Shop connection.
#[derive(Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    /// `acme.myshopify.com`.
    #[serde(default)]
    pub domain: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default)]
    pub access_token: String,
}

fn default_api_version() -> String {
    draft_data::DEFAULT_API_VERSION.to_string()
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            api_version: default_api_version(),
            access_token: String::new(),
        }
    }
}

impl std::fmt::Debug for ShopConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopConfig")
            .field("domain", &self.domain)
            .field("api_version", &self.api_version)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Catalog lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Per-lookup timeout; a slower lookup counts as a miss.
    #[serde(default = "default_catalog_timeout_ms")]
    pub timeout_ms: u64,
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_catalog_timeout_ms() -> u64 {
    2500
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_catalog_timeout_ms(),
        }
    }
}

/// Draft-order submission settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    #[serde(default = "default_submission_timeout_ms")]
    pub timeout_ms: u64,

    /// Note attached to drafts built from quotes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SubmissionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_submission_timeout_ms() -> u64 {
    10_000
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_submission_timeout_ms(),
            note: None,
        }
    }
}

/// Failure alert settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Webhook to post alerts to; alerts are only logged when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

fn default_subject_prefix() -> String {
    "[draft-bridge] ".to_string()
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            subject_prefix: default_subject_prefix(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn configured() -> BridgeConfig {
        let mut config = BridgeConfig::default();
        config.shop.domain = "acme.myshopify.com".to_string();
        config.shop.access_token = "shpat_test".to_string();
        config
    }

    // === Parsing ===

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.catalog.timeout(), Duration::from_millis(2500));
        assert_eq!(config.submission.timeout_ms, 10_000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.alerts.webhook_url.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let config: BridgeConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [shop]
            domain = "acme.myshopify.com"
            access_token = "shpat_x"

            [catalog]
            timeout_ms = 900

            [submission]
            note = "From quote tool"

            [logging]
            level = "debug"
            format = "human"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.shop.api_version, draft_data::DEFAULT_API_VERSION);
        assert_eq!(config.catalog.timeout_ms, 900);
        assert_eq!(config.submission.timeout_ms, 10_000);
        assert_eq!(config.submission.note.as_deref(), Some("From quote tool"));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Human);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_without_path_is_default() {
        let config = BridgeConfig::load(None).unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(BridgeConfig::load(Some("/nonexistent/bridge.toml")).is_err());
    }

    // === Environment ===

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SHOPIFY_TOKEN", "shpat_env"),
            ("SHOP_NAME", "acme"),
            ("PORT", "9001"),
            ("ALERT_WEBHOOK_URL", "https://hooks.example.com/x"),
        ]
        .into_iter()
        .collect();

        let mut config = BridgeConfig::default();
        let ignored = config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert!(ignored.is_empty());

        assert_eq!(config.shop.access_token, "shpat_env");
        assert_eq!(config.shop.domain, "acme.myshopify.com");
        assert_eq!(config.server.port, 9001);
        assert_eq!(
            config.alerts.webhook_url.as_deref(),
            Some("https://hooks.example.com/x")
        );
    }

    #[test]
    fn test_env_ignores_blank_and_bad_values() {
        let mut config = configured();
        let ignored = config.apply_overrides(|key| match key {
            "SHOPIFY_TOKEN" => Some("  ".to_string()),
            "PORT" => Some("eighty".to_string()),
            _ => None,
        });
        assert_eq!(ignored, vec!["PORT"]);
        assert_eq!(config.shop.access_token, "shpat_test");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_shop_domain_expansion() {
        assert_eq!(shop_domain("acme"), "acme.myshopify.com");
        assert_eq!(shop_domain("shop.acme.com"), "shop.acme.com");
        assert_eq!(shop_domain("http://127.0.0.1:9000"), "http://127.0.0.1:9000");
    }

    // === Validation ===

    #[test]
    fn test_validate_requires_token_and_domain() {
        let mut config = configured();
        config.shop.access_token.clear();
        assert!(config.validate().is_err());

        let mut config = configured();
        config.shop.domain.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let mut config = configured();
        config.catalog.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = configured();
        config.submission.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_hides_token() {
        assert!(!format!("{:?}", configured()).contains("shpat_test"));
    }
}
