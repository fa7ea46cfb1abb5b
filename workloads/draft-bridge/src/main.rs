//! Draft Bridge - turns quotes and storefront carts into draft orders.
//!
//! Configuration comes from an optional TOML/JSON file, then the
//! environment (`SHOPIFY_TOKEN`, `SHOP_NAME`, `PORT`, `ALERT_WEBHOOK_URL`),
//! then command-line flags.

use anyhow::Result;
use clap::Parser;
use draft_bridge::{server, BridgeConfig};
use draft_observability::{init_logging, LogFormat, LogLevel};

/// Draft Bridge - quote entry to commerce draft orders
#[derive(Parser)]
#[command(name = "draft-bridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, env = "DRAFT_BRIDGE_CONFIG")]
    config: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log format (json or human)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Log level
    #[arg(long)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = BridgeConfig::load(cli.config.as_deref())?;
    let ignored_env = config.apply_env();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_logging(config.logging.level, config.logging.format)?;
    for key in ignored_env {
        tracing::warn!(key, "ignoring unparseable environment override");
    }
    config.validate()?;

    server::run(config).await
}
