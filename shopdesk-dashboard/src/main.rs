use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shopdesk_dashboard::{validate::parse_price_arg, views, watch, ApiClient};
use shopdesk_shared::{BulkPriceItem, BulkVariantUpdateRequest};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shopdesk-dashboard", about = "Terminal dashboard for the shop catalog API")]
struct Cli {
    /// Server root, without the API base path
    #[arg(long, env = "SHOPDESK_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    /// Operator bearer token for the bulk endpoints
    #[arg(long, env = "SHOPDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List published products with their variants
    Products,
    /// Show stock status per product
    Inventory {
        /// Refresh every SECS seconds until interrupted
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
        /// Use the server-side summary endpoint
        #[arg(long, conflicts_with = "watch")]
        summary: bool,
    },
    /// Apply stock/price changes from a JSON file ({"variants": [...]})
    Update {
        #[arg(long)]
        file: PathBuf,
    },
    /// Quote bulk prices for <variant_id>:<quantity> pairs
    Price {
        #[arg(required = true, value_parser = parse_price_arg)]
        items: Vec<BulkPriceItem>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so tables can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopdesk_dashboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut client = ApiClient::new(cli.api_url);
    if let Some(token) = cli.token {
        client = client.with_token(token);
    }

    match cli.command {
        Command::Products => {
            let products = client.get_products().await?;
            print!("{}", views::render_products(&products));
        }
        Command::Inventory { watch: Some(secs), .. } => {
            anyhow::ensure!(secs > 0, "--watch interval must be at least one second");
            watch::watch_inventory(&client, Duration::from_secs(secs)).await;
        }
        Command::Inventory { watch: None, summary: true } => {
            let summary = client.get_inventory_summary().await?;
            print!("{}", views::render_summary(&summary));
        }
        Command::Inventory { watch: None, summary: false } => {
            let entries = client.get_inventory_status().await?;
            print!("{}", views::render_inventory(&entries));
        }
        Command::Update { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let request: BulkVariantUpdateRequest =
                serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;

            let response = client.update_variants(request.variants).await?;
            print!("{}", views::render_update_results(&response));
        }
        Command::Price { items } => {
            let response = client.calculate_bulk_prices(items).await?;
            print!("{}", views::render_bulk_prices(&response));
        }
    }

    Ok(())
}
