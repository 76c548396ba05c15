use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shopdesk_api::{app, auth::issue_token, AppState, AuthConfig};
use shopdesk_core::CatalogService;
use shopdesk_store::app_config::{Config, StorageBackend};
use shopdesk_store::{DbClient, MemoryCatalog, PgBulkRuleRepository, PgCatalogRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shopdesk-api", version, about = "Bulk product, inventory and pricing API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Print a signed operator token
    MintToken {
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "SHOP_MANAGER")]
        role: String,
        /// Extra permission, repeatable (e.g. prices:read)
        #[arg(long = "permission")]
        permissions: Vec<String>,
        #[arg(long)]
        ttl_seconds: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopdesk_api=debug,shopdesk_core=info,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load config")?;
    let auth = AuthConfig {
        secret: config.auth.jwt_secret.clone(),
        expiration: config.auth.jwt_expiration_seconds,
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, auth).await,
        Command::Migrate => {
            let db = connect(&config).await?;
            db.migrate().await.context("Migration failed")?;
            Ok(())
        }
        Command::MintToken { subject, role, permissions, ttl_seconds } => {
            let token = issue_token(&auth, &subject, &role, permissions, ttl_seconds)
                .context("Failed to mint token")?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(config: Config, auth: AuthConfig) -> anyhow::Result<()> {
    tracing::info!("Starting shopdesk API on port {}", config.server.port);

    let schedule = config.pricing.schedule().context("Invalid pricing tiers")?;
    let catalog = match config.storage.backend {
        StorageBackend::Memory => {
            let store = Arc::new(match &config.storage.seed_file {
                Some(path) => MemoryCatalog::load(path).await?,
                None => MemoryCatalog::empty(),
            });
            tracing::warn!("Using in-memory catalog; changes are lost on restart");
            CatalogService::new(store.clone(), store, schedule)
        }
        StorageBackend::Postgres => {
            let db = connect(&config).await?;
            CatalogService::new(
                Arc::new(PgCatalogRepository::new(db.pool.clone())),
                Arc::new(PgBulkRuleRepository::new(db.pool.clone())),
                schedule,
            )
        }
    };

    let app = app(AppState { catalog: Arc::new(catalog), auth });

    let host: std::net::IpAddr = config.server.host.parse().context("Invalid server.host")?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn connect(config: &Config) -> anyhow::Result<DbClient> {
    let url = config
        .database
        .url
        .as_deref()
        .context("database.url is required for the postgres backend")?;

    DbClient::new(url, config.database.max_connections)
        .await
        .context("Failed to connect to Postgres")
}
