mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use invoicing::{InvoicingService, Migrator};
use mimalloc::MiMalloc;
use sea_orm_migration::MigratorTrait;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, Backend, CliOverrides, LogFormat, redact_credentials_in_dsn};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Invoicing REST service with swappable storage backends
#[derive(Parser)]
#[command(name = "invoicing-server")]
#[command(about = "Invoicing REST service with swappable storage backends")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Storage backend override (overrides config)
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config {
        if !Path::new(path).is_file() {
            anyhow::bail!("config file does not exist: {}", path.display());
        }
    }

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (INVOICING__*) -> 4) CLI overrides
    let overrides = CliOverrides {
        port: cli.port,
        backend: cli.backend,
        verbose: cli.verbose,
    };
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&overrides);

    init_tracing(&config);

    tracing::info!("Invoicing server starting");

    if cli.print_config {
        println!(
            "Effective configuration:\n{}",
            serde_json::to_string_pretty(&config)?
        );
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn init_tracing(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    config.validate()?;
    println!("Configuration is valid");
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    config.validate()?;

    let service = build_service(&config).await?;
    let router = invoicing::router(Arc::new(service)).layer(TraceLayer::new_for_http().make_span_with(
        |req: &axum::http::Request<axum::body::Body>| {
            tracing::info_span!("http_request", method = %req.method(), uri = %req.uri().path())
        },
    ));

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;
    Ok(())
}

/// Connect to the configured store, bring the schema up to date and wire
/// the chosen repository bundle into the service.
async fn build_service(config: &AppConfig) -> Result<InvoicingService> {
    let db = &config.database;
    tracing::info!(
        backend = ?db.backend,
        url = %redact_credentials_in_dsn(&db.url),
        "Connecting to database"
    );

    let repos = match db.backend {
        Backend::Orm => {
            let mut opts = sea_orm::ConnectOptions::new(db.url.clone());
            opts.max_connections(db.max_connections)
                .connect_timeout(Duration::from_secs(db.connect_timeout_secs));
            let conn = sea_orm::Database::connect(opts)
                .await
                .context("database connection failed")?;
            Migrator::up(&conn, None).await.context("migrations failed")?;
            invoicing::sea_orm_repositories(conn)
        }
        Backend::Sqlx => {
            // Schema management stays with the shared migrator; the sqlx
            // pool then works against the migrated schema.
            let conn = sea_orm::Database::connect(db.url.clone())
                .await
                .context("database connection failed")?;
            Migrator::up(&conn, None).await.context("migrations failed")?;

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(db.max_connections)
                .acquire_timeout(Duration::from_secs(db.connect_timeout_secs))
                .connect(&db.url)
                .await
                .context("database connection failed")?;
            invoicing::sqlx_repositories(pool)
        }
    };

    Ok(InvoicingService::new(repos))
}

/// Resolve when SIGINT or SIGTERM arrives; the serve loop then drains
/// in-flight requests before returning.
async fn wait_for_shutdown() {
    let result = tokio::select! {
        r = tokio::signal::ctrl_c() => r.map(|()| "SIGINT"),
        r = wait_sigterm() => r.map(|()| "SIGTERM"),
    };
    match result {
        Ok(signal) => {
            tracing::info!(signal, "Shutdown signal received, initiating graceful shutdown");
        }
        Err(e) => tracing::error!(%e, "Signal handler failed; shutting down"),
    }
}

#[cfg(unix)]
async fn wait_sigterm() -> std::io::Result<()> {
    let mut handler = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    handler.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_sigterm() -> std::io::Result<()> {
    std::future::pending().await
}
