//! Reelist server binary.

use anyhow::Context;
use axum::{Json, Router, routing::get};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelist_server::infra::app_state::AppState;
use reelist_server::infra::config::Settings;
use reelist_server::routes;

#[derive(Parser, Debug)]
#[command(name = "reelist-server")]
#[command(about = "Social movie tracking server with a TMDB-reconciled catalog cache")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = bootstrap(&cli.serve)?;

    if let Some(Command::Db(DbCommand::Migrate)) = cli.command {
        let pool = connect(&settings).await?;
        reelist_core::database::MIGRATOR
            .run(&pool)
            .await
            .context("database migration failed")?;
        info!("database migrations applied");
        return Ok(());
    }

    run_server(settings).await
}

/// Load `.env`, initialize logging, and resolve configuration with CLI
/// overrides applied.
fn bootstrap(args: &ServeArgs) -> anyhow::Result<Settings> {
    let env_loaded = dotenvy::dotenv().is_ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if env_loaded {
        info!("loaded .env file");
    }

    let mut settings = Settings::load().context("failed to load configuration")?;
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        settings.server.host = host;
    }
    Ok(settings)
}

async fn connect(settings: &Settings) -> anyhow::Result<sqlx::PgPool> {
    PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await
        .context("failed to connect to PostgreSQL")
}

async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let pool = connect(&settings).await?;
    reelist_core::database::MIGRATOR
        .run(&pool)
        .await
        .context("database migration failed")?;

    let addr: SocketAddr =
        format!("{}:{}", settings.server.host, settings.server.port)
            .parse()
            .context("invalid server host/port")?;

    let state = AppState::new(settings, pool)?;
    let app = Router::new()
        .route("/health", get(health))
        .merge(routes::create_api_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    info!(%addr, "reelist server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .await
        .context("server terminated")?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
