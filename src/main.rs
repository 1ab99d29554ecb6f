use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use project_api::app::app;
use project_api::auth::{generate_jwt, Claims};
use project_api::config::{config, AppConfig};
use project_api::database::{DatabaseManager, MemoryProjectGateway, PgProjectGateway, ProjectGateway};
use project_api::state::AppState;
use project_api::types::Role;

#[derive(Parser)]
#[command(name = "project-api-rust")]
#[command(about = "Project resource API server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Bind address, overrides HOST
        #[arg(long)]
        host: Option<String>,
        /// Bind port, overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print a signed JWT for the configured secret
    Token {
        /// Username recorded as createdBy/updatedBy
        #[arg(long, default_value = "admin")]
        user: String,
        /// Role to grant, repeatable (public, sysadmin, staff)
        #[arg(long = "role", default_value = "staff")]
        roles: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let mut config = config().clone();
    init_tracing(&config);

    match Cli::parse().command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Commands::Token { user, roles } => {
            let roles = roles
                .iter()
                .map(|r| Role::parse(r).ok_or_else(|| anyhow::anyhow!("unknown role '{}'", r)))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let claims = Claims::new(user, &roles, config.security.jwt_expiry_hours);
            println!("{}", generate_jwt(&claims, &config.security.jwt_secret)?);
            Ok(())
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let default = if config.api.enable_request_logging {
        "info,tower_http=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Project API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set in {:?} mode", config.environment);
    }
    if project_api::is_development!() {
        tracing::warn!("Using development JWT secret; do not expose this server");
    }

    let mut database = None;
    let gateway: Arc<dyn ProjectGateway> = match config.database.url {
        Some(_) => {
            let db = DatabaseManager::connect(&config.database).await?;
            database = Some(db.clone());
            let gateway = PgProjectGateway::new(db, config.database.enable_query_logging);
            gateway.ensure_schema().await?;
            Arc::new(gateway)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, projects are kept in memory");
            Arc::new(MemoryProjectGateway::new())
        }
    };

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Project API listening on http://{}", bind_addr);

    axum::serve(listener, app(AppState::new(gateway, config)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = database {
        db.close().await;
    }
    tracing::info!("Project API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
