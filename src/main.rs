//! Transport Content API server
//!
//! Loads settings, builds the connection pool and serves the content router.

use transport_content_api::config::Settings;
use transport_content_api::db::{self, PgContentStore};
use transport_content_api::handler::ContentHandler;
use transport_content_api::routes::create_router;
use transport_content_api::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("Starting Transport Content API...");

    // Load configuration
    let settings = Settings::load()?;
    info!("Configuration loaded successfully");

    let handler = match &settings.database {
        Some(database) => {
            let pool = db::create_pool(database)?;

            if database.bootstrap_schema {
                if let Err(e) = db::bootstrap_schema(&pool).await {
                    warn!("Schema bootstrap failed: {}", e);
                }
            }

            ContentHandler::new(Arc::new(PgContentStore::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set; content requests will fail with 500 until it is configured");
            ContentHandler::unconfigured()
        }
    };

    let app = create_router(Arc::new(AppState::new(handler)));

    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("Server listening on http://{}", addr);
    info!("   ANY  /content?entity=<name>  - Content CRUD (services, regions, news, schedule, company_info)");
    info!("   GET  /content                - Aggregate read of all entities");
    info!("   POST /events                 - Run a raw gateway event");
    info!("   GET  /health                 - Liveness check");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,transport_content_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        },
    }
}
