//! Tasklane API server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tasklane_api::config::AppConfig;
use tasklane_api::error::StartupError;
use tasklane_api::state::AppState;
use tasklane_api::{serve, telemetry};
use tasklane_core::clock::SystemClock;
use tasklane_identity::{InMemoryIdentityService, seed_defaults};
use tasklane_persistence::{InMemoryTodoStore, PgTodoStore, TodoStore};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    let telemetry_guard = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting Tasklane API server");

    let store: Arc<dyn TodoStore> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await?;
            if config.run_migrations {
                sqlx::migrate!("../../migrations").run(&pool).await?;
                tracing::info!("database migrations applied");
            }
            Arc::new(PgTodoStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store");
            Arc::new(InMemoryTodoStore::new())
        }
    };

    let identity = Arc::new(InMemoryIdentityService::new());
    if config.seed_identity {
        seed_defaults(&identity).await?;
    }

    let state = AppState::assemble(
        store,
        identity,
        Arc::new(SystemClock),
        config.long_running_threshold,
    );

    let addr = config.listen_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve(listener, state, ctrl_c()).await?;
    tracing::info!("Server stopped");

    telemetry_guard.shutdown();
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the server keeps
/// running until it is killed.
async fn ctrl_c() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
