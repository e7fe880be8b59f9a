// Secret Santa server entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config
// 3. Open the participant store
// 4. Seed participants (first run only)
// 5. Build the router and serve until ctrl-c

use std::sync::Arc;

use santa_server::config;
use santa_server::db;
use santa_server::server;

use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Secret Santa server starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: port={}, db={}, {} seed participants",
        config.port,
        config.db_path,
        config.seed.len()
    );

    // 3. Open the participant store
    let database = db::Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    // 4. Seed participants when the store is empty
    let seeded = database
        .seed_if_empty(&config.seed)
        .context("failed to seed participants")?;
    if seeded > 0 {
        info!("Seeded {seeded} participants from config");
    }

    // 5. Build the router and serve
    let state = server::AppState {
        db: Arc::new(database),
    };
    let app = server::router(state);

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Secret Santa server shut down cleanly");
    Ok(())
}

/// Initialize tracing to stderr with an env-filter override
/// (`RUST_LOG=santa_server=debug` and friends).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("santa_server=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

/// Resolve when the process receives ctrl-c, triggering graceful shutdown.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received");
}
