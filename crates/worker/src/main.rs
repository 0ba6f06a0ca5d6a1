use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medchain_worker::{Monitor, MonitorConfig, MonitorScheduler, PgInventoryStore};

/// Standalone monitor process.
///
/// `medchain-worker` runs the scheduler until SIGINT/SIGTERM.
/// `medchain-worker --once` performs a single run and exits, for cron.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medchain_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let once = std::env::args().any(|arg| arg == "--once");
    let config = MonitorConfig::from_env();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = medchain_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    medchain_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let store = Arc::new(PgInventoryStore::new(pool.clone()));
    let monitor = Arc::new(Monitor::new(store, config.thresholds.clone()));

    if once {
        match monitor.run_once(chrono::Utc::now()).await {
            Ok(summary) => tracing::info!(?summary, "Single monitoring run finished"),
            Err(e) => {
                tracing::error!(error = %e, "Single monitoring run failed");
                pool.close().await;
                std::process::exit(1);
            }
        }
        pool.close().await;
        return;
    }

    let cancel = CancellationToken::new();
    let scheduler = MonitorScheduler::new(Arc::clone(&monitor), config.interval);
    let scheduler_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        scheduler.run(scheduler_cancel).await;
    });

    shutdown_signal().await;
    cancel.cancel();
    let _ = handle.await;
    pool.close().await;
    tracing::info!("Worker shut down");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT (Ctrl-C), shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
