use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use webmail_api::{Config, EmailStore, MemoryEmailStore, PgEmailStore, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::from_env()?;

    match config.database_url.as_deref() {
        Some(database_url) => {
            let store = PgEmailStore::connect(database_url, config.max_connections).await?;
            serve(&config, store).await?;
        }
        None => {
            warn!("DATABASE_URL is not set, serving the seeded in-memory store");
            serve(&config, MemoryEmailStore::seeded()).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    // RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new("webmail_api=debug,tower_http=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn serve<S: EmailStore>(config: &Config, store: S) -> std::io::Result<()> {
    let app = router(store.clone());

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down server...");
    store.close().await;
    info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
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
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
