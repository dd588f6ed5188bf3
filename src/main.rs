use std::sync::Arc;

use anyhow::Context;
use polyglot_chatbot::{config::Config, routes, state::AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    configure_tracing();

    let config = Config::from_env().context("failed to read configuration")?;
    let state = AppState::from_config(&config)
        .await
        .context("failed to build application state")?;

    let status = state.model_status();
    info!(
        model_loaded = status.model_loaded,
        quotes_loaded = status.quotes_loaded,
        jokes_loaded = status.jokes_loaded,
        "state ready"
    );

    let app = routes::create_router(&config.static_dir).with_state(Arc::new(state));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "chatbot listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn configure_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        let kind = tokio::signal::unix::SignalKind::terminate();
        if let Ok(mut sig) = tokio::signal::unix::signal(kind) {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received");
}
