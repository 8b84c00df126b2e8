//! ghtelex Web Server - GitHub webhook receiver.
//!
//! This binary provides a thin web server that:
//! - Receives webhooks from GitHub
//! - Verifies the `X-Hub-Signature-256` signature
//! - Turns the event into a readable message
//! - Forwards it to Telex in the background and returns 200 OK

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ghtelex::web::bind;
use ghtelex::{router, AppState, Config, TelexClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    config.validate().context("Invalid configuration")?;
    info!(
        host = %config.host,
        port = config.port,
        telex_timeout_ms = config.telex_timeout_ms,
        "config_loaded"
    );

    let telex = TelexClient::new(config.telex_webhook_url.clone(), config.telex_timeout())?;
    info!(url_length = telex.webhook_url().len(), "telex_client_created");

    let app = router(AppState::new(config.clone(), telex));

    let listener = bind(&config).await?;

    info!(address = %listener.local_addr()?, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Resolve once SIGINT or (on unix) SIGTERM arrives.
///
/// If the SIGTERM handler cannot be installed, only Ctrl+C stops the server.
async fn shutdown_signal() {
    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "sigterm_handler_unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    let received = tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                warn!(error = %e, "ctrl_c_handler_failed");
            }
            "SIGINT"
        }
        _ = sigterm => "SIGTERM",
    };

    info!(signal = received, "web_server_shutting_down");
}
