//! backend-operator - Kubernetes admission webhooks for Backend resources.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Starts the health server
//! - Starts the admission webhook server when TLS certificates are mounted
//! - Shuts down gracefully on SIGTERM/SIGINT

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info};

use backend_operator::health::{HealthState, run_health_server};
use backend_operator::{WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, run_webhook_server};

/// Grace period for in-flight admission requests to complete during shutdown
const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("backend_operator=info".parse()?),
        )
        .json()
        .init();

    info!("Starting backend-operator");

    // Create shared health state
    let health_state = Arc::new(HealthState::new());

    // Start health server immediately (probes should work before the webhook is up)
    let health_handle = {
        let health_state = health_state.clone();
        tokio::spawn(async move {
            if let Err(e) = run_health_server(health_state).await {
                error!("Health server error: {}", e);
            }
        })
    };

    // Start the webhook server if certificates are available
    let webhook_handle =
        if Path::new(WEBHOOK_CERT_PATH).exists() && Path::new(WEBHOOK_KEY_PATH).exists() {
            info!("TLS certificates found, starting webhook server");
            health_state.set_ready(true).await;
            let webhook_state = health_state.clone();
            Some(tokio::spawn(async move {
                if let Err(e) =
                    run_webhook_server(webhook_state, WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH).await
                {
                    error!("Webhook server error: {}", e);
                }
            }))
        } else {
            info!("Webhook certificates not found, webhook server disabled");
            None
        };

    // Wait for any task to complete (or fail), or shutdown signal
    tokio::select! {
        result = health_handle => {
            if let Err(e) = result {
                error!("Health server task panicked: {}", e);
            }
        }
        result = async {
            match webhook_handle {
                Some(handle) => handle.await,
                None => std::future::pending().await,
            }
        } => {
            if let Err(e) = result {
                error!("Webhook server task panicked: {}", e);
            }
        }
        // Handle graceful shutdown on SIGTERM or SIGINT
        _ = shutdown_signal() => {
            info!("Received shutdown signal, initiating graceful shutdown...");

            // Mark as not ready so the endpoint is pulled from rotation
            health_state.set_ready(false).await;
            info!("Marked operator as not ready");

            // Give in-flight admission requests time to complete
            info!(
                "Waiting {}s for in-flight admission requests to complete...",
                SHUTDOWN_GRACE_PERIOD_SECS
            );
            tokio::time::sleep(Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS)).await;

            info!("Grace period complete, shutting down");
        }
    }

    info!("Operator stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the operator cannot shut down
/// gracefully without them. Using expect() here is intentional.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
