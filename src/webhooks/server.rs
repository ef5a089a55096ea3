//! Admission webhook server.
//!
//! Provides HTTP endpoints for Kubernetes admission webhooks.
//!
//! To enable webhooks:
//! 1. Deploy cert-manager for TLS certificates
//! 2. Create a ValidatingWebhookConfiguration (and a
//!    MutatingWebhookConfiguration for the defaulting path)
//! 3. Mount the TLS certificate secret to the operator pod at /etc/webhook/certs/
//!
//! The webhook server starts automatically when certificates are present.

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::crd::Backend;
use crate::health::HealthState;
use crate::webhooks::policies::validate_spec;

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;

/// Shared state for webhook handlers
pub struct WebhookState {
    pub health: Arc<HealthState>,
}

impl WebhookState {
    pub fn new(health: Arc<HealthState>) -> Self {
        Self { health }
    }
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/validate-backend", post(validate_backend))
        .route("/mutate-backend", post(mutate_backend))
        .with_state(state)
}

/// Decide a Backend admission request.
///
/// Pure dispatch over the operation: DELETE is always allowed, CREATE and
/// UPDATE run spec validation and deny with the full per-field violation
/// list. Transport concerns (metrics, logging, JSON framing) live in the
/// handlers so this stays trivially testable.
pub fn review_backend(request: &AdmissionRequest<Backend>) -> AdmissionResponse {
    // DELETE operations are always allowed
    if request.operation == Operation::Delete {
        return AdmissionResponse::from(request);
    }

    let backend = match &request.object {
        Some(obj) => obj,
        None => {
            return AdmissionResponse::from(request).deny("Missing object in request");
        }
    };

    let result = match request.operation {
        Operation::Update => match &request.old_object {
            Some(old) => backend.validate_update(old),
            // An UPDATE without an old object is validated like a CREATE;
            // the prior state is ignored either way
            None => backend.validate_create(),
        },
        _ => backend.validate_create(),
    };

    match result {
        Ok(()) => AdmissionResponse::from(request),
        Err(invalid) => AdmissionResponse::from(request).deny(invalid.to_string()),
    }
}

/// Validating webhook handler for Backend resources
async fn validate_backend(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<Backend>>,
) -> impl IntoResponse {
    let started = Instant::now();

    let request: AdmissionRequest<Backend> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                        .into_review(),
                ),
            );
        }
    };

    let uid = &request.uid;
    debug!(
        uid = %uid,
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = ?request.name,
        "Processing admission request"
    );

    let response = review_backend(&request);
    let operation = operation_label(&request.operation);
    state
        .health
        .metrics
        .record_admission(operation, response.allowed, started.elapsed().as_secs_f64());

    if response.allowed {
        info!(uid = %uid, operation = operation, "Admission request allowed");
    } else {
        if let Some(backend) = &request.object {
            for violation in validate_spec(&backend.spec) {
                state.health.metrics.record_violation(&violation.field_path);
            }
        }
        warn!(
            uid = %uid,
            operation = operation,
            message = %response.result.message,
            "Admission request denied"
        );
    }

    (StatusCode::OK, Json(response.into_review()))
}

/// Mutating webhook handler for Backend resources.
///
/// Runs the defaulting hook. No defaults are currently specified, so the
/// object comes back unchanged and the response carries no patch.
async fn mutate_backend(
    Json(review): Json<AdmissionReview<Backend>>,
) -> (StatusCode, Json<AdmissionReview<DynamicObject>>) {
    let request: AdmissionRequest<Backend> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                        .into_review(),
                ),
            );
        }
    };

    if let Some(backend) = &request.object {
        let mut defaulted = backend.clone();
        defaulted.apply_defaults();
    }

    debug!(uid = %request.uid, "Defaulting hook ran (no defaults specified)");
    (
        StatusCode::OK,
        Json(AdmissionResponse::from(&request).into_review()),
    )
}

fn operation_label(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "CREATE",
        Operation::Update => "UPDATE",
        Operation::Delete => "DELETE",
        Operation::Connect => "CONNECT",
    }
}

/// Errors that can occur when running the webhook server
#[derive(Debug, Error)]
pub enum WebhookError {
    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),
    /// Server error
    #[error("Webhook server error: {0}")]
    Server(String),
}

/// Run the webhook server with TLS
///
/// Binds to 0.0.0.0:9443 and serves the /validate-backend and
/// /mutate-backend endpoints. TLS certificates are loaded from the paths
/// specified.
///
/// # Arguments
/// * `health` - Shared health state for admission metrics
/// * `cert_path` - Path to TLS certificate file (PEM format)
/// * `key_path` - Path to TLS private key file (PEM format)
pub async fn run_webhook_server(
    health: Arc<HealthState>,
    cert_path: &str,
    key_path: &str,
) -> Result<(), WebhookError> {
    use axum_server::tls_rustls::RustlsConfig;
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let state = Arc::new(WebhookState::new(health));
    let app = create_webhook_router(state);

    let config = RustlsConfig::from_pem_file(PathBuf::from(cert_path), PathBuf::from(key_path))
        .await
        .map_err(|e| WebhookError::TlsConfig(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], WEBHOOK_PORT));
    info!(port = WEBHOOK_PORT, "Webhook server listening with TLS");

    axum_server::bind_rustls(addr, config)
        .serve(app.into_make_service())
        .await
        .map_err(|e| WebhookError::Server(e.to_string()))?;

    Ok(())
}
