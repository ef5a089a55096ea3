//! Webhook module for validating and defaulting admission requests.
//!
//! - `policies`: pure spec validation (field-path violations)
//! - `admission`: lifecycle callbacks dispatched per operation
//! - `server`: HTTPS endpoints speaking the AdmissionReview protocol

pub mod admission;
pub mod policies;
mod server;

pub use admission::InvalidBackend;
pub use policies::{Violation, validate_spec};
pub use server::{
    WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, WebhookError, review_backend,
    run_webhook_server,
};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
