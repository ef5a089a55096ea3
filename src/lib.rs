//! backend-operator library crate
//!
//! This module exports the Backend CRD definition, the admission
//! validation logic, and the webhook/health servers.

pub mod crd;
pub mod health;
pub mod webhooks;

pub use health::{HealthState, run_health_server};
pub use webhooks::{
    WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, InvalidBackend, Violation, WebhookError,
    review_backend, run_webhook_server, validate_spec,
};
