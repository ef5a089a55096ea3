//! Admission lifecycle callbacks for the Backend resource.
//!
//! The admission server dispatches CREATE/UPDATE/DELETE requests to these
//! methods and translates their result into an allow/deny response. They
//! are plain synchronous functions over the submitted object: no I/O, no
//! shared state, safe to call concurrently.

use kube::ResourceExt;

use crate::crd::Backend;
use crate::webhooks::policies::{Violation, validate_spec};

/// Structured rejection for a Backend that failed spec validation.
///
/// Carries the resource kind and name together with every violation found,
/// so callers can render per-field diagnostics instead of a generic error.
#[derive(Debug)]
pub struct InvalidBackend {
    /// Resource kind, always `Backend`.
    pub kind: String,
    /// Name of the rejected object (empty if unnamed).
    pub name: String,
    /// All broken invariants, in validation order.
    pub violations: Vec<Violation>,
}

impl std::fmt::Display for InvalidBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} \"{}\" is invalid: [", self.kind, self.name)?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", violation)?;
        }
        write!(f, "]")
    }
}

impl std::error::Error for InvalidBackend {}

impl Backend {
    /// Validate this Backend on CREATE.
    pub fn validate_create(&self) -> Result<(), InvalidBackend> {
        self.validate_backend_spec()
    }

    /// Validate this Backend on UPDATE.
    ///
    /// Update validation is identical to create validation: the prior
    /// state places no constraint on the new spec.
    pub fn validate_update(&self, _old: &Backend) -> Result<(), InvalidBackend> {
        self.validate_backend_spec()
    }

    /// Validate this Backend on DELETE. Deletion is always permitted.
    pub fn validate_delete(&self) -> Result<(), InvalidBackend> {
        Ok(())
    }

    /// Apply defaults to this Backend.
    ///
    /// No default values are currently specified; the hook exists so the
    /// mutating webhook path is wired for when they are.
    pub fn apply_defaults(&mut self) {}

    fn validate_backend_spec(&self) -> Result<(), InvalidBackend> {
        let violations = validate_spec(&self.spec);
        if violations.is_empty() {
            return Ok(());
        }
        Err(InvalidBackend {
            kind: "Backend".to_string(),
            name: self.name_any(),
            violations,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::crd::{BackendSpec, CircuitBreaker, RetryPolicy, Timeout};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn create_backend(spec: BackendSpec) -> Backend {
        Backend {
            metadata: ObjectMeta {
                name: Some("test-backend".to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            spec,
        }
    }

    #[test]
    fn test_create_with_valid_timeout() {
        let backend = create_backend(BackendSpec {
            timeout: Some(Timeout {
                route_timeout_seconds: 30,
                max_route_timeout_seconds: 60,
            }),
            ..Default::default()
        });
        assert!(backend.validate_create().is_ok());
    }

    #[test]
    fn test_create_with_inverted_timeout() {
        let backend = create_backend(BackendSpec {
            timeout: Some(Timeout {
                route_timeout_seconds: 60,
                max_route_timeout_seconds: 30,
            }),
            ..Default::default()
        });

        let err = backend.validate_create().expect_err("should be rejected");
        assert_eq!(err.kind, "Backend");
        assert_eq!(err.name, "test-backend");
        assert_eq!(err.violations.len(), 1);
        assert_eq!(
            err.violations[0].field_path,
            "spec.timeout.maxRouteTimeoutSeconds"
        );
    }

    #[test]
    fn test_update_ignores_old_object() {
        // Old object is invalid but irrelevant; only the new spec counts
        let old = create_backend(BackendSpec {
            circuit_breaker: Some(CircuitBreaker {
                max_connection_pools: 0,
            }),
            ..Default::default()
        });
        let new = create_backend(BackendSpec::default());
        assert!(new.validate_update(&old).is_ok());

        let invalid_new = create_backend(BackendSpec {
            retry: Some(RetryPolicy {
                count: -1,
                status_codes: vec![200, 500],
            }),
            ..Default::default()
        });
        let err = invalid_new
            .validate_update(&old)
            .expect_err("should be rejected");
        assert_eq!(err.violations.len(), 2);
    }

    #[test]
    fn test_delete_allows_invalid_spec() {
        let backend = create_backend(BackendSpec {
            circuit_breaker: Some(CircuitBreaker {
                max_connection_pools: -1,
            }),
            ..Default::default()
        });
        assert!(backend.validate_delete().is_ok());
    }

    #[test]
    fn test_apply_defaults_is_identity() {
        let mut backend = create_backend(BackendSpec {
            timeout: Some(Timeout {
                route_timeout_seconds: 30,
                max_route_timeout_seconds: 60,
            }),
            ..Default::default()
        });
        let before = serde_json::to_value(&backend).expect("serializable");
        backend.apply_defaults();
        let after = serde_json::to_value(&backend).expect("serializable");
        assert_eq!(before, after);
    }

    #[test]
    fn test_rejection_message_lists_every_violation() {
        let backend = create_backend(BackendSpec {
            timeout: Some(Timeout {
                route_timeout_seconds: 60,
                max_route_timeout_seconds: 30,
            }),
            circuit_breaker: Some(CircuitBreaker {
                max_connection_pools: 0,
            }),
            ..Default::default()
        });

        let err = backend.validate_create().expect_err("should be rejected");
        let message = err.to_string();
        assert!(message.starts_with("Backend \"test-backend\" is invalid: ["));
        assert!(message.contains("spec.timeout.maxRouteTimeoutSeconds"));
        assert!(message.contains("spec.circuitBreaker.maxConnectionPools"));
        assert!(message.contains("maxConnectionPools should be greater than 0"));
    }
}
