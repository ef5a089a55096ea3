//! Validation policies for Backend admission webhooks.
//!
//! Each optional policy block of `BackendSpec` has its own module. The
//! groups are evaluated in a fixed order (timeout, circuit breaker, retry,
//! health check) and never short-circuit: a single admission request can
//! report violations from every group at once.

pub mod circuit_breaker;
pub mod health_check;
pub mod retry;
pub mod timeout;

use serde::Serialize;
use serde_json::Value;

use crate::crd::BackendSpec;

/// A single broken invariant, identified by the JSON path of the offending
/// field, the offending value, and a human-readable message.
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    /// Stable field path, e.g. `spec.timeout.maxRouteTimeoutSeconds`.
    pub field_path: String,
    /// The value that broke the invariant, as submitted.
    pub value: Value,
    /// Human-readable description of the invariant.
    pub message: String,
}

impl Violation {
    /// Record an invalid field value.
    pub fn invalid(field_path: &str, value: impl Serialize, message: &str) -> Self {
        Self {
            field_path: field_path.to_string(),
            value: serde_json::to_value(value).unwrap_or(Value::Null),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: Invalid value: {}: {}",
            self.field_path, self.value, self.message
        )
    }
}

/// Validate a Backend spec against all policy invariants.
///
/// Pure and deterministic: the same spec always yields the same violations
/// in the same order. An empty result means the spec is valid. Absent
/// policy blocks contribute no violations.
pub fn validate_spec(spec: &BackendSpec) -> Vec<Violation> {
    let mut violations = Vec::new();
    violations.extend(timeout::validate(spec));
    violations.extend(circuit_breaker::validate(spec));
    violations.extend(retry::validate(spec));
    violations.extend(health_check::validate(spec));
    violations
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::crd::{CircuitBreaker, HealthCheck, RetryPolicy, Timeout};

    #[test]
    fn test_empty_spec_is_valid() {
        let spec = BackendSpec::default();
        assert!(validate_spec(&spec).is_empty());
    }

    #[test]
    fn test_violations_aggregate_across_groups() {
        let spec = BackendSpec {
            timeout: Some(Timeout {
                route_timeout_seconds: 60,
                max_route_timeout_seconds: 30,
            }),
            circuit_breaker: Some(CircuitBreaker {
                max_connection_pools: 0,
            }),
            retry: Some(RetryPolicy {
                count: -1,
                status_codes: vec![200],
            }),
            health_check: Some(HealthCheck {
                timeout_in_millis: -1,
                interval_in_millis: 5000,
                unhealthy_threshold: 3,
                healthy_threshold: 2,
            }),
        };

        let violations = validate_spec(&spec);
        let paths: Vec<&str> = violations.iter().map(|v| v.field_path.as_str()).collect();
        // Fixed group order: timeout, circuit breaker, retry, health check
        assert_eq!(
            paths,
            vec![
                "spec.timeout.maxRouteTimeoutSeconds",
                "spec.circuitBreaker.maxConnectionPools",
                "spec.retry.count",
                "spec.retry.statusCodes",
                "spec.healthCheck.timeoutInMillis",
            ]
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        let spec = BackendSpec {
            timeout: Some(Timeout {
                route_timeout_seconds: 60,
                max_route_timeout_seconds: 30,
            }),
            retry: Some(RetryPolicy {
                count: 2,
                status_codes: vec![200, 504, 599],
            }),
            ..Default::default()
        };

        let first = validate_spec(&spec);
        let second = validate_spec(&spec);
        assert_eq!(first, second);
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation::invalid(
            "spec.circuitBreaker.maxConnectionPools",
            0,
            "maxConnectionPools should be greater than 0",
        );
        assert_eq!(
            violation.to_string(),
            "spec.circuitBreaker.maxConnectionPools: Invalid value: 0: \
             maxConnectionPools should be greater than 0"
        );
    }
}
