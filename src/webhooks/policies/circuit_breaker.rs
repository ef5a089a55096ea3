//! Circuit breaker validation policy.
//!
//! Validates:
//! - `maxConnectionPools` is strictly positive

use super::Violation;
use crate::crd::BackendSpec;

/// Validate the circuit breaker block, if present.
pub fn validate(spec: &BackendSpec) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Some(circuit_breaker) = &spec.circuit_breaker {
        if circuit_breaker.max_connection_pools <= 0 {
            violations.push(Violation::invalid(
                "spec.circuitBreaker.maxConnectionPools",
                circuit_breaker.max_connection_pools,
                "maxConnectionPools should be greater than 0",
            ));
        }
    }

    violations
}
