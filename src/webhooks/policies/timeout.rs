//! Route timeout validation policy.
//!
//! Validates:
//! - `maxRouteTimeoutSeconds` is at least `routeTimeoutSeconds`

use super::Violation;
use crate::crd::BackendSpec;

/// Validate the timeout block, if present.
pub fn validate(spec: &BackendSpec) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Some(timeout) = &spec.timeout {
        if timeout.max_route_timeout_seconds < timeout.route_timeout_seconds {
            violations.push(Violation::invalid(
                "spec.timeout.maxRouteTimeoutSeconds",
                timeout.max_route_timeout_seconds,
                "maxRouteTimeoutSeconds should be greater than routeTimeoutSeconds",
            ));
        }
    }

    violations
}
