//! Health check validation policy.
//!
//! Validates independently, so several fields can be reported at once:
//! - `timeoutInMillis` is not negative
//! - `intervalInMillis` is not negative
//! - `unhealthyThreshold` is not negative
//! - `healthyThreshold` is not negative

use super::Violation;
use crate::crd::BackendSpec;

/// Validate the health check block, if present.
pub fn validate(spec: &BackendSpec) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Some(health_check) = &spec.health_check {
        if health_check.timeout_in_millis < 0 {
            violations.push(Violation::invalid(
                "spec.healthCheck.timeoutInMillis",
                health_check.timeout_in_millis,
                "timeout should be greater than or equal to 0",
            ));
        }
        if health_check.interval_in_millis < 0 {
            violations.push(Violation::invalid(
                "spec.healthCheck.intervalInMillis",
                health_check.interval_in_millis,
                "interval should be greater than or equal to 0",
            ));
        }
        if health_check.unhealthy_threshold < 0 {
            violations.push(Violation::invalid(
                "spec.healthCheck.unhealthyThreshold",
                health_check.unhealthy_threshold,
                "unhealthyThreshold should be greater than or equal to 0",
            ));
        }
        if health_check.healthy_threshold < 0 {
            violations.push(Violation::invalid(
                "spec.healthCheck.healthyThreshold",
                health_check.healthy_threshold,
                "healthyThreshold should be greater than or equal to 0",
            ));
        }
    }

    violations
}
