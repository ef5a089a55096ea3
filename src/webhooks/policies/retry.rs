//! Retry policy validation.
//!
//! Validates:
//! - `count` is not negative
//! - every entry in `statusCodes` lies in the inclusive range [401, 598]
//!
//! Every out-of-range status code appends its own violation; the recorded
//! value is the whole statusCodes list.

use super::Violation;
use crate::crd::BackendSpec;

/// Inclusive range of status codes the retry policy may match on.
const MIN_RETRY_STATUS_CODE: u16 = 401;
const MAX_RETRY_STATUS_CODE: u16 = 598;

/// Validate the retry block, if present.
pub fn validate(spec: &BackendSpec) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Some(retry) = &spec.retry {
        if retry.count < 0 {
            violations.push(Violation::invalid(
                "spec.retry.count",
                retry.count,
                "retry count should be greater than or equal to 0",
            ));
        }
        for status_code in &retry.status_codes {
            if *status_code > MAX_RETRY_STATUS_CODE || *status_code < MIN_RETRY_STATUS_CODE {
                violations.push(Violation::invalid(
                    "spec.retry.statusCodes",
                    &retry.status_codes,
                    "status code should be between 401 and 598",
                ));
            }
        }
    }

    violations
}
