//! Backend Custom Resource Definition.
//!
//! Defines the Backend CRD describing how the routing layer connects to an
//! upstream service. Every policy block is optional; an absent block means
//! the routing layer applies no constraint of that kind and the admission
//! webhook skips the corresponding invariant group.
//!
//! Example:
//! ```yaml
//! apiVersion: gateway.smoketurner.com/v1alpha1
//! kind: Backend
//! metadata:
//!   name: orders-api
//! spec:
//!   timeout:
//!     routeTimeoutSeconds: 30
//!     maxRouteTimeoutSeconds: 60
//!   circuitBreaker:
//!     maxConnectionPools: 100
//!   retry:
//!     count: 3
//!     statusCodes: [502, 503, 504]
//!   healthCheck:
//!     timeoutInMillis: 1000
//!     intervalInMillis: 5000
//!     unhealthyThreshold: 3
//!     healthyThreshold: 2
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Backend is a custom resource describing upstream connection policy.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "gateway.smoketurner.com",
    version = "v1alpha1",
    kind = "Backend",
    plural = "backends",
    shortname = "be",
    namespaced,
    // Print columns for kubectl get
    printcolumn = r#"{"name":"Route Timeout", "type":"integer", "jsonPath":".spec.timeout.routeTimeoutSeconds"}"#,
    printcolumn = r#"{"name":"Retries", "type":"integer", "jsonPath":".spec.retry.count"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct BackendSpec {
    /// Request timeout bounds applied per route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Timeout>,

    /// Circuit breaker limits for the upstream connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_breaker: Option<CircuitBreaker>,

    /// Retry policy for failed upstream requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryPolicy>,

    /// Active health checking of the upstream service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
}

/// Request timeout bounds, in seconds.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Timeout {
    /// Timeout applied to each routed request.
    pub route_timeout_seconds: u32,

    /// Upper bound a route may raise its timeout to.
    /// Must be greater than or equal to `routeTimeoutSeconds`.
    pub max_route_timeout_seconds: u32,
}

/// Circuit breaker limits.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CircuitBreaker {
    /// Maximum number of connection pools kept to the upstream.
    /// Must be greater than 0.
    pub max_connection_pools: i32,
}

/// Retry policy for failed upstream requests.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Number of retries attempted before giving up. Must not be negative.
    pub count: i32,

    /// HTTP status codes that trigger a retry.
    /// Each code must lie in the inclusive range [401, 598].
    #[serde(default)]
    pub status_codes: Vec<u16>,
}

/// Active health check parameters. All values must be non-negative.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    /// Per-probe timeout in milliseconds.
    pub timeout_in_millis: i32,

    /// Interval between probes in milliseconds.
    pub interval_in_millis: i32,

    /// Consecutive failed probes before marking the upstream unhealthy.
    pub unhealthy_threshold: i32,

    /// Consecutive successful probes before marking the upstream healthy.
    pub healthy_threshold: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_has_no_policy_blocks() {
        let spec = BackendSpec::default();
        assert!(spec.timeout.is_none());
        assert!(spec.circuit_breaker.is_none());
        assert!(spec.retry.is_none());
        assert!(spec.health_check.is_none());
    }

    #[test]
    fn test_spec_serialization() {
        let spec = BackendSpec {
            timeout: Some(Timeout {
                route_timeout_seconds: 30,
                max_route_timeout_seconds: 60,
            }),
            circuit_breaker: Some(CircuitBreaker {
                max_connection_pools: 100,
            }),
            retry: Some(RetryPolicy {
                count: 3,
                status_codes: vec![502, 503, 504],
            }),
            health_check: Some(HealthCheck {
                timeout_in_millis: 1000,
                interval_in_millis: 5000,
                unhealthy_threshold: 3,
                healthy_threshold: 2,
            }),
        };

        let json = serde_json::to_string(&spec).expect("serialization should succeed");
        // JSON field names are the stable paths tooling matches on
        assert!(json.contains("\"routeTimeoutSeconds\":30"));
        assert!(json.contains("\"maxRouteTimeoutSeconds\":60"));
        assert!(json.contains("\"maxConnectionPools\":100"));
        assert!(json.contains("\"timeoutInMillis\":1000"));
        assert!(json.contains("\"intervalInMillis\":5000"));

        let parsed: BackendSpec =
            serde_json::from_str(&json).expect("deserialization should succeed");
        assert_eq!(parsed.retry.as_ref().map(|r| r.count), Some(3));
        assert_eq!(
            parsed.retry.map(|r| r.status_codes),
            Some(vec![502, 503, 504])
        );
    }

    #[test]
    fn test_absent_blocks_deserialize_to_none() {
        let spec: BackendSpec = serde_json::from_str("{}").expect("empty spec is valid JSON");
        assert!(spec.timeout.is_none());
        assert!(spec.circuit_breaker.is_none());
        assert!(spec.retry.is_none());
        assert!(spec.health_check.is_none());
    }

    #[test]
    fn test_retry_status_codes_default_to_empty() {
        let spec: BackendSpec = serde_json::from_str(r#"{"retry":{"count":2}}"#)
            .expect("retry without statusCodes should deserialize");
        let retry = spec.retry.expect("retry block present");
        assert_eq!(retry.count, 2);
        assert!(retry.status_codes.is_empty());
    }
}
