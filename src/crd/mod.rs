//! Custom Resource Definitions (CRDs) for backend-operator.
//!
//! - `Backend`: upstream connection policy for the routing layer
//!   (timeouts, circuit breaking, retries, health checks)

mod backend;

pub use backend::*;
