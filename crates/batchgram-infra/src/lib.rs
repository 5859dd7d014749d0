//! Batchgram Infrastructure Library
//!
//! Shared infrastructure for the relay service:
//! - Middleware (request ID)
//! - Telemetry initialization
//! - Retry with exponential backoff

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod retry;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{request_id_middleware, RequestId};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

pub use retry::{with_retry, with_retry_if, RetryPolicy, Sleeper, TokioSleeper};
