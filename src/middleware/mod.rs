//! HTTP middleware for the REST endpoints.
//!
//! # Middleware Order
//! Layers are listed outermost first in `startup::build_router`:
//! 1. TraceLayer - request span
//! 2. request_id - extract/generate `x-request-id`, record it on the span
//! 3. track_metrics - request count and latency
//! 4. CorsLayer - CORS handling

pub mod metrics;
pub mod request_id;

pub use metrics::track_metrics;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id};
