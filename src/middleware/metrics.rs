//! Request metrics middleware.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `http_requests_total` | Counter | `method`, `path`, `status` |
//! | `http_request_duration_seconds` | Histogram | `method`, `path`, `status` |
//!
//! Paths outside the known route table are reported as `/*` to keep label
//! cardinality bounded.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Known REST paths for metric label normalization.
const KNOWN_PATHS: &[&str] = &[
    "/",
    "/health",
    "/health/live",
    "/health/ready",
    "/metrics",
    "/api/check",
    "/api/announcement",
];

/// Record count and latency of every request.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());
    let start = Instant::now();

    let response = next.run(req).await;

    let labels = [
        ("method", method),
        ("path", path.to_string()),
        ("status", response.status().as_u16().to_string()),
    ];
    metrics::counter!("http_requests_total", &labels).increment(1);
    metrics::histogram!("http_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());

    response
}

fn normalize_path(path: &str) -> &'static str {
    KNOWN_PATHS
        .iter()
        .find(|known| **known == path)
        .copied()
        .unwrap_or("/*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_pass_through() {
        assert_eq!(normalize_path("/api/check"), "/api/check");
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
    }

    #[test]
    fn unknown_paths_bucketed() {
        assert_eq!(normalize_path("/api/check/2201"), "/*");
        assert_eq!(normalize_path("/wp-login.php"), "/*");
    }
}
