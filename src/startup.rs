//! Server startup and wiring.

use std::net::SocketAddr;
use std::time::Duration;

use announce_sheets::SheetsClient;
use announce_telemetry::PrometheusHandle;
use axum::Router;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use crate::config::Config;
use crate::middleware::{REQUEST_ID_HEADER, request_id, track_metrics};
use crate::routes::{AppState, rest_routes};

/// Build and configure the complete application.
pub fn build_app(
    config: &Config,
    metrics_handle: PrometheusHandle,
) -> anyhow::Result<(Router, SocketAddr)> {
    let addr = config.listen_addr()?;

    let sheets = SheetsClient::new(config.sheets_config()?)?;
    if sheets.validate_config().is_err() {
        info!("Dataset credentials missing, lookups will report a configuration error");
    }

    let router = build_router(
        AppState::new(sheets),
        Some(metrics_handle),
        config.cors_allow_origins.as_deref(),
    );

    Ok((router, addr))
}

/// REST routes, plus `/metrics` when a handle is given, wrapped in the middleware stack.
pub fn build_router(
    state: AppState,
    metrics_handle: Option<PrometheusHandle>,
    cors_origins: Option<&str>,
) -> Router {
    let mut routes = rest_routes(state);
    if let Some(handle) = metrics_handle {
        routes = routes.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { handle.render() }
            }),
        );
    }

    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    // Path only: the query string carries the visitor's identifier
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        path = %req.uri().path(),
                        request_id = tracing::field::Empty,
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(axum::middleware::from_fn(request_id))
        .layer(axum::middleware::from_fn(track_metrics))
        .layer(build_cors(cors_origins));

    routes.layer(middleware)
}

fn build_cors(origins: Option<&str>) -> CorsLayer {
    let cors = match origins {
        Some(o) if o.trim() == "*" => CorsLayer::permissive(),
        Some(o) => {
            let origins: Vec<HeaderValue> = o
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            CorsLayer::new().allow_origin(origins)
        }
        None => CorsLayer::permissive(),
    };

    cors.allow_headers(Any)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_methods(Any)
        .max_age(Duration::from_secs(3600))
}
