//! Observability for the announcement service.
//!
//! Lookups are logged through `tracing`; the visitor's identifier only ever
//! appears as a span field, never in the request path span. Outcomes are
//! counted in [`LOOKUP_REQUESTS_TOTAL`] and scraped from `/metrics`. Dataset
//! and configuration failures are logged at `error!` and therefore reach
//! Sentry when a DSN is configured.
//!
//! # Features
//! - `otlp` (default): OpenTelemetry OTLP exporter
//! - `prometheus` (default): Prometheus metrics exporter
//! - `sentry` (default): Sentry error tracking

#[cfg(feature = "otlp")]
use std::time::Duration;

use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "prometheus")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "otlp")]
use opentelemetry::KeyValue;
#[cfg(feature = "otlp")]
use opentelemetry::trace::TracerProvider as _;
#[cfg(feature = "otlp")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "otlp")]
use opentelemetry_sdk::{
    Resource,
    trace::{Sampler, SdkTracerProvider},
};

/// Reported as `service.name` and used as the tracer name.
const SERVICE_NAME: &str = "announce-service";

/// Counter incremented once per lookup, labelled by outcome.
pub const LOOKUP_REQUESTS_TOTAL: &str = "lookup_requests_total";

/// Logging and error tracking settings, projected from the service config.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub log_level: String,
    /// Use JSON log format
    pub json_logs: bool,
    /// OpenTelemetry OTLP endpoint (optional)
    pub otlp_endpoint: Option<String>,
    /// Sentry DSN (optional)
    pub sentry_dsn: Option<String>,
    /// Environment name (e.g., "production", "development")
    pub environment: Option<String>,
    /// Application version
    pub version: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
            json_logs: true,
            otlp_endpoint: None,
            sentry_dsn: None,
            environment: None,
            version: None,
        }
    }
}

impl TelemetryConfig {
    fn level(&self) -> Level {
        match self.log_level.to_uppercase().as_str() {
            "TRACE" => Level::TRACE,
            "DEBUG" => Level::DEBUG,
            "WARN" => Level::WARN,
            "ERROR" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Keeps the span exporter and the Sentry client alive until shutdown.
pub struct TelemetryGuard {
    #[cfg(feature = "otlp")]
    otel_provider: Option<SdkTracerProvider>,
    #[cfg(feature = "sentry")]
    _sentry_guard: Option<sentry::ClientInitGuard>,
}

impl TelemetryGuard {
    /// Flush pending spans. Sentry flushes when its guard drops.
    pub fn shutdown(self) {
        #[cfg(feature = "otlp")]
        if let Some(provider) = self.otel_provider
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shutdown OpenTelemetry provider: {e}");
        }
    }
}

/// Install the global Prometheus recorder. The handle renders `/metrics`.
///
/// # Panics
/// Panics if a global metrics recorder is already installed.
#[cfg(feature = "prometheus")]
#[must_use]
pub fn init_metrics() -> PrometheusHandle {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Count one lookup with its outcome (`found`, `not_found` or an error kind).
pub fn record_lookup(outcome: &'static str) {
    metrics::counter!(LOOKUP_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
}

/// Span export over OTLP/gRPC. `None` without an endpoint or when the exporter cannot be built.
#[cfg(feature = "otlp")]
fn init_opentelemetry(otlp_endpoint: Option<&str>) -> Option<SdkTracerProvider> {
    let endpoint = otlp_endpoint?;

    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_timeout(Duration::from_secs(5))
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("OTLP exporter disabled: {e}");
            return None;
        }
    };

    let resource = Resource::builder()
        .with_attributes([KeyValue::new("service.name", SERVICE_NAME)])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource)
        .build();

    opentelemetry::global::set_tracer_provider(provider.clone());

    Some(provider)
}

/// `None` without a DSN.
#[cfg(feature = "sentry")]
fn init_sentry(config: &TelemetryConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: config.version.clone().map(Into::into),
            environment: config.environment.clone().map(Into::into),
            attach_stacktrace: true,
            // Visitors submit student numbers; keep them out of reports
            send_default_pii: false,
            ..Default::default()
        },
    ));

    if guard.is_enabled() {
        tracing::info!("Sentry initialized");
        Some(guard)
    } else {
        tracing::warn!("Sentry DSN provided but client not enabled");
        None
    }
}

/// Span bridge backed by the SDK tracer.
#[cfg(feature = "otlp")]
fn otel_layer<S>(
    provider: &SdkTracerProvider,
) -> tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::SdkTracer>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME))
}

/// Build the filter from the configured level plus quieter defaults for noisy crates.
fn env_filter(level: Level) -> EnvFilter {
    [
        "hyper=info",
        "hyper_util=info",
        "reqwest=info",
        "rustls=warn",
        "h2=info",
        "tower=info",
        "sentry=warn",
    ]
    .iter()
    .filter_map(|directive| directive.parse().ok())
    .fold(
        EnvFilter::from_default_env().add_directive(level.into()),
        EnvFilter::add_directive,
    )
}

/// Install the global subscriber: filter, fmt output, then the optional OTLP
/// and Sentry layers. Keep the guard until the server has stopped.
///
/// # Panics
/// Panics if a global tracing subscriber is already installed.
#[must_use]
pub fn setup_telemetry(config: &TelemetryConfig) -> TelemetryGuard {
    let env_filter = env_filter(config.level());

    // Sentry goes first so panics during setup are reported
    #[cfg(feature = "sentry")]
    let sentry_guard = init_sentry(config);

    #[cfg(feature = "otlp")]
    let otel_provider = init_opentelemetry(config.otlp_endpoint.as_deref());

    let fmt_layer = if config.json_logs {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_timer(ChronoLocal::new("%H:%M:%S%.3f".to_string()))
            .compact()
            .boxed()
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    #[cfg(feature = "otlp")]
    let registry = registry.with(otel_provider.as_ref().map(otel_layer));

    #[cfg(feature = "sentry")]
    let registry = registry.with(sentry_tracing::layer());

    registry.init();

    TelemetryGuard {
        #[cfg(feature = "otlp")]
        otel_provider,
        #[cfg(feature = "sentry")]
        _sentry_guard: sentry_guard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_defaults() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, "INFO");
        assert!(config.json_logs);
        assert!(config.otlp_endpoint.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let config = TelemetryConfig {
            log_level: "verbose".to_string(),
            ..TelemetryConfig::default()
        };
        assert_eq!(config.level(), Level::INFO);

        let config = TelemetryConfig {
            log_level: "debug".to_string(),
            ..TelemetryConfig::default()
        };
        assert_eq!(config.level(), Level::DEBUG);
    }

    #[cfg(feature = "otlp")]
    #[test]
    fn otel_layer_attaches_to_registry() {
        let provider = SdkTracerProvider::builder().build();
        let subscriber = tracing_subscriber::registry().with(otel_layer(&provider));
        tracing::subscriber::with_default(subscriber, || {
            let _span = tracing::info_span!("lookup", nim = "2201").entered();
            tracing::info!("inside span");
        });
    }

    #[test]
    fn recording_without_recorder_is_a_no_op() {
        record_lookup("found");
    }
}
