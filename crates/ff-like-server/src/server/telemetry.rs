//! # Telemetry Features
//!
//! Console logging through `tracing_subscriber::fmt` is always on and filtered
//! with `RUST_LOG` (default `info`). On top of that the binary can export to
//! OpenTelemetry, controlled by Cargo features.
//!
//! ## Feature matrix
//!
//! - `traces`: Exports spans (one per `/like` request, with the fan-out as a
//!   child span) via OpenTelemetry.
//! - `metrics`: Exports counters and histograms via OpenTelemetry.
//! - `honeycomb`: Enables the Honeycomb OTLP exporter.
//! - `stdout`: Enables the stdout OTLP exporter.
//!
//! ## Feature constraints
//!
//! - Exporters require using at least one of: `traces` or `metrics`.
//! - Both `honeycomb` and `stdout` exporters can be enabled at the same time.
//!
//! ## Metrics
//!
//! - `like_requests`: `/like` calls that passed validation
//! - `dispatched_likes`: upstream like requests launched
//! - `upstream_failures`: upstream requests that returned nothing usable (non-200,
//!   transport error or unreadable body)
//! - `dispatch_duration` (ms): wall-clock time of one fan-out
//! - `likes_delta`: observed like-count change per request
//!
//! ## Example usage
//!
//! ```bash
//! cargo run --features traces,metrics,honeycomb
//! cargo run --features traces,stdout
//! ```

// Disallow using `honeycomb` without `traces` or `metrics`
#[cfg(all(
    feature = "honeycomb",
    not(any(feature = "traces", feature = "metrics"))
))]
compile_error!(
    "The 'honeycomb' feature requires at least one of 'traces' or 'metrics' to be enabled."
);

// Disallow using `stdout` without `traces` or `metrics`
#[cfg(all(feature = "stdout", not(any(feature = "traces", feature = "metrics"))))]
compile_error!(
    "The 'stdout' feature requires at least one of 'traces' or 'metrics' to be enabled."
);

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// Honeycomb-specific imports
#[cfg(all(feature = "honeycomb", any(feature = "metrics", feature = "traces")))]
use opentelemetry_otlp::{Compression, Protocol, WithExportConfig, WithTonicConfig};
#[cfg(all(feature = "honeycomb", feature = "metrics"))]
use opentelemetry_sdk::metrics::Temporality;
#[cfg(feature = "honeycomb")]
use tonic::{metadata::MetadataMap, transport::ClientTlsConfig};

// Metrics-specific imports
#[cfg(feature = "metrics")]
use opentelemetry::metrics::{Counter, Histogram, Meter};
#[cfg(feature = "metrics")]
use opentelemetry_sdk::metrics as sdkmetrics;
#[cfg(feature = "metrics")]
use std::sync::OnceLock;

// Either
#[cfg(any(feature = "metrics", feature = "traces"))]
use opentelemetry::{InstrumentationScope, KeyValue};
#[cfg(any(feature = "metrics", feature = "traces"))]
use opentelemetry_sdk::Resource;
#[cfg(any(feature = "metrics", feature = "traces"))]
use opentelemetry_semantic_conventions as semvcns;

// Tracing-specific imports
#[cfg(feature = "traces")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "traces")]
use opentelemetry_sdk::propagation::TraceContextPropagator;
#[cfg(feature = "traces")]
use opentelemetry_sdk::trace as sdktrace;

pub struct TelemetryProviders {
    #[cfg(feature = "traces")]
    pub tracer_provider: sdktrace::SdkTracerProvider,
    #[cfg(feature = "metrics")]
    pub meter_provider: sdkmetrics::SdkMeterProvider,
}

impl TelemetryProviders {
    /// Flushes and shuts down every enabled exporter. Called once on shutdown.
    pub fn shutdown(self) {
        #[cfg(feature = "traces")]
        {
            if let Err(err) = self.tracer_provider.force_flush() {
                eprintln!("Error flushing traces: {:#?}", err);
            }
            if let Err(err) = self.tracer_provider.shutdown() {
                eprintln!("Error shutting down tracer: {:#?}", err);
            }
        }

        #[cfg(feature = "metrics")]
        {
            if let Err(err) = self.meter_provider.force_flush() {
                eprintln!("Error flushing metrics: {:#?}", err);
            }
            if let Err(err) = self.meter_provider.shutdown() {
                eprintln!("Error shutting down meter: {:#?}", err);
            }
        }
    }
}

pub fn init_telemetry() -> anyhow::Result<TelemetryProviders> {
    #[cfg(feature = "traces")]
    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    #[cfg(feature = "traces")]
    let tracer_provider = init_tracer()?;

    #[cfg(feature = "metrics")]
    let meter_provider = init_metrics()?;

    #[cfg(any(feature = "metrics", feature = "traces"))]
    let scope = InstrumentationScope::builder("ff-like")
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_schema_url(semvcns::SCHEMA_URL)
        .build();

    // Console output is independent of the `opentelemetry_stdout` exporter.
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true)
                .pretty(),
        );

    #[cfg(feature = "traces")]
    let registry = {
        opentelemetry::global::set_tracer_provider(tracer_provider.clone());
        registry.with(
            tracing_opentelemetry::layer()
                .with_tracer(tracer_provider.tracer_with_scope(scope.clone()))
                .with_error_records_to_exceptions(true),
        )
    };

    #[cfg(feature = "metrics")]
    let registry = {
        opentelemetry::global::set_meter_provider(meter_provider.clone());
        let meter = opentelemetry::global::meter_with_scope(scope);
        init_metric_handles(meter);

        registry.with(tracing_opentelemetry::MetricsLayer::new(
            meter_provider.clone(),
        ))
    };

    registry.init();

    Ok(TelemetryProviders {
        #[cfg(feature = "traces")]
        tracer_provider,
        #[cfg(feature = "metrics")]
        meter_provider,
    })
}

/// OTLP/gRPC export settings read from the `HONEYCOMB_*` variables.
#[cfg(feature = "honeycomb")]
struct HoneycombConfig {
    endpoint: String,
    compression: Compression,
    metadata: MetadataMap,
}

#[cfg(feature = "honeycomb")]
const EXPORT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[cfg(feature = "honeycomb")]
impl HoneycombConfig {
    fn from_env() -> anyhow::Result<Self> {
        use anyhow::Context;
        use std::str::FromStr;

        let var = |name: &str| std::env::var(name).with_context(|| format!("missing `{name}`"));

        let mut metadata = MetadataMap::new();
        metadata.insert(
            "x-honeycomb-team",
            var("HONEYCOMB_API_KEY")?.parse().context("invalid API key")?,
        );
        metadata.insert(
            "x-honeycomb-dataset",
            var("HONEYCOMB_DATASET")?.parse().context("invalid dataset")?,
        );
        let compression =
            Compression::from_str(&var("HONEYCOMB_COMPRESSION")?.to_ascii_lowercase())?;

        Ok(Self {
            endpoint: var("HONEYCOMB_ENDPOINT")?,
            compression,
            metadata,
        })
    }
}

#[cfg(any(feature = "metrics", feature = "traces"))]
fn resource() -> Resource {
    Resource::builder()
        .with_service_name("ff-like")
        .with_schema_url(
            [KeyValue::new(
                semvcns::resource::SERVICE_VERSION,
                env!("CARGO_PKG_VERSION"),
            )],
            semvcns::SCHEMA_URL,
        )
        .build()
}

#[cfg(feature = "metrics")]
fn init_metrics() -> anyhow::Result<sdkmetrics::SdkMeterProvider> {
    let builder = sdkmetrics::SdkMeterProvider::builder().with_resource(resource());

    #[cfg(feature = "stdout")]
    let builder = builder.with_reader(
        sdkmetrics::PeriodicReader::builder(opentelemetry_stdout::MetricExporter::default())
            .with_interval(std::time::Duration::from_secs(5))
            .build(),
    );

    #[cfg(feature = "honeycomb")]
    let builder = {
        use anyhow::Context;

        let config = HoneycombConfig::from_env()?;
        let exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_tonic()
            .with_tls_config(ClientTlsConfig::new().with_native_roots())
            .with_metadata(config.metadata)
            .with_timeout(EXPORT_TIMEOUT)
            .with_compression(config.compression)
            .with_endpoint(config.endpoint)
            .with_protocol(Protocol::Grpc)
            .with_temporality(Temporality::Delta)
            .build()
            .context("failed to build metrics exporter")?;

        builder.with_periodic_exporter(exporter)
    };

    Ok(builder.build())
}

#[cfg(feature = "traces")]
fn init_tracer() -> anyhow::Result<sdktrace::SdkTracerProvider> {
    let builder = sdktrace::SdkTracerProvider::builder().with_resource(resource());

    #[cfg(feature = "stdout")]
    let builder =
        builder.with_span_processor(batch_processor(opentelemetry_stdout::SpanExporter::default()));

    #[cfg(feature = "honeycomb")]
    let builder = {
        use anyhow::Context;

        let config = HoneycombConfig::from_env()?;
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_tls_config(ClientTlsConfig::new().with_native_roots())
            .with_metadata(config.metadata)
            .with_timeout(EXPORT_TIMEOUT)
            .with_compression(config.compression)
            .with_endpoint(config.endpoint)
            .with_protocol(Protocol::Grpc)
            .build()
            .context("failed to build tracer exporter")?;

        builder.with_span_processor(batch_processor(exporter))
    };

    Ok(builder.build())
}

/// Batches spans for up to five seconds before export.
#[cfg(all(feature = "traces", any(feature = "stdout", feature = "honeycomb")))]
fn batch_processor<E>(exporter: E) -> sdktrace::BatchSpanProcessor
where
    E: sdktrace::SpanExporter + 'static,
{
    sdktrace::BatchSpanProcessor::builder(exporter)
        .with_batch_config(
            sdktrace::BatchConfigBuilder::default()
                .with_scheduled_delay(std::time::Duration::from_secs(5))
                .with_max_queue_size(2048)
                .build(),
        )
        .build()
}

// Metric handles - only compiled when metrics feature is enabled
#[cfg(feature = "metrics")]
static LIKE_REQUESTS: OnceLock<Counter<u64>> = OnceLock::new();
#[cfg(feature = "metrics")]
static DISPATCHED_LIKES: OnceLock<Counter<u64>> = OnceLock::new();
#[cfg(feature = "metrics")]
static UPSTREAM_FAILURES: OnceLock<Counter<u64>> = OnceLock::new();
#[cfg(feature = "metrics")]
static DISPATCH_DURATION_MS: OnceLock<Histogram<f64>> = OnceLock::new();
#[cfg(feature = "metrics")]
static LIKES_DELTA: OnceLock<Histogram<f64>> = OnceLock::new();

#[cfg(feature = "metrics")]
fn init_metric_handles(meter: Meter) {
    let _ = LIKE_REQUESTS.set(
        meter
            .u64_counter("like_requests")
            .with_description("Like requests that passed validation")
            .build(),
    );

    let _ = DISPATCHED_LIKES.set(
        meter
            .u64_counter("dispatched_likes")
            .with_description("Upstream like requests launched")
            .build(),
    );

    let _ = UPSTREAM_FAILURES.set(
        meter
            .u64_counter("upstream_failures")
            .with_description("Upstream requests without a usable response")
            .build(),
    );

    let _ = DISPATCH_DURATION_MS.set(
        meter
            .f64_histogram("dispatch_duration")
            .with_unit("ms")
            .with_description("Wall-clock duration of one fan-out")
            .build(),
    );

    let _ = LIKES_DELTA.set(
        meter
            .f64_histogram("likes_delta")
            .with_description("Observed like-count change per request")
            .build(),
    );
}

// Convenience functions that compile to no-ops when metrics are disabled
#[cfg(feature = "metrics")]
pub fn increment_like_requests() {
    if let Some(counter) = LIKE_REQUESTS.get() {
        counter.add(1, &[]);
    }
}

#[cfg(not(feature = "metrics"))]
pub fn increment_like_requests() {}

#[cfg(feature = "metrics")]
pub fn increment_dispatched_likes(count: u64) {
    if let Some(counter) = DISPATCHED_LIKES.get() {
        counter.add(count, &[]);
    }
}

#[cfg(not(feature = "metrics"))]
pub fn increment_dispatched_likes(_count: u64) {}

#[cfg(feature = "metrics")]
pub fn increment_upstream_failures() {
    if let Some(counter) = UPSTREAM_FAILURES.get() {
        counter.add(1, &[]);
    }
}

#[cfg(not(feature = "metrics"))]
pub fn increment_upstream_failures() {}

#[cfg(feature = "metrics")]
pub fn record_dispatch_duration(duration_ms: f64) {
    if let Some(histogram) = DISPATCH_DURATION_MS.get() {
        histogram.record(duration_ms, &[]);
    }
}

#[cfg(not(feature = "metrics"))]
pub fn record_dispatch_duration(_duration_ms: f64) {}

#[cfg(feature = "metrics")]
pub fn record_likes_delta(delta: f64) {
    if let Some(histogram) = LIKES_DELTA.get() {
        histogram.record(delta, &[]);
    }
}

#[cfg(not(feature = "metrics"))]
pub fn record_likes_delta(_delta: f64) {}
