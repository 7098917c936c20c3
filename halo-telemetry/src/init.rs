//! Subscriber installation.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

pub type TelemetryError = Box<dyn std::error::Error + Send + Sync>;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install console logging once per process.
///
/// `RUST_LOG` controls the filter, defaulting to `info`. Later calls are no-ops.
pub fn init_telemetry(service_name: &str) -> Result<(), TelemetryError> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = tracing_subscriber::registry()
            .with(env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .try_init()
            .map_err(TelemetryError::from);

        tracing::info!(service.name = service_name, "Telemetry initialized");
    });
    result
}

/// Install console logging plus an OTLP span exporter.
///
/// Must be called from within a tokio runtime; the batch exporter spawns onto it.
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() {
/// halo_telemetry::init_with_otlp("halo", "http://localhost:4317").unwrap();
/// # }
/// ```
pub fn init_with_otlp(service_name: &str, endpoint: &str) -> Result<(), TelemetryError> {
    use opentelemetry_otlp::WithExportConfig;
    use tracing_opentelemetry::OpenTelemetryLayer;

    let mut result = Ok(());
    INIT.call_once(|| {
        let tracer = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(opentelemetry_otlp::new_exporter().tonic().with_endpoint(endpoint))
            .with_trace_config(opentelemetry_sdk::trace::config().with_resource(
                opentelemetry_sdk::Resource::new(vec![opentelemetry::KeyValue::new(
                    "service.name",
                    service_name.to_string(),
                )]),
            ))
            .install_batch(opentelemetry_sdk::runtime::Tokio);

        let tracer = match tracer {
            Ok(tracer) => tracer,
            Err(e) => {
                result = Err(TelemetryError::from(e));
                return;
            }
        };

        result = tracing_subscriber::registry()
            .with(env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .with(OpenTelemetryLayer::new(tracer))
            .try_init()
            .map_err(TelemetryError::from);

        tracing::info!(
            service.name = service_name,
            otlp.endpoint = endpoint,
            "Telemetry initialized with OpenTelemetry"
        );
    });
    result
}

/// Flush pending spans. Call before process exit.
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_telemetry("halo-test").unwrap();
        init_telemetry("halo-test").unwrap();
        tracing::info!(check = true, "logged after init");
    }
}
