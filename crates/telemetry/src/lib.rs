//! Tracing subscriber bootstrap shared by the server and CLI binaries.

use shelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=info";

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured filter. Calling this more than once
/// is harmless: later calls leave the first subscriber in place.
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured_filter(settings)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match settings.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(
            target: "shelf-telemetry",
            format = ?settings.log_format,
            "tracing subscriber installed"
        );
    }
}

fn configured_filter(settings: &TelemetrySettings) -> &str {
    settings.filter.as_deref().unwrap_or(DEFAULT_FILTER)
}
