use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "facevault=debug,tower_http=debug";

/// Initialize tracing: `RUST_LOG` filter (default `facevault=debug,tower_http=debug`)
/// with a compact console format.
///
/// A subscriber installed earlier in the process (tests build many apps) is kept.
pub fn init_telemetry(environment: &str) -> Result<(), Box<dyn std::error::Error>> {
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(console_fmt)
        .try_init();

    match installed {
        Ok(()) => tracing::info!(environment = %environment, "Tracing initialized"),
        Err(_) => tracing::debug!("Tracing subscriber already installed"),
    }
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
