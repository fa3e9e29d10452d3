use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Output format for diagnostic logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Initialize structured logging.
///
/// Logs go to stderr so stdout only carries the provisioning progress. `RUST_LOG`
/// directives are honoured on top of the default level (`warn`, or `debug` when verbose).
pub fn init_telemetry(verbose: bool, format: LogFormat) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    tracing::debug!("Telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking the log events of one run
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping a full provisioning run
pub fn create_run_span(base_url: &str, dry_run: bool, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "provision_run",
        n8n.base_url = base_url,
        dry_run = dry_run,
        correlation.id = correlation_id,
    )
}
