//! Logging plumbing.
//!
//! With the `tracing` feature the standard `tracing` macros are re-exported
//! so downstream crates log through one path. The `tracing-json` feature adds
//! [`init_subscriber`], which installs a global subscriber that writes either
//! human-readable or JSON lines to stderr.

/// Environment variable consulted for the log filter before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "REGCOND_LOG";

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Output format for the global subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Install the global subscriber.
///
/// The filter is read from [`LOG_ENV_VAR`], then `RUST_LOG`, and defaults to
/// `info`. Fails if a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_subscriber(
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}
