//! Subscriber setup. Logs always go to stderr; stdout may carry flattened output.

use tracing_subscriber::EnvFilter;

const FALLBACK_LEVEL: &str = "warn";

/// `RUST_LOG` wins, then `-v` count, then the configured level.
pub fn init(verbose: u8, configured: Option<&str>) {
    let level = match verbose {
        0 => configured.unwrap_or(FALLBACK_LEVEL),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
