//! Log output for the binary.

use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dynamo_manager={}", level.as_str())));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
