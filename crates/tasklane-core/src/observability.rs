//! Tracing subscriber bootstrap.

use tracing_subscriber::{EnvFilter, fmt};

/// Used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "tasklane=info";

/// Filter from `RUST_LOG`, falling back to `default_directive`.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install a global fmt subscriber writing to stderr, so stdout stays free
/// for command output. A second call is a no-op.
pub fn init_tracing(default_directive: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(default_directive))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
