//! Log output setup.

use crate::config::LogLevel;
use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber printing at `level`.
///
/// `RUST_LOG` takes precedence when set. Returns false if a subscriber was
/// already installed, in which case nothing changes.
pub fn init(level: LogLevel) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
