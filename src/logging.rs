//! Diagnostic logging for the command-line tool.
//!
//! Logs go to stderr so that URLs on stdout stay pipeable. `RUST_LOG` wins
//! when set; otherwise `--verbose` selects debug output for this crate.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,seo_paths=info";
const VERBOSE_FILTER: &str = "warn,seo_paths=debug";

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(verbose, "logging initialized");
    }
}
