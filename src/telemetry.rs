//! Diagnostic logging.
//!
//! Logs go to stderr so they never mix with command output. The filter is
//! read from `KET_LOG` using `tracing_subscriber` directive syntax; without
//! it only warnings are shown, or debug output for `ket` with `--verbose`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "KET_LOG";

/// Returns the filter used when `KET_LOG` is unset or invalid.
#[must_use]
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "warn,ket=debug" } else { "warn" }
}

/// Builds the log filter from `KET_LOG` or the default for `verbose`.
#[must_use]
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber.
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init_logging(verbose: bool) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if installed.is_err() {
        tracing::debug!("logging already initialised");
    }
}
