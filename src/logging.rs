//! Logging setup on top of `tracing-subscriber`.
//!
//! Events go to stderr so command output on stdout stays machine-readable.
//! The filter comes from `QUERY_ASSISTANT_LOG` (standard `EnvFilter`
//! directives), defaulting to `warn`, or `debug` for this crate with
//! `--verbose`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "QUERY_ASSISTANT_LOG";

/// Filter directives used when the environment does not set any
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "warn,query_assistant=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
