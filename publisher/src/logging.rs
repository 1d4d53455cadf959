//! Diagnostic log initialisation.
//!
//! The library logs through the `log` facade. The binary installs a
//! `tracing-subscriber` formatter on stderr, which also receives `log`
//! records. `RUST_LOG` takes precedence over the level chosen on the
//! command line.

use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber with `default_directive` as the
/// fallback filter.
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init_logging(default_directive: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if installed.is_err() {
        log::debug!("log subscriber already installed");
    }
}
