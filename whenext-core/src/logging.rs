//! Tracing setup shared by the server and the CLI.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter, e.g. `WHENEXT_LOG=whenext_core=debug`.
pub const LOG_ENV: &str = "WHENEXT_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber. Falls back to `default_directive` when
/// `WHENEXT_LOG` is unset or invalid. Later calls do nothing.
pub fn init_tracing(default_directive: &str) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
