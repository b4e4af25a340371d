//! Diagnostic logging for harness runs.
//!
//! Stage transitions, per-fixture progress and collaborator trouble
//! (nonzero exits, truncation, timeouts) go to stderr through `tracing`.
//! The report itself is printed on stdout and never passes through here, so
//! raising the log level cannot change what a diff of two reports shows.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the stderr subscriber, filtered by `RUST_LOG`.
///
/// `RUST_LOG=reconstruct_harness=debug` shows every fixture as it runs.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
