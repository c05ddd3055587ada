//! Tracing setup for the CLI.
//!
//! Verbosity is controlled by the `RUST_LOG` environment variable and
//! defaults to warnings only; `RUST_LOG=debug` narrates the individual
//! pipeline passes. Logs go to stderr so stdout stays a clean record
//! stream.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
