//! Diagnostics via `tracing`.
//!
//! The menu owns stdout, so log output goes to stderr and stays quiet
//! unless `RUST_LOG` asks for more.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Reads `RUST_LOG`, defaults to `warn`.
///
/// ```bash
/// RUST_LOG=list_maker=debug cargo run
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
