//! Logging setup for hosts embedding the board.
//!
//! The library itself only emits `tracing` events. Hosts that do not install
//! their own subscriber can call [`init`].

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_DIRECTIVE: &str = "rivboard=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install a formatted stderr subscriber honoring `RUST_LOG`.
///
/// Returns false if a global subscriber was already set; calling twice is
/// harmless.
pub fn init() -> bool {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()
        .is_ok()
}
