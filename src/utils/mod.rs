//! Utility functions shared across the fusion pipeline.
//!
//! Currently this is limited to logging setup; the fusion stages
//! themselves live under [`crate::fusion`].

use tracing_subscriber::EnvFilter;

/// Initializes a global tracing subscriber for applications embedding the
/// fusion engine.
///
/// The filter is read from the `RUST_LOG` environment variable and
/// defaults to `info`. Calling this more than once is harmless; later
/// calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
