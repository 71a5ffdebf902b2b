//! Logging initialization and configuration.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the logging system with tracing.
///
/// Filtering follows `RUST_LOG` when set; otherwise the crate logs at debug
/// level and the GPU stack only reports warnings.
///
/// # Example
/// ```no_run
/// escape_room::init_logging();
/// tracing::info!("scene loaded");
/// ```
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,escape_room=debug,wgpu=warn,naga=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
