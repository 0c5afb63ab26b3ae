//! Logging utilities for the classifieds backend.
//!
//! Every crate logs through `tracing`; the binary calls [`init`] once at
//! startup to install the subscriber.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO level.
///
/// # Examples
///
/// ```
/// use classifieds_common::logging;
///
/// logging::init();
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// When `RUST_LOG` is set it decides the filter on its own; otherwise the
/// filter is `classifieds=<level>`. Calling this more than once is harmless;
/// later calls are ignored.
pub fn init_with_level(level: Level) {
    let filter = filter_for(level);

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

fn filter_for(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("classifieds={}", level)))
}
