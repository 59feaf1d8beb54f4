//! Tracing subscriber setup.

use stratus_core::config::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

/// ## Summary
/// Installs a global `fmt` subscriber filtered at `config.level`.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case nothing changes.
#[must_use]
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .is_ok();

    if !installed {
        return false;
    }

    if let Ok(filter) = EnvFilter::try_new(config.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.level, "Invalid log level in config, keeping info");
    }

    true
}
