//! tracing subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{BoundaryConfig, DEFAULT_LOG_FILTER};

/// Install the global subscriber, writing to stderr.
///
/// Returns `false` if a subscriber was already installed (by the host or an
/// earlier call); that is not an error.
pub fn init(config: &BoundaryConfig) -> bool {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
