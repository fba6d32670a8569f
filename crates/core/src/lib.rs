//! errgate core library
//!
//! The safe Rust half of the errgate boundary. Failures raised by the library
//! (typed [`DomainError`]s, generic `anyhow` errors, and panics) are caught in
//! a [`guarded`](translate::guarded) region, classified, and recorded in a
//! caller-owned [`ErrorContext`]. Callers read the status code, kind name,
//! message, and detail back through the bounded-buffer convention in
//! [`bounded`]. A process-wide [`SettingsRegistry`] exposes typed
//! configuration values by name.
//!
//! The `errgate-capi` crate wraps all of this in `extern "C"` functions.

pub mod bounded;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod settings;
pub mod status;
pub mod translate;

use parking_lot::Mutex;
use tracing::info;

pub use bounded::{AccessError, write_bounded};
pub use config::BoundaryConfig;
pub use context::ErrorContext;
pub use error::{DomainError, ErrorInfo, Failure, GENERIC_KIND_NAME, UNKNOWN_MESSAGE};
pub use settings::{SettingInfo, SettingValue, SettingsError, SettingsRegistry, TypedSetting};
pub use status::{ErrorCode, Status};
pub use translate::{capture, guarded};

/// Library version, as reported across the boundary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static INITIALIZED: Mutex<bool> = parking_lot::const_mutex(false);

/// One-time process initialisation.
///
/// Loads [`BoundaryConfig`] from the environment, installs the tracing
/// subscriber, and applies configured overrides to the global registry.
/// Settings must be registered before this runs to receive overrides.
///
/// Initialisation counts as done once logging is installed. If an override
/// is then rejected, the error is returned and the overrides before it stay
/// applied; later calls do not retry. A configuration that fails to load
/// changes nothing, so that call may be repeated.
pub fn init() -> anyhow::Result<()> {
    run_init(&INITIALIZED, BoundaryConfig::from_env, SettingsRegistry::global())
}

fn run_init(
    initialized: &Mutex<bool>,
    load: impl FnOnce() -> anyhow::Result<BoundaryConfig>,
    registry: &SettingsRegistry,
) -> anyhow::Result<()> {
    let mut initialized = initialized.lock();
    if *initialized {
        return Ok(());
    }

    let config = load()?;
    logging::init(&config);
    *initialized = true;

    let applied = config.apply_to(registry)?;
    info!(version = VERSION, overrides = applied, "errgate initialized");
    Ok(())
}
