//! errgate test utilities.
//!
//! Fixtures shared by the integration tests: a sample domain error type,
//! pre-populated registries, and helpers for C strings and output buffers.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::ffi::CString;
use std::sync::atomic::{AtomicUsize, Ordering};

use errgate_core::{DomainError, SettingsRegistry};

/// Default value of the `setting-name` fixture.
pub const DEFAULT_VALUE: &str = "empty";

/// A member of the "library's own" error hierarchy, for exercising the
/// domain-error path of the translator.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TestingError {
    message: String,
    trace: Option<String>,
}

impl TestingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: None,
        }
    }

    /// Attach a long-form message, reported as the error detail.
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }
}

impl DomainError for TestingError {
    fn detail(&self) -> Option<String> {
        self.trace.clone()
    }
}

/// Kind name the translator records for [`TestingError`].
pub fn testing_error_kind() -> &'static str {
    std::any::type_name::<TestingError>()
}

/// A fresh registry holding the standard fixtures:
///
/// - `setting-name`: string, default [`DEFAULT_VALUE`]
/// - `max-jobs`: `u32`, default 1
/// - `sandbox`: `bool`, default true
/// - `substituters`: string list, default empty
pub fn sample_registry() -> SettingsRegistry {
    let registry = SettingsRegistry::new();
    registry.register_typed("setting-name", DEFAULT_VALUE.to_string(), "Description");
    registry.register_typed("max-jobs", 1_u32, "Maximum number of parallel jobs");
    registry.register_typed("sandbox", true, "Whether to sandbox builds");
    registry.register_typed("substituters", Vec::<String>::new(), "Binary caches to query");
    registry
}

/// A setting name no other test uses.
///
/// The global registry is shared by every test in a binary; giving each test
/// its own names keeps them independent under parallel execution.
pub fn unique_name(prefix: &str) -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{}-{n}", std::process::id())
}

/// Register a string setting in the global registry under a fresh name and
/// return that name.
pub fn register_global_string(prefix: &str, default: &str) -> String {
    let name = unique_name(prefix);
    SettingsRegistry::global().register_typed(name.as_str(), default.to_string(), "test setting");
    name
}

/// Register a `u32` setting in the global registry under a fresh name.
pub fn register_global_u32(prefix: &str, default: u32) -> String {
    let name = unique_name(prefix);
    SettingsRegistry::global().register_typed(name.as_str(), default, "test setting");
    name
}

/// NUL-terminated copy of `s`. Panics on interior NULs.
pub fn cstring(s: &str) -> CString {
    CString::new(s).expect("test string contains NUL")
}

/// Read a NUL-terminated string out of `buf`.
pub fn read_c_buffer(buf: &[u8]) -> String {
    let end = buf
        .iter()
        .position(|&b| b == 0)
        .expect("buffer is not NUL-terminated");
    String::from_utf8(buf[..end].to_vec()).expect("buffer is not UTF-8")
}
