//! Process-wide, string-keyed settings.
//!
//! Hosts register typed settings once at start-up; foreign callers read and
//! write them by name using their string forms. See [`SettingsRegistry`].

mod registry;
mod value;

use thiserror::Error;

use crate::bounded::AccessError;
use crate::context::ErrorContext;
use crate::error::{DomainError, Failure};
use crate::status::{ErrorCode, Status};
use crate::translate;

pub use registry::{SettingInfo, SettingsRegistry};
pub use value::{Setting, SettingValue, TypedSetting};

/// Errors from settings lookup and assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// No setting with this name is registered.
    #[error("setting '{name}' is not registered")]
    KeyNotFound { name: String },

    /// The value could not be parsed into the setting's type.
    #[error("setting '{name}': invalid value '{value}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    /// Typed read asked for the wrong type.
    #[error("setting '{name}' does not hold a {expected} value")]
    WrongType { name: String, expected: &'static str },

    /// Copying the rendered value out failed.
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl SettingsError {
    pub fn key_not_found(name: impl Into<String>) -> Self {
        Self::KeyNotFound { name: name.into() }
    }

    pub fn invalid_value(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SettingsError::KeyNotFound { .. } => ErrorCode::KeyNotFound,
            SettingsError::InvalidValue { .. } => ErrorCode::DomainError,
            SettingsError::WrongType { .. } => ErrorCode::UsageError,
            SettingsError::Access(e) => e.code(),
        }
    }

    /// Length of the rendered value when it did not fit the caller's buffer.
    pub fn required_len(&self) -> Option<usize> {
        match self {
            SettingsError::Access(e) => e.required_len(),
            _ => None,
        }
    }

    /// Convert for the translator.
    ///
    /// Invalid values are domain errors; everything else keeps its own code.
    pub fn into_failure(self) -> Failure {
        match self.code() {
            ErrorCode::DomainError => Failure::domain(self),
            code => Failure::coded(code, self.to_string()),
        }
    }

    /// Record this error in `ctx`.
    pub fn record_into(self, ctx: &mut ErrorContext) -> Status {
        translate::capture(ctx, self.into_failure())
    }
}

impl DomainError for SettingsError {
    fn kind_name(&self) -> &'static str {
        "SettingsError"
    }
}
