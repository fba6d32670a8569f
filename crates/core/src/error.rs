//! Failure types that flow into the boundary and the snapshot stored for callers.
//!
//! Anything raised inside a guarded region is a [`Failure`]:
//!
//! - **Domain** errors come from the library's own hierarchy (any type
//!   implementing [`DomainError`]). They keep their concrete kind name and an
//!   optional long-form detail.
//! - **Runtime** errors are generic `anyhow::Error`s.
//! - **Panics** are caught at the boundary and carried as their payload.
//! - **Coded** failures are problems the boundary detects itself (an unknown
//!   key, a short buffer). They are recorded as-is, without classification.
//!
//! Classification happens once, in [`crate::translate`], producing an
//! [`ErrorInfo`] that foreign callers can read back.

use std::any::Any;
use std::fmt;

use crate::status::ErrorCode;

/// Kind name used for failures that are not part of the domain hierarchy.
pub const GENERIC_KIND_NAME: &str = "RuntimeError";

/// Message recorded when a failure carries nothing readable.
pub const UNKNOWN_MESSAGE: &str = "unknown error";

/// Marker for the library's own error hierarchy.
///
/// Implementors are reported with [`crate::Status::DomainError`]. The kind
/// name defaults to the concrete Rust type name; override it to expose a
/// stable label.
pub trait DomainError: std::error::Error + Send + Sync + 'static {
    /// Label identifying the concrete error type.
    fn kind_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Extended message, distinct from the short `Display` output.
    fn detail(&self) -> Option<String> {
        None
    }
}

/// A failure propagating out of a guarded region.
pub enum Failure {
    Domain(Box<dyn DomainError>),
    Runtime(anyhow::Error),
    Panic(Box<dyn Any + Send + 'static>),
    Coded { code: ErrorCode, message: String },
}

impl Failure {
    /// Wrap a domain error.
    pub fn domain(err: impl DomainError) -> Self {
        Self::Domain(Box::new(err))
    }

    /// Generic runtime failure with the given description.
    pub fn runtime(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Runtime(anyhow::Error::msg(message))
    }

    /// A problem detected by the boundary itself.
    pub fn coded(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Coded {
            code,
            message: message.into(),
        }
    }

    /// Caller violated a precondition.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::coded(ErrorCode::UsageError, message)
    }
}

impl<E: DomainError> From<E> for Failure {
    fn from(err: E) -> Self {
        Self::Domain(Box::new(err))
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime(err)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Domain(e) => f
                .debug_struct("Domain")
                .field("kind", &e.kind_name())
                .field("message", &e.to_string())
                .finish(),
            Failure::Runtime(e) => f.debug_tuple("Runtime").field(e).finish(),
            Failure::Panic(_) => f.write_str("Panic(..)"),
            Failure::Coded { code, message } => f
                .debug_struct("Coded")
                .field("code", code)
                .field("message", message)
                .finish(),
        }
    }
}

/// Immutable snapshot of one failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    kind_name: String,
    message: String,
    detail: Option<String>,
}

impl ErrorInfo {
    /// Create a snapshot. An empty message is replaced with [`UNKNOWN_MESSAGE`].
    pub fn new(kind_name: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            UNKNOWN_MESSAGE.to_string()
        } else {
            message
        };

        Self {
            kind_name: kind_name.into(),
            message,
            detail: None,
        }
    }

    /// Attach the long-form message.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn kind_name(&self) -> &str {
        &self.kind_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind_name, self.message)
    }
}
