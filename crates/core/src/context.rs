//! Caller-owned error context.
//!
//! An [`ErrorContext`] holds the outcome of the most recent failing boundary
//! call. It is written by the translator (or by [`ErrorContext::set_error`])
//! and read back through the bounded accessors. A successful call leaves a
//! previously recorded error in place; only a new failure or an explicit
//! [`ErrorContext::clear`] replaces it.
//!
//! Contexts carry no lock. Each thread or call sequence owns its own.

use crate::bounded::{self, AccessError};
use crate::error::ErrorInfo;
use crate::status::{ErrorCode, Status};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Outcome {
    #[default]
    Ok,
    Failed { code: ErrorCode, info: ErrorInfo },
}

/// Last-error holder for one call sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    outcome: Outcome,
}

impl ErrorContext {
    /// Create a context with status OK.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status. [`Status::Ok`] when nothing has been recorded.
    pub fn status(&self) -> Status {
        match &self.outcome {
            Outcome::Ok => Status::Ok,
            Outcome::Failed { code, .. } => code.status(),
        }
    }

    /// The recorded error, if any.
    pub fn last_error(&self) -> Option<&ErrorInfo> {
        match &self.outcome {
            Outcome::Ok => None,
            Outcome::Failed { info, .. } => Some(info),
        }
    }

    /// Record an error directly, bypassing classification.
    ///
    /// The kind name is derived from the code. Returns the status that was
    /// recorded so callers can `return ctx.set_error(..)`.
    pub fn set_error(&mut self, code: ErrorCode, message: impl Into<String>) -> Status {
        let info = ErrorInfo::new(code.as_str(), message);
        self.record(code, info)
    }

    /// Record an already classified failure.
    pub fn record(&mut self, code: ErrorCode, info: ErrorInfo) -> Status {
        self.outcome = Outcome::Failed { code, info };
        code.status()
    }

    /// Reset to OK.
    pub fn clear(&mut self) {
        self.outcome = Outcome::Ok;
    }

    /// Copy the error message into `dest`. See [`bounded::write_bounded`].
    pub fn message_into(&self, dest: Option<&mut [u8]>) -> Result<usize, AccessError> {
        bounded::write_bounded(
            self.last_error().map(ErrorInfo::message),
            "error message",
            dest,
        )
    }

    /// Copy the long-form detail into `dest`.
    pub fn detail_into(&self, dest: Option<&mut [u8]>) -> Result<usize, AccessError> {
        bounded::write_bounded(
            self.last_error().and_then(ErrorInfo::detail),
            "error detail",
            dest,
        )
    }

    /// Copy the kind name into `dest`.
    pub fn kind_name_into(&self, dest: Option<&mut [u8]>) -> Result<usize, AccessError> {
        bounded::write_bounded(
            self.last_error().map(ErrorInfo::kind_name),
            "error kind name",
            dest,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_is_ok() {
        let ctx = ErrorContext::new();
        assert_eq!(ctx.status(), Status::Ok);
        assert!(ctx.last_error().is_none());
    }

    #[test]
    fn fresh_context_accessors_are_usage_errors() {
        let ctx = ErrorContext::new();
        let mut buf = [0u8; 64];

        for result in [
            ctx.message_into(Some(&mut buf)),
            ctx.detail_into(Some(&mut buf)),
            ctx.kind_name_into(Some(&mut buf)),
            ctx.message_into(None),
        ] {
            let err = result.unwrap_err();
            assert_eq!(err.code(), ErrorCode::UsageError);
        }
    }

    #[test]
    fn set_error_records_code_and_message() {
        let mut ctx = ErrorContext::new();
        let status = ctx.set_error(ErrorCode::Unknown, "unknown test error");

        assert_eq!(status, Status::Unknown);
        assert_eq!(ctx.status(), Status::Unknown);

        let info = ctx.last_error().unwrap();
        assert_eq!(info.message(), "unknown test error");
        assert_eq!(info.kind_name(), "Unknown");
    }

    #[test]
    fn message_round_trips_through_buffer() {
        let mut ctx = ErrorContext::new();
        ctx.set_error(ErrorCode::Unknown, "unknown test error");

        let mut buf = [0xffu8; 64];
        let n = ctx.message_into(Some(&mut buf)).unwrap();
        assert_eq!(&buf[..n], b"unknown test error");
        assert_eq!(buf[n], 0);
    }

    #[test]
    fn detail_absent_is_usage_error_even_with_error_set() {
        let mut ctx = ErrorContext::new();
        ctx.set_error(ErrorCode::Unknown, "boom");

        let err = ctx.detail_into(None).unwrap_err();
        assert_eq!(err, AccessError::Unavailable { what: "error detail" });
    }

    #[test]
    fn new_error_overwrites_previous() {
        let mut ctx = ErrorContext::new();
        ctx.set_error(ErrorCode::Unknown, "first");
        ctx.set_error(ErrorCode::KeyNotFound, "second");

        assert_eq!(ctx.status(), Status::KeyNotFound);
        assert_eq!(ctx.last_error().unwrap().message(), "second");
    }

    #[test]
    fn clear_resets_to_ok() {
        let mut ctx = ErrorContext::new();
        ctx.set_error(ErrorCode::Overflow, "too small");
        ctx.clear();

        assert_eq!(ctx.status(), Status::Ok);
        assert!(ctx.last_error().is_none());
    }
}
