//! Failure classification and the guarded region used by every boundary call.
//!
//! [`guarded`] runs a closure under `catch_unwind`. Whatever escapes it, an
//! `Err(Failure)` or a panic, is classified by [`classify`] and recorded in
//! the caller's [`ErrorContext`]; the closure's caller only ever sees a
//! [`Status`].

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error};

use crate::context::ErrorContext;
use crate::error::{ErrorInfo, Failure, GENERIC_KIND_NAME, UNKNOWN_MESSAGE};
use crate::status::{ErrorCode, Status};

/// Map a failure to its status code and snapshot.
pub fn classify(failure: Failure) -> (ErrorCode, ErrorInfo) {
    match failure {
        Failure::Domain(err) => {
            let info = ErrorInfo::new(err.kind_name(), err.to_string());
            let detail = err.detail().unwrap_or_else(|| info.message().to_string());
            let info = info.with_detail(detail);
            (ErrorCode::DomainError, info)
        }
        Failure::Runtime(err) => (
            ErrorCode::Unknown,
            ErrorInfo::new(GENERIC_KIND_NAME, format!("{err:#}")),
        ),
        Failure::Panic(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                UNKNOWN_MESSAGE.to_string()
            };
            (ErrorCode::Unknown, ErrorInfo::new(GENERIC_KIND_NAME, message))
        }
        Failure::Coded { code, message } => (code, ErrorInfo::new(code.as_str(), message)),
    }
}

/// Classify `failure` and overwrite `ctx` with the result.
pub fn capture(ctx: &mut ErrorContext, failure: Failure) -> Status {
    let (code, info) = classify(failure);
    if code == ErrorCode::UsageError {
        error!(message = info.message(), "errgate API misuse");
    } else {
        debug!(
            status = %code,
            kind = info.kind_name(),
            message = info.message(),
            "captured failure at boundary"
        );
    }
    ctx.record(code, info)
}

/// Run `f`, converting any failure or panic into a recorded error.
///
/// On success the value is returned and `ctx` is left untouched, including
/// any error recorded by an earlier call.
pub fn guarded<T, F>(ctx: &mut ErrorContext, f: F) -> Result<T, Status>
where
    F: FnOnce() -> Result<T, Failure>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(failure)) => Err(capture(ctx, failure)),
        Err(payload) => Err(capture(ctx, Failure::Panic(payload))),
    }
}

/// Collapse a guarded result into the status returned across the boundary.
pub fn status_of<T>(result: Result<T, Status>) -> Status {
    match result {
        Ok(_) => Status::Ok,
        Err(status) => status,
    }
}
