//! Context lifecycle and direct status access.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

use errgate_core::{ErrorContext, Failure, Status, UNKNOWN_MESSAGE};
use tracing::error;

use crate::{boundary, errgate_context, errgate_status};

/// Allocate a context with status OK.
///
/// The caller owns the returned handle and must release it with
/// [`errgate_context_free`].
#[unsafe(no_mangle)]
pub extern "C" fn errgate_context_create() -> *mut errgate_context {
    errgate_context::from_internal(Box::new(ErrorContext::new()))
}

/// Release a context. NULL is ignored.
///
/// # Safety
/// `ctx` must be NULL or a handle from [`errgate_context_create`] that has
/// not already been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn errgate_context_free(ctx: *mut errgate_context) {
    if !ctx.is_null() {
        drop(unsafe { errgate_context::into_internal(ctx) });
    }
}

/// Status of the most recent recorded error, or `ERRGATE_OK`.
///
/// A NULL context is a usage error.
///
/// # Safety
/// `ctx` must be NULL or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn errgate_err_code(ctx: *const errgate_context) -> errgate_status {
    match unsafe { errgate_context::as_internal(ctx) } {
        Some(ctx) => ctx.status(),
        None => {
            error!("errgate_err_code called with a NULL context");
            Status::UsageError
        }
    }
}

/// Record an error directly, bypassing classification.
///
/// `code` must be one of the negative status values; `ERRGATE_OK` or an
/// unrecognised value records a usage error instead. A NULL message records
/// `"unknown error"`; invalid UTF-8 is replaced lossily. Returns the status
/// that was recorded.
///
/// # Safety
/// `ctx` must be NULL or a live handle. `msg` must be NULL or a valid
/// NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn errgate_set_err_msg(
    ctx: *mut errgate_context,
    code: c_int,
    msg: *const c_char,
) -> errgate_status {
    let message = if msg.is_null() {
        UNKNOWN_MESSAGE.to_string()
    } else {
        unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
    };

    unsafe {
        boundary(ctx, || {
            let code = Status::from_i32(code)
                .and_then(Status::error_code)
                .ok_or_else(|| {
                    Failure::usage(format!("cannot record an error with status {code}"))
                })?;
            Err(Failure::coded(code, message))
        })
    }
}

/// Reset a context to OK. NULL is ignored.
///
/// # Safety
/// `ctx` must be NULL or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn errgate_context_clear(ctx: *mut errgate_context) {
    if let Some(ctx) = unsafe { errgate_context::as_internal_mut(ctx) } {
        ctx.clear();
    }
}
