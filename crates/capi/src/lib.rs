//! C API for errgate
//!
//! Stable `extern "C"` entry points over `errgate-core`. Every function
//! returns an [`errgate_status`] (or a plain value for pure reads), never
//! unwinds into the caller, and records failures in a caller-owned
//! [`errgate_context`].
//!
//! String results use the bounded-buffer convention: pass `buf`/`cap` to
//! receive a NUL-terminated copy, or a NULL `buf` to ask for the length.
//! When `n` is non-NULL it receives the string length (excluding the NUL),
//! including when the buffer was too short.
//!
//! Status codes:
//!
//! | Code | Name | Meaning |
//! |------|------|---------|
//! | 0 | `ERRGATE_OK` | Success |
//! | -1 | `ERRGATE_ERR_UNKNOWN` | Runtime failure or panic |
//! | -2 | `ERRGATE_ERR_OVERFLOW` | Caller's buffer too short |
//! | -3 | `ERRGATE_ERR_KEY` | Unknown setting name |
//! | -4 | `ERRGATE_ERR_DOMAIN` | Failure from the library's own error types |
//! | -5 | `ERRGATE_ERR_USAGE` | API misuse (NULL argument, reading a missing error) |

mod accessors;
mod context;
mod settings;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::slice;

use errgate_core::translate::status_of;
use errgate_core::{ErrorContext, Failure, Status, guarded};

pub use accessors::{errgate_err_info_msg, errgate_err_msg, errgate_err_name};
pub use context::{
    errgate_context_clear, errgate_context_create, errgate_context_free, errgate_err_code,
    errgate_set_err_msg,
};
pub use settings::{errgate_setting_get, errgate_setting_set, errgate_settings_json};

/// Status code returned by every fallible entry point.
#[allow(non_camel_case_types)]
pub type errgate_status = Status;

/// Opaque error context handle.
///
/// Created by [`errgate_context_create`] and released by
/// [`errgate_context_free`]. A context is not thread-safe; use one per thread.
#[repr(C)]
#[allow(non_camel_case_types)]
pub struct errgate_context {
    _private: [u8; 0],
}

impl errgate_context {
    fn from_internal(internal: Box<ErrorContext>) -> *mut Self {
        Box::into_raw(internal).cast::<Self>()
    }

    /// # Safety
    /// Pointer must have come from `from_internal` and not been freed.
    unsafe fn into_internal(ptr: *mut Self) -> Box<ErrorContext> {
        unsafe { Box::from_raw(ptr.cast::<ErrorContext>()) }
    }

    /// # Safety
    /// Pointer must be NULL or a live handle with no outstanding `&mut`.
    unsafe fn as_internal<'a>(ptr: *const Self) -> Option<&'a ErrorContext> {
        unsafe { ptr.cast::<ErrorContext>().as_ref() }
    }

    /// # Safety
    /// Pointer must be NULL or a live handle with no other outstanding reference.
    unsafe fn as_internal_mut<'a>(ptr: *mut Self) -> Option<&'a mut ErrorContext> {
        unsafe { ptr.cast::<ErrorContext>().as_mut() }
    }
}

/// Run `f` at the boundary, recording any failure in `out`.
///
/// Every entry point in this crate is built on this; Rust hosts exporting
/// their own `extern "C"` functions over the same contexts should be too.
/// A NULL `out` still gets a status back; the error details are dropped.
///
/// # Safety
/// `out` must be NULL or a live handle not aliased by anything `f` touches.
pub unsafe fn boundary<F>(out: *mut errgate_context, f: F) -> Status
where
    F: FnOnce() -> Result<(), Failure>,
{
    let mut scratch = ErrorContext::new();
    let ctx = match unsafe { errgate_context::as_internal_mut(out) } {
        Some(ctx) => ctx,
        None => &mut scratch,
    };
    status_of(guarded(ctx, f))
}

/// Borrow a NUL-terminated UTF-8 argument.
///
/// # Safety
/// `ptr` must be NULL or point to a NUL-terminated string valid for `'a`.
unsafe fn str_arg<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, Failure> {
    if ptr.is_null() {
        return Err(Failure::usage(format!("{what} is NULL")));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| Failure::usage(format!("{what} is not valid UTF-8")))
}

/// Borrow a NUL-terminated argument as raw bytes, without the terminator.
///
/// # Safety
/// `ptr` must be NULL or point to a NUL-terminated string valid for `'a`.
unsafe fn bytes_arg<'a>(ptr: *const c_char, what: &str) -> Result<&'a [u8], Failure> {
    if ptr.is_null() {
        return Err(Failure::usage(format!("{what} is NULL")));
    }
    Ok(unsafe { CStr::from_ptr(ptr) }.to_bytes())
}

/// Caller's output buffer, or `None` for a size query.
///
/// # Safety
/// `buf` must be NULL or valid for writes of `cap` bytes.
unsafe fn out_buffer<'a>(buf: *mut c_char, cap: usize) -> Option<&'a mut [u8]> {
    if buf.is_null() {
        None
    } else {
        Some(unsafe { slice::from_raw_parts_mut(buf.cast::<u8>(), cap) })
    }
}

/// # Safety
/// `n` must be NULL or valid for a `usize` write.
unsafe fn store_len(n: *mut usize, len: usize) {
    if let Some(n) = unsafe { n.as_mut() } {
        *n = len;
    }
}

const VERSION_NUL: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Library version as a static NUL-terminated string. Never free it.
#[unsafe(no_mangle)]
pub extern "C" fn errgate_version_get() -> *const c_char {
    VERSION_NUL.as_ptr().cast::<c_char>()
}

/// One-time library initialisation.
///
/// Reads `ERRGATE_LOG`, `ERRGATE_CONFIG_FILE` and `ERRGATE_SETTINGS`,
/// installs logging and applies setting overrides. Register settings first.
/// Calling it again is a no-op.
///
/// # Safety
/// `ctx` must be NULL or a handle from [`errgate_context_create`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn errgate_init(ctx: *mut errgate_context) -> errgate_status {
    unsafe { boundary(ctx, || errgate_core::init().map_err(Failure::from)) }
}
