//! Bounded read-back of the recorded error.
//!
//! `read` is the context being inspected; failures of the accessor itself
//! (NULL `read`, nothing recorded, short buffer) land in `out`. The two may
//! be the same handle.

use std::os::raw::c_char;

use errgate_core::{AccessError, ErrorContext, Failure};

use crate::{boundary, errgate_context, errgate_status, out_buffer, store_len};

type Accessor = fn(&ErrorContext, Option<&mut [u8]>) -> Result<usize, AccessError>;

/// # Safety
/// See the public wrappers.
unsafe fn read_error(
    out: *mut errgate_context,
    read: *const errgate_context,
    buf: *mut c_char,
    cap: usize,
    n: *mut usize,
    accessor: Accessor,
) -> errgate_status {
    // Snapshot before `out` is borrowed mutably; `out` and `read` may alias.
    let source = unsafe { errgate_context::as_internal(read) }.cloned();

    unsafe {
        boundary(out, || {
            let source = source.ok_or_else(|| Failure::usage("read context is NULL"))?;
            let dest = out_buffer(buf, cap);
            match accessor(&source, dest) {
                Ok(len) => {
                    store_len(n, len);
                    Ok(())
                }
                Err(err) => {
                    if let Some(len) = err.required_len() {
                        store_len(n, len);
                    }
                    Err(err.into_failure())
                }
            }
        })
    }
}

/// Copy the short error message recorded in `read`.
///
/// # Safety
/// `out` and `read` must be NULL or live handles. `buf` must be NULL or valid
/// for `cap` bytes. `n` must be NULL or valid for a `size_t` write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn errgate_err_msg(
    out: *mut errgate_context,
    read: *const errgate_context,
    buf: *mut c_char,
    cap: usize,
    n: *mut usize,
) -> errgate_status {
    unsafe { read_error(out, read, buf, cap, n, ErrorContext::message_into) }
}

/// Copy the long-form detail recorded in `read`.
///
/// Only domain errors carry a detail; asking for one that is absent is a
/// usage error.
///
/// # Safety
/// Same as [`errgate_err_msg`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn errgate_err_info_msg(
    out: *mut errgate_context,
    read: *const errgate_context,
    buf: *mut c_char,
    cap: usize,
    n: *mut usize,
) -> errgate_status {
    unsafe { read_error(out, read, buf, cap, n, ErrorContext::detail_into) }
}

/// Copy the kind name recorded in `read`.
///
/// # Safety
/// Same as [`errgate_err_msg`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn errgate_err_name(
    out: *mut errgate_context,
    read: *const errgate_context,
    buf: *mut c_char,
    cap: usize,
    n: *mut usize,
) -> errgate_status {
    unsafe { read_error(out, read, buf, cap, n, ErrorContext::kind_name_into) }
}
