#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common helpers for the C API integration tests.
//!
//! Everything goes through the exported `extern "C"` functions, the way a C
//! caller would use them.

#![allow(dead_code)]

use std::os::raw::c_char;
use std::ptr;

use errgate::{
    boundary, errgate_context, errgate_context_create, errgate_context_free, errgate_err_code,
    errgate_err_msg,
};
use errgate_core::Status;
use errgate_test_utils::{TestingError, read_c_buffer};

/// Signature shared by `errgate_err_msg`, `errgate_err_info_msg` and
/// `errgate_err_name`.
pub type Accessor = unsafe extern "C" fn(
    *mut errgate_context,
    *const errgate_context,
    *mut c_char,
    usize,
    *mut usize,
) -> Status;

/// Owns a context handle for the duration of a test.
pub struct Ctx(*mut errgate_context);

impl Ctx {
    pub fn new() -> Self {
        Self(errgate_context_create())
    }

    pub fn ptr(&self) -> *mut errgate_context {
        self.0
    }

    pub fn code(&self) -> Status {
        unsafe { errgate_err_code(self.0) }
    }

    /// Raise `err` inside a boundary call recording into this context.
    pub fn fail_with(&self, err: TestingError) -> Status {
        unsafe { boundary(self.0, || Err(err.into())) }
    }

    /// The recorded message. Panics if there is none.
    pub fn message(&self) -> String {
        let (status, message) = read_string(errgate_err_msg, self);
        assert_eq!(status, Status::Ok);
        message
    }
}

impl Default for Ctx {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Ctx {
    fn drop(&mut self) {
        unsafe { errgate_context_free(self.0) };
    }
}

pub fn buf_ptr(buf: &mut [u8]) -> *mut c_char {
    buf.as_mut_ptr().cast()
}

/// Read a string out of `read` with a generous buffer and no output context.
pub fn read_string(accessor: Accessor, read: &Ctx) -> (Status, String) {
    let mut buf = [0u8; 512];
    let status = unsafe {
        accessor(
            ptr::null_mut(),
            read.ptr(),
            buf_ptr(&mut buf),
            buf.len(),
            ptr::null_mut(),
        )
    };
    let value = if status.is_ok() {
        read_c_buffer(&buf)
    } else {
        String::new()
    };
    (status, value)
}
