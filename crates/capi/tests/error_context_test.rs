#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Error context tests.
//!
//! Recording errors into contexts and reading them back through the bounded
//! accessors.

mod common;

use std::ptr;

use errgate::{
    boundary, errgate_context_clear, errgate_err_info_msg, errgate_err_msg, errgate_err_name,
    errgate_set_err_msg,
};
use errgate_core::{Failure, GENERIC_KIND_NAME, Status};
use errgate_test_utils::{TestingError, cstring, read_c_buffer, testing_error_kind};

use common::{Accessor, Ctx, buf_ptr, read_string};

const ACCESSORS: [(&str, Accessor); 3] = [
    ("errgate_err_msg", errgate_err_msg),
    ("errgate_err_info_msg", errgate_err_info_msg),
    ("errgate_err_name", errgate_err_name),
];

#[test]
fn test_new_context_is_ok() {
    let ctx = Ctx::new();
    assert_eq!(ctx.code(), Status::Ok);
}

#[test]
fn test_set_err_msg() {
    let ctx = Ctx::new();
    let msg = cstring("unknown test error");
    let status =
        unsafe { errgate_set_err_msg(ctx.ptr(), Status::Unknown.as_i32(), msg.as_ptr()) };
    assert_eq!(status, Status::Unknown);
    assert_eq!(ctx.code(), Status::Unknown);

    let mut buf = [0u8; 256];
    let mut n = 0usize;
    let status = unsafe {
        errgate_err_msg(
            ptr::null_mut(),
            ctx.ptr(),
            buf_ptr(&mut buf),
            buf.len(),
            &mut n,
        )
    };
    assert_eq!(status, Status::Ok);
    assert_eq!(n, "unknown test error".len());
    assert_eq!(read_c_buffer(&buf), "unknown test error");

    assert_eq!(
        read_string(errgate_err_name, &ctx),
        (Status::Ok, "Unknown".to_string())
    );
}

#[test]
fn test_err_msg_size_query() {
    let ctx = Ctx::new();
    ctx.fail_with(TestingError::new("testing error"));

    let mut n = 0usize;
    let status =
        unsafe { errgate_err_msg(ptr::null_mut(), ctx.ptr(), ptr::null_mut(), 0, &mut n) };
    assert_eq!(status, Status::Ok);
    assert_eq!(n, "testing error".len());
}

#[test]
fn test_domain_error_is_classified() {
    let ctx = Ctx::new();
    let status = ctx.fail_with(TestingError::new("testing error"));
    assert_eq!(status, Status::DomainError);
    assert_eq!(ctx.code(), Status::DomainError);

    assert_eq!(ctx.message(), "testing error");
    assert_eq!(
        read_string(errgate_err_name, &ctx),
        (Status::Ok, testing_error_kind().to_string())
    );
}

#[test]
fn test_err_info_msg() {
    let ctx = Ctx::new();
    ctx.fail_with(TestingError::new("testing error"));

    let mut buf = [0u8; 256];
    let mut n = 0usize;
    let status = unsafe {
        errgate_err_info_msg(
            ptr::null_mut(),
            ctx.ptr(),
            buf_ptr(&mut buf),
            buf.len(),
            &mut n,
        )
    };
    assert_eq!(status, Status::Ok);
    assert_eq!(read_c_buffer(&buf), "testing error");
    assert_eq!(n, "testing error".len());

    let out = Ctx::new();
    let mut small = [0x7fu8; 1];
    let status = unsafe {
        errgate_err_info_msg(out.ptr(), ctx.ptr(), buf_ptr(&mut small), 1, ptr::null_mut())
    };
    assert_eq!(status, Status::Overflow);
    assert_eq!(out.code(), Status::Overflow);
    assert_eq!(small, [0x7f]);
}

#[test]
fn test_err_info_msg_reads_extended_message() {
    let ctx = Ctx::new();
    ctx.fail_with(TestingError::new("testing error").with_trace("testing error\n  at step 3"));

    assert_eq!(
        read_string(errgate_err_info_msg, &ctx),
        (Status::Ok, "testing error\n  at step 3".to_string())
    );
    assert_eq!(ctx.message(), "testing error");
}

#[test]
fn test_one_byte_buffer_overflows_for_every_accessor() {
    let ctx = Ctx::new();
    ctx.fail_with(TestingError::new("testing error").with_trace("a long trace"));
    let expected = ["testing error".len(), "a long trace".len(), testing_error_kind().len()];

    for ((name, accessor), expected_len) in ACCESSORS.into_iter().zip(expected) {
        let out = Ctx::new();
        let mut buf = [0x7fu8; 1];
        let mut n = 0usize;
        let status = unsafe { accessor(out.ptr(), ctx.ptr(), buf_ptr(&mut buf), 1, &mut n) };

        assert_eq!(status, Status::Overflow, "{name}");
        assert_eq!(out.code(), Status::Overflow, "{name}");
        assert_eq!(buf, [0x7f], "{name} wrote into a short buffer");
        assert_eq!(n, expected_len, "{name}");
        // The inspected context is untouched.
        assert_eq!(ctx.code(), Status::DomainError, "{name}");
    }
}

#[test]
fn test_fresh_context_is_usage_error_for_every_accessor() {
    let ctx = Ctx::new();

    for (name, accessor) in ACCESSORS {
        let out = Ctx::new();
        let mut buf = [0x7fu8; 64];
        let status = unsafe {
            accessor(out.ptr(), ctx.ptr(), buf_ptr(&mut buf), buf.len(), ptr::null_mut())
        };

        assert_eq!(status, Status::UsageError, "{name}");
        assert_eq!(out.code(), Status::UsageError, "{name}");
        assert_eq!(buf, [0x7f; 64], "{name}");
        assert_eq!(ctx.code(), Status::Ok, "{name}");
    }
}

#[test]
fn test_err_info_msg_without_detail_is_usage_error() {
    let ctx = Ctx::new();
    let msg = cstring("plain");
    unsafe { errgate_set_err_msg(ctx.ptr(), Status::Unknown.as_i32(), msg.as_ptr()) };

    let out = Ctx::new();
    let mut buf = [0u8; 64];
    let status = unsafe {
        errgate_err_info_msg(out.ptr(), ctx.ptr(), buf_ptr(&mut buf), buf.len(), ptr::null_mut())
    };
    assert_eq!(status, Status::UsageError);
    assert_eq!(out.code(), Status::UsageError);
}

#[test]
fn test_out_and_read_may_be_the_same_context() {
    let ctx = Ctx::new();
    ctx.fail_with(TestingError::new("testing error"));

    let mut buf = [0x7fu8; 4];
    let status = unsafe {
        errgate_err_msg(ctx.ptr(), ctx.ptr(), buf_ptr(&mut buf), buf.len(), ptr::null_mut())
    };

    // The overflow replaces the error that was being read.
    assert_eq!(status, Status::Overflow);
    assert_eq!(ctx.code(), Status::Overflow);
    assert_eq!(buf, [0x7f; 4]);
}

#[test]
fn test_null_read_context_is_usage_error() {
    let out = Ctx::new();
    let mut buf = [0u8; 16];
    let status = unsafe {
        errgate_err_name(out.ptr(), ptr::null(), buf_ptr(&mut buf), buf.len(), ptr::null_mut())
    };
    assert_eq!(status, Status::UsageError);
    assert_eq!(out.code(), Status::UsageError);
}

#[test]
fn test_runtime_error_and_panic() {
    let ctx = Ctx::new();
    let status = unsafe {
        boundary(ctx.ptr(), || {
            Err(Failure::from(
                anyhow::anyhow!("disk full").context("writing cache"),
            ))
        })
    };
    assert_eq!(status, Status::Unknown);
    assert_eq!(ctx.message(), "writing cache: disk full");
    assert_eq!(
        read_string(errgate_err_name, &ctx),
        (Status::Ok, GENERIC_KIND_NAME.to_string())
    );
    // Runtime failures carry no extended message.
    assert_eq!(read_string(errgate_err_info_msg, &ctx).0, Status::UsageError);

    let status = unsafe { boundary(ctx.ptr(), || panic!("invariant broken")) };
    assert_eq!(status, Status::Unknown);
    assert_eq!(ctx.message(), "invariant broken");
}

#[test]
fn test_success_keeps_previous_error_until_cleared() {
    let ctx = Ctx::new();
    ctx.fail_with(TestingError::new("testing error"));

    let status = unsafe { boundary(ctx.ptr(), || Ok(())) };
    assert_eq!(status, Status::Ok);
    assert_eq!(ctx.code(), Status::DomainError);

    unsafe { errgate_context_clear(ctx.ptr()) };
    assert_eq!(ctx.code(), Status::Ok);
}

#[test]
fn test_null_out_context_still_returns_status() {
    let status =
        unsafe { boundary(ptr::null_mut(), || Err(TestingError::new("dropped").into())) };
    assert_eq!(status, Status::DomainError);
}
