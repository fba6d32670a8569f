//! Settings access through the global registry.

use std::os::raw::c_char;

use errgate_core::{Failure, SettingsError, SettingsRegistry};

use crate::{
    boundary, bytes_arg, errgate_context, errgate_status, out_buffer, store_len, str_arg,
};

/// Report the needed length on overflow, then hand the error to the translator.
///
/// # Safety
/// `n` must be NULL or valid for a `usize` write.
unsafe fn reported(err: SettingsError, n: *mut usize) -> Failure {
    if let Some(len) = err.required_len() {
        unsafe { store_len(n, len) };
    }
    err.into_failure()
}

/// Copy the string form of setting `key`.
///
/// Unknown keys yield `ERRGATE_ERR_KEY`.
///
/// # Safety
/// `ctx` must be NULL or a live handle. `key` must be a valid NUL-terminated
/// string. `buf` must be NULL or valid for `cap` bytes. `n` must be NULL or
/// valid for a `size_t` write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn errgate_setting_get(
    ctx: *mut errgate_context,
    key: *const c_char,
    buf: *mut c_char,
    cap: usize,
    n: *mut usize,
) -> errgate_status {
    unsafe {
        boundary(ctx, || {
            let key = str_arg(key, "setting key")?;
            let len = SettingsRegistry::global()
                .get_into(key, out_buffer(buf, cap))
                .map_err(|err| reported(err, n))?;
            store_len(n, len);
            Ok(())
        })
    }
}

/// Parse `value` into setting `key`.
///
/// Unknown keys yield `ERRGATE_ERR_KEY`; malformed values, including bytes
/// that are not UTF-8, yield `ERRGATE_ERR_DOMAIN` and leave the setting
/// unchanged.
///
/// # Safety
/// `ctx` must be NULL or a live handle. `key` and `value` must be valid
/// NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn errgate_setting_set(
    ctx: *mut errgate_context,
    key: *const c_char,
    value: *const c_char,
) -> errgate_status {
    unsafe {
        boundary(ctx, || {
            let key = str_arg(key, "setting key")?;
            let value = bytes_arg(value, "setting value")?;
            SettingsRegistry::global()
                .set_bytes(key, value)
                .map_err(SettingsError::into_failure)
        })
    }
}

/// Copy a JSON object describing every registered setting.
///
/// Each entry is keyed by name and carries `description`, `value`,
/// `default_value` and `overridden`.
///
/// # Safety
/// `ctx` must be NULL or a live handle. `buf` must be NULL or valid for `cap`
/// bytes. `n` must be NULL or valid for a `size_t` write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn errgate_settings_json(
    ctx: *mut errgate_context,
    buf: *mut c_char,
    cap: usize,
    n: *mut usize,
) -> errgate_status {
    unsafe {
        boundary(ctx, || {
            let json = SettingsRegistry::global().to_json().map_err(anyhow::Error::from)?;
            let dest = out_buffer(buf, cap);
            let len = errgate_core::write_bounded(Some(json.as_str()), "settings", dest)
                .map_err(|err| reported(SettingsError::from(err), n))?;
            store_len(n, len);
            Ok(())
        })
    }
}
