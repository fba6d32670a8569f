//! Status codes returned across the C boundary.
//!
//! Every boundary call returns a [`Status`]. Negative values indicate errors;
//! zero indicates success.
//!
//! | Code | Meaning |
//! |------|---------|
//! | `0`  | Success |
//! | `-1` | Unknown failure (generic runtime error or unrecognised panic) |
//! | `-2` | Output buffer too small; nothing was written |
//! | `-3` | Setting name not registered |
//! | `-4` | Failure raised by the library's own error hierarchy |
//! | `-5` | Caller violated a precondition (absent error, null handle) |

use std::fmt;

/// Flat status code as seen by foreign callers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok = 0,
    Unknown = -1,
    Overflow = -2,
    KeyNotFound = -3,
    DomainError = -4,
    UsageError = -5,
}

/// The non-OK subset of [`Status`].
///
/// A recorded error always carries one of these, so "error with status OK"
/// cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Unknown,
    Overflow,
    KeyNotFound,
    DomainError,
    UsageError,
}

impl ErrorCode {
    /// Kind name recorded when an error is set directly from a code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => "Unknown",
            ErrorCode::Overflow => "Overflow",
            ErrorCode::KeyNotFound => "KeyNotFound",
            ErrorCode::DomainError => "DomainError",
            ErrorCode::UsageError => "UsageError",
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ErrorCode::Unknown => Status::Unknown,
            ErrorCode::Overflow => Status::Overflow,
            ErrorCode::KeyNotFound => Status::KeyNotFound,
            ErrorCode::DomainError => Status::DomainError,
            ErrorCode::UsageError => Status::UsageError,
        }
    }
}

impl Status {
    /// Raw integer value, as written to the C ABI.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Convert to the non-OK subset; `None` for [`Status::Ok`].
    pub fn error_code(self) -> Option<ErrorCode> {
        match self {
            Status::Ok => None,
            Status::Unknown => Some(ErrorCode::Unknown),
            Status::Overflow => Some(ErrorCode::Overflow),
            Status::KeyNotFound => Some(ErrorCode::KeyNotFound),
            Status::DomainError => Some(ErrorCode::DomainError),
            Status::UsageError => Some(ErrorCode::UsageError),
        }
    }

    /// Decode a raw integer. Unrecognised values yield `None`.
    pub fn from_i32(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Status::Ok),
            -1 => Some(Status::Unknown),
            -2 => Some(Status::Overflow),
            -3 => Some(Status::KeyNotFound),
            -4 => Some(Status::DomainError),
            -5 => Some(Status::UsageError),
            _ => None,
        }
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl From<ErrorCode> for Status {
    fn from(code: ErrorCode) -> Self {
        code.status()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_code() {
            Some(code) => write!(f, "{code}"),
            None => f.write_str("Ok"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_c_abi_values() {
        assert_eq!(Status::Ok.as_i32(), 0);
        assert_eq!(Status::Unknown.as_i32(), -1);
        assert_eq!(Status::Overflow.as_i32(), -2);
        assert_eq!(Status::KeyNotFound.as_i32(), -3);
        assert_eq!(Status::DomainError.as_i32(), -4);
        assert_eq!(Status::UsageError.as_i32(), -5);
    }

    #[test]
    fn ok_has_no_error_code() {
        assert_eq!(Status::Ok.error_code(), None);
        assert_eq!(
            Status::KeyNotFound.error_code(),
            Some(ErrorCode::KeyNotFound)
        );
        assert_eq!(Status::from(ErrorCode::Overflow), Status::Overflow);
    }

    #[test]
    fn decode_rejects_unknown_values() {
        assert_eq!(Status::from_i32(-4), Some(Status::DomainError));
        assert_eq!(Status::from_i32(7), None);
    }

    #[test]
    fn display_uses_kind_names() {
        assert_eq!(Status::Ok.to_string(), "Ok");
        assert_eq!(Status::UsageError.to_string(), "UsageError");
    }
}
