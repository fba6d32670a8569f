//! Copy variable-length strings into caller-supplied buffers.
//!
//! Every string-returning accessor goes through [`write_bounded`]:
//!
//! - value not available: [`AccessError::Unavailable`] (a usage error)
//! - buffer shorter than `len + 1`: [`AccessError::Overflow`], buffer untouched
//! - otherwise: bytes plus a NUL terminator are copied and the length
//!   (excluding the terminator) is returned
//!
//! Passing no buffer is a size query: nothing is copied and the length is
//! returned.

use thiserror::Error;

use crate::error::Failure;
use crate::status::ErrorCode;

/// Errors from bounded retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The requested string does not exist; check the status first.
    #[error("{what} requested, but none is recorded")]
    Unavailable { what: &'static str },

    /// Destination too small. `needed` includes the NUL terminator.
    #[error("provided buffer too short: need {needed} bytes, got {capacity}")]
    Overflow { needed: usize, capacity: usize },
}

impl AccessError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AccessError::Unavailable { .. } => ErrorCode::UsageError,
            AccessError::Overflow { .. } => ErrorCode::Overflow,
        }
    }

    /// Length of the string that was not delivered, excluding the terminator.
    pub fn required_len(&self) -> Option<usize> {
        match self {
            AccessError::Unavailable { .. } => None,
            AccessError::Overflow { needed, .. } => Some(needed - 1),
        }
    }

    pub fn into_failure(self) -> Failure {
        Failure::coded(self.code(), self.to_string())
    }
}

/// Copy `value` into `dest` with a trailing NUL, or report why not.
pub fn write_bounded(
    value: Option<&str>,
    what: &'static str,
    dest: Option<&mut [u8]>,
) -> Result<usize, AccessError> {
    let Some(value) = value else {
        return Err(AccessError::Unavailable { what });
    };

    let bytes = value.as_bytes();
    let Some(dest) = dest else {
        return Ok(bytes.len());
    };

    let needed = bytes.len() + 1;
    if dest.len() < needed {
        return Err(AccessError::Overflow {
            needed,
            capacity: dest.len(),
        });
    }

    dest[..bytes.len()].copy_from_slice(bytes);
    dest[bytes.len()] = 0;
    Ok(bytes.len())
}
