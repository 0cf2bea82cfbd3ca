//! Error taxonomy for the memory substrate.
//!
//! `RangeError` and `TypeError` are the script-visible errors raised by
//! buffers and views. `MemoryError` and `ValueError` come from the
//! collector's allocation path.

use std::fmt;

/// The kind of error raised by a memory operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong argument kind, access after detachment, resizing a fixed-length
    /// buffer, or shrinking a growable buffer
    TypeError,
    /// Length, offset or alignment validation failure
    RangeError,
    /// Allocation that cannot be satisfied even after a full collection
    MemoryError,
    /// Negative requested allocation size
    ValueError,
}

impl ErrorKind {
    /// Returns the constructor name a script would see.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::MemoryError => "MemoryError",
            ErrorKind::ValueError => "ValueError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error with its kind and a human-readable message.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, JsError};
///
/// let error = JsError::type_error("Cannot perform operation on a detached ArrayBuffer");
/// assert!(error.is_type_error());
/// assert_eq!(error.kind, ErrorKind::TypeError);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl JsError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        JsError {
            kind,
            message: message.into(),
        }
    }

    /// Create a TypeError
    pub fn type_error(message: impl Into<String>) -> Self {
        JsError::new(ErrorKind::TypeError, message)
    }

    /// Create a RangeError
    pub fn range_error(message: impl Into<String>) -> Self {
        JsError::new(ErrorKind::RangeError, message)
    }

    /// Create a MemoryError
    pub fn memory_error(message: impl Into<String>) -> Self {
        JsError::new(ErrorKind::MemoryError, message)
    }

    /// Create a ValueError
    pub fn value_error(message: impl Into<String>) -> Self {
        JsError::new(ErrorKind::ValueError, message)
    }

    /// Returns true for a TypeError.
    pub fn is_type_error(&self) -> bool {
        self.kind == ErrorKind::TypeError
    }

    /// Returns true for a RangeError.
    pub fn is_range_error(&self) -> bool {
        self.kind == ErrorKind::RangeError
    }

    /// Returns true for a MemoryError.
    pub fn is_memory_error(&self) -> bool {
        self.kind == ErrorKind::MemoryError
    }

    /// Returns true for a ValueError.
    pub fn is_value_error(&self) -> bool {
        self.kind == ErrorKind::ValueError
    }
}

/// Result type for memory operations
pub type JsResult<T> = Result<T, JsError>;
