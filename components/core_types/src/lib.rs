//! Core error types shared by the runtime's memory components.
//!
//! Every fallible operation in the garbage collector and the binary data
//! subsystem reports failures through [`JsError`], tagged with the
//! [`ErrorKind`] a script would observe.
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, JsError, JsResult};
//!
//! fn checked_length(len: i64) -> JsResult<usize> {
//!     if len < 0 {
//!         return Err(JsError::range_error("Invalid array buffer length"));
//!     }
//!     Ok(len as usize)
//! }
//!
//! let err = checked_length(-1).unwrap_err();
//! assert_eq!(err.kind, ErrorKind::RangeError);
//! assert_eq!(err.to_string(), "RangeError: Invalid array buffer length");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;

pub use error::{ErrorKind, JsError, JsResult};
