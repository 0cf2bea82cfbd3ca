//! Binary data - raw byte buffers and typed views over them
//!
//! This component provides:
//! - [`ArrayBuffer`]: fixed-length or resizable bytes with one-way detachment
//! - [`GrowableSharedArrayBuffer`]: a grow-only buffer shared across threads
//! - [`DataView`]: endian-explicit scalar reads and writes
//! - [`TypedArray`]: indexed views for the 11 element types
//!
//! Views never own storage. Every access goes through the buffer, which
//! performs the bounds and detachment checks.
//!
//! # Example
//!
//! ```
//! use binary_data::{ArrayBuffer, DataView, ElementType, TypedArray};
//!
//! let buffer = ArrayBuffer::new(4).unwrap();
//! let view = DataView::new(&buffer, None, None).unwrap();
//! view.set_uint16(0, 0x0102 as f64, false).unwrap();
//!
//! let bytes = TypedArray::from_buffer(&buffer, ElementType::Uint8, None, None).unwrap();
//! assert_eq!(bytes.join(None).unwrap(), "1,2,0,0");
//! ```

pub mod array_buffer;
pub mod buffer;
mod conversions;
pub mod data_view;
pub mod element;
pub mod iter;
pub mod shared_array_buffer;
pub mod typed_array;

use std::any::Any;

pub use array_buffer::{ArrayBuffer, MAX_BYTE_LENGTH};
pub use buffer::{BufferSource, ViewedBuffer};
pub use data_view::DataView;
pub use element::{decode, encode, Conversion, ElementDescriptor, ElementType, ElementValue};
pub use iter::{Entries, Keys, Values};
pub use shared_array_buffer::GrowableSharedArrayBuffer;
pub use typed_array::TypedArray;

/// Returns true only for `DataView` and `TypedArray` values.
pub fn is_view(value: &dyn Any) -> bool {
    ArrayBuffer::is_view(value)
}
