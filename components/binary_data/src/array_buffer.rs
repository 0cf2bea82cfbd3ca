//! ArrayBuffer: fixed-length and resizable raw byte buffers.
//!
//! A resizable buffer allocates its maximum length up front; resizing only
//! moves the visible length. Transfer moves the bytes into a fresh buffer and
//! leaves this one detached. Every handle cloned from a buffer observes the
//! detachment since they share one store.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use core_types::{JsError, JsResult};

use crate::buffer::{check_range, detached_error, BufferSource};
use crate::conversions::relative_index;
use crate::data_view::DataView;
use crate::typed_array::TypedArray;

/// Largest byte length (and max byte length) a buffer may have.
pub const MAX_BYTE_LENGTH: usize = i32::MAX as usize;

#[derive(Debug)]
enum BufferState {
    Live {
        /// Allocated at the maximum length
        bytes: Box<[u8]>,
        byte_length: usize,
    },
    Detached,
}

#[derive(Debug)]
struct ArrayBufferData {
    state: BufferState,
    resizable: bool,
}

/// ArrayBuffer - a raw binary data buffer, fixed-length or resizable
#[derive(Debug, Clone)]
pub struct ArrayBuffer {
    data: Rc<RefCell<ArrayBufferData>>,
}

fn to_length(value: i64, what: &str) -> JsResult<usize> {
    if value < 0 || value as u64 > MAX_BYTE_LENGTH as u64 {
        return Err(JsError::range_error(format!("Invalid {}: {}", what, value)));
    }
    Ok(value as usize)
}

fn check_length(byte_length: usize) -> JsResult<()> {
    if byte_length > MAX_BYTE_LENGTH {
        return Err(JsError::range_error("Invalid array buffer length"));
    }
    Ok(())
}

impl ArrayBuffer {
    fn from_parts(bytes: Box<[u8]>, byte_length: usize, resizable: bool) -> Self {
        ArrayBuffer {
            data: Rc::new(RefCell::new(ArrayBufferData {
                state: BufferState::Live { bytes, byte_length },
                resizable,
            })),
        }
    }

    /// Create a new fixed-length ArrayBuffer of zeroed bytes
    pub fn new(byte_length: usize) -> JsResult<Self> {
        check_length(byte_length)?;
        tracing::trace!(byte_length, "allocating ArrayBuffer");
        Ok(Self::from_parts(
            vec![0u8; byte_length].into_boxed_slice(),
            byte_length,
            false,
        ))
    }

    /// Create a resizable ArrayBuffer that may grow up to `max_byte_length`
    ///
    /// # Errors
    ///
    /// `RangeError` if `byte_length > max_byte_length` or either exceeds
    /// [`MAX_BYTE_LENGTH`].
    pub fn new_resizable(byte_length: usize, max_byte_length: usize) -> JsResult<Self> {
        check_length(max_byte_length)?;
        if byte_length > max_byte_length {
            return Err(JsError::range_error(format!(
                "byteLength {} exceeds maxByteLength {}",
                byte_length, max_byte_length
            )));
        }
        tracing::trace!(byte_length, max_byte_length, "allocating resizable ArrayBuffer");
        Ok(Self::from_parts(
            vec![0u8; max_byte_length].into_boxed_slice(),
            byte_length,
            true,
        ))
    }

    /// Create a fixed-length ArrayBuffer holding a copy of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> JsResult<Self> {
        check_length(bytes.len())?;
        Ok(Self::from_parts(bytes.into(), bytes.len(), false))
    }

    /// Get the byte length of the buffer (0 once detached)
    pub fn byte_length(&self) -> usize {
        match &self.data.borrow().state {
            BufferState::Live { byte_length, .. } => *byte_length,
            BufferState::Detached => 0,
        }
    }

    /// Get the maximum byte length; equals the byte length unless resizable
    pub fn max_byte_length(&self) -> usize {
        let data = self.data.borrow();
        match &data.state {
            BufferState::Live { bytes, .. } if data.resizable => bytes.len(),
            BufferState::Live { byte_length, .. } => *byte_length,
            BufferState::Detached => 0,
        }
    }

    /// Whether this buffer was created resizable
    pub fn resizable(&self) -> bool {
        self.data.borrow().resizable
    }

    /// Whether this buffer has been detached
    pub fn detached(&self) -> bool {
        matches!(self.data.borrow().state, BufferState::Detached)
    }

    /// Returns true if both handles share one store.
    pub fn ptr_eq(&self, other: &ArrayBuffer) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Check if an object is a view of an ArrayBuffer (TypedArray or DataView)
    pub fn is_view(value: &dyn Any) -> bool {
        value.is::<DataView>() || value.is::<TypedArray>()
    }

    /// Slice the buffer into a new fixed-length ArrayBuffer
    ///
    /// Negative indices count from the end; the copied range is clamped to
    /// the current length and may be empty.
    pub fn slice(&self, begin: i64, end: Option<i64>) -> JsResult<ArrayBuffer> {
        let data = self.data.borrow();
        let BufferState::Live { bytes, byte_length } = &data.state else {
            return Err(detached_error());
        };
        let len = *byte_length;
        let first = relative_index(begin, len);
        let last = end.map_or(len, |e| relative_index(e, len));
        let count = last.saturating_sub(first);
        Ok(Self::from_parts(
            bytes[first..first + count].into(),
            count,
            false,
        ))
    }

    /// Move the bytes into a new buffer and detach this one.
    ///
    /// The new buffer keeps this buffer's resizability (and max length).
    /// Bytes beyond the old length are zero; bytes beyond the new length are
    /// dropped.
    pub fn transfer(&self, new_length: Option<i64>) -> JsResult<ArrayBuffer> {
        self.transfer_impl(new_length, true)
    }

    /// Like [`ArrayBuffer::transfer`], but the result is always fixed-length.
    pub fn transfer_to_fixed_length(&self, new_length: Option<i64>) -> JsResult<ArrayBuffer> {
        self.transfer_impl(new_length, false)
    }

    fn transfer_impl(&self, new_length: Option<i64>, preserve_resizability: bool) -> JsResult<ArrayBuffer> {
        let mut data = self.data.borrow_mut();
        let resizable = preserve_resizability && data.resizable;
        let BufferState::Live { bytes, byte_length } = &data.state else {
            return Err(detached_error());
        };
        let new_length = match new_length {
            Some(n) => to_length(n, "array buffer length")?,
            None => *byte_length,
        };
        let max = if resizable { bytes.len() } else { new_length };
        if new_length > max {
            return Err(JsError::range_error(format!(
                "New length {} exceeds maxByteLength {}",
                new_length, max
            )));
        }

        let mut moved = vec![0u8; max].into_boxed_slice();
        let keep = new_length.min(*byte_length);
        moved[..keep].copy_from_slice(&bytes[..keep]);
        tracing::trace!(old_length = *byte_length, new_length, resizable, "transferring ArrayBuffer");

        data.state = BufferState::Detached;
        Ok(Self::from_parts(moved, new_length, resizable))
    }

    /// Give up the bytes without producing a new buffer.
    pub fn detach(&self) {
        let mut data = self.data.borrow_mut();
        if !matches!(data.state, BufferState::Detached) {
            tracing::trace!("detaching ArrayBuffer");
            data.state = BufferState::Detached;
        }
    }

    /// Change the length of a resizable buffer
    ///
    /// Shrinking hides bytes past the new end without clearing them, so growing
    /// again exposes them unchanged. Bytes never written read as zero.
    ///
    /// # Errors
    ///
    /// `TypeError` if the buffer is not resizable or is detached,
    /// `RangeError` if `new_length` is negative or exceeds the max length.
    pub fn resize(&self, new_length: i64) -> JsResult<()> {
        let mut data = self.data.borrow_mut();
        if !data.resizable {
            return Err(JsError::type_error(
                "Method ArrayBuffer.prototype.resize called on a fixed-length buffer",
            ));
        }
        let BufferState::Live { bytes, byte_length } = &mut data.state else {
            return Err(detached_error());
        };
        let max = bytes.len();
        let new_length = match to_length(new_length, "array buffer length")? {
            n if n > max => {
                return Err(JsError::range_error(format!(
                    "New length {} exceeds maxByteLength {}",
                    n, max
                )));
            }
            n => n,
        };
        tracing::trace!(old_length = *byte_length, new_length, "resizing ArrayBuffer");
        *byte_length = new_length;
        Ok(())
    }
}

impl BufferSource for ArrayBuffer {
    fn is_detached(&self) -> bool {
        self.detached()
    }

    fn byte_length(&self) -> usize {
        ArrayBuffer::byte_length(self)
    }

    fn get_bytes(&self, offset: usize, count: usize) -> JsResult<Vec<u8>> {
        let data = self.data.borrow();
        let BufferState::Live { bytes, byte_length } = &data.state else {
            return Err(detached_error());
        };
        check_range(offset, count, *byte_length)?;
        Ok(bytes[offset..offset + count].to_vec())
    }

    fn set_bytes(&self, offset: usize, src: &[u8]) -> JsResult<()> {
        let mut data = self.data.borrow_mut();
        let BufferState::Live { bytes, byte_length } = &mut data.state else {
            return Err(detached_error());
        };
        check_range(offset, src.len(), *byte_length)?;
        bytes[offset..offset + src.len()].copy_from_slice(src);
        Ok(())
    }
}
