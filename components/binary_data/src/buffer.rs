//! Byte-store abstraction shared by views.
//!
//! `DataView` and `TypedArray` only need bounds-checked byte reads and writes
//! plus a detachment flag, so both buffer kinds implement [`BufferSource`] and
//! views hold a [`ViewedBuffer`].

use core_types::{JsError, JsResult};

use crate::array_buffer::ArrayBuffer;
use crate::shared_array_buffer::GrowableSharedArrayBuffer;

/// Bounds-checked access to a buffer's bytes.
pub trait BufferSource {
    /// Returns true if the bytes were given up by transfer or detach.
    fn is_detached(&self) -> bool;

    /// Returns the current byte length (0 when detached).
    fn byte_length(&self) -> usize;

    /// Copies `count` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// `TypeError` if detached, `RangeError` if the range exceeds the length.
    fn get_bytes(&self, offset: usize, count: usize) -> JsResult<Vec<u8>>;

    /// Overwrites `data.len()` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// `TypeError` if detached, `RangeError` if the range exceeds the length.
    fn set_bytes(&self, offset: usize, data: &[u8]) -> JsResult<()>;
}

/// Checks that `[offset, offset + count)` lies within `len` bytes.
pub(crate) fn check_range(offset: usize, count: usize, len: usize) -> JsResult<()> {
    match offset.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(JsError::range_error(format!(
            "Offset {} and length {} are out of bounds for buffer of length {}",
            offset, count, len
        ))),
    }
}

pub(crate) fn detached_error() -> JsError {
    JsError::type_error("Cannot perform operation on a detached ArrayBuffer")
}

/// The buffer behind a view: either kind of ArrayBuffer.
#[derive(Debug, Clone)]
pub enum ViewedBuffer {
    /// Single-owner buffer (fixed-length or resizable)
    Array(ArrayBuffer),
    /// Growable buffer shared across threads
    Shared(GrowableSharedArrayBuffer),
}

impl ViewedBuffer {
    /// Returns the ArrayBuffer, if this is one.
    pub fn as_array_buffer(&self) -> Option<&ArrayBuffer> {
        match self {
            ViewedBuffer::Array(buf) => Some(buf),
            ViewedBuffer::Shared(_) => None,
        }
    }

    /// Returns the shared buffer, if this is one.
    pub fn as_shared(&self) -> Option<&GrowableSharedArrayBuffer> {
        match self {
            ViewedBuffer::Array(_) => None,
            ViewedBuffer::Shared(buf) => Some(buf),
        }
    }

    /// Returns true if both handles name the same underlying store.
    pub fn ptr_eq(&self, other: &ViewedBuffer) -> bool {
        match (self, other) {
            (ViewedBuffer::Array(a), ViewedBuffer::Array(b)) => a.ptr_eq(b),
            (ViewedBuffer::Shared(a), ViewedBuffer::Shared(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<ArrayBuffer> for ViewedBuffer {
    fn from(buf: ArrayBuffer) -> Self {
        ViewedBuffer::Array(buf)
    }
}

impl From<&ArrayBuffer> for ViewedBuffer {
    fn from(buf: &ArrayBuffer) -> Self {
        ViewedBuffer::Array(buf.clone())
    }
}

impl From<GrowableSharedArrayBuffer> for ViewedBuffer {
    fn from(buf: GrowableSharedArrayBuffer) -> Self {
        ViewedBuffer::Shared(buf)
    }
}

impl From<&GrowableSharedArrayBuffer> for ViewedBuffer {
    fn from(buf: &GrowableSharedArrayBuffer) -> Self {
        ViewedBuffer::Shared(buf.clone())
    }
}

impl BufferSource for ViewedBuffer {
    fn is_detached(&self) -> bool {
        match self {
            ViewedBuffer::Array(buf) => buf.is_detached(),
            ViewedBuffer::Shared(buf) => buf.is_detached(),
        }
    }

    fn byte_length(&self) -> usize {
        match self {
            ViewedBuffer::Array(buf) => BufferSource::byte_length(buf),
            ViewedBuffer::Shared(buf) => BufferSource::byte_length(buf),
        }
    }

    fn get_bytes(&self, offset: usize, count: usize) -> JsResult<Vec<u8>> {
        match self {
            ViewedBuffer::Array(buf) => buf.get_bytes(offset, count),
            ViewedBuffer::Shared(buf) => buf.get_bytes(offset, count),
        }
    }

    fn set_bytes(&self, offset: usize, data: &[u8]) -> JsResult<()> {
        match self {
            ViewedBuffer::Array(buf) => buf.set_bytes(offset, data),
            ViewedBuffer::Shared(buf) => buf.set_bytes(offset, data),
        }
    }
}
