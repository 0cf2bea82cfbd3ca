//! Growable SharedArrayBuffer.
//!
//! The store is allocated at its maximum length once and shared through an
//! `Arc`, so handles can move between threads. The length only grows; the
//! length lock serializes concurrent `grow` calls so that no grow is lost.

use std::sync::Arc;

use core_types::{JsError, JsResult};
use parking_lot::{Mutex, RwLock};

use crate::array_buffer::MAX_BYTE_LENGTH;
use crate::buffer::{check_range, BufferSource};
use crate::conversions::relative_index;

#[derive(Debug)]
struct SharedData {
    byte_length: Mutex<usize>,
    bytes: RwLock<Box<[u8]>>,
    max_byte_length: usize,
}

/// A shared, grow-only byte buffer.
#[derive(Debug, Clone)]
pub struct GrowableSharedArrayBuffer {
    data: Arc<SharedData>,
}

impl GrowableSharedArrayBuffer {
    /// Creates a shared buffer of `byte_length` zeroed bytes that may grow
    /// up to `max_byte_length`.
    ///
    /// # Errors
    ///
    /// `RangeError` if `byte_length > max_byte_length` or the max exceeds
    /// [`MAX_BYTE_LENGTH`].
    pub fn new(byte_length: usize, max_byte_length: usize) -> JsResult<Self> {
        if max_byte_length > MAX_BYTE_LENGTH {
            return Err(JsError::range_error("Invalid array buffer length"));
        }
        if byte_length > max_byte_length {
            return Err(JsError::range_error(format!(
                "byteLength {} exceeds maxByteLength {}",
                byte_length, max_byte_length
            )));
        }
        tracing::trace!(byte_length, max_byte_length, "allocating growable SharedArrayBuffer");
        Ok(GrowableSharedArrayBuffer {
            data: Arc::new(SharedData {
                byte_length: Mutex::new(byte_length),
                bytes: RwLock::new(vec![0u8; max_byte_length].into_boxed_slice()),
                max_byte_length,
            }),
        })
    }

    /// Current length; never decreases.
    pub fn byte_length(&self) -> usize {
        *self.data.byte_length.lock()
    }

    pub fn max_byte_length(&self) -> usize {
        self.data.max_byte_length
    }

    /// Always true.
    pub fn growable(&self) -> bool {
        true
    }

    /// Returns true if both handles share one store.
    pub fn ptr_eq(&self, other: &GrowableSharedArrayBuffer) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Grows the buffer to `new_length` bytes. The new bytes read as zero.
    ///
    /// # Errors
    ///
    /// `TypeError` if `new_length` is below the current length, `RangeError`
    /// if it is negative or above the max length.
    pub fn grow(&self, new_length: i64) -> JsResult<()> {
        if new_length < 0 || new_length as u64 > self.data.max_byte_length as u64 {
            return Err(JsError::range_error(format!(
                "Invalid length {} for SharedArrayBuffer with maxByteLength {}",
                new_length, self.data.max_byte_length
            )));
        }
        let new_length = new_length as usize;
        let mut byte_length = self.data.byte_length.lock();
        if new_length < *byte_length {
            return Err(JsError::type_error(format!(
                "SharedArrayBuffer cannot shrink from {} to {}",
                *byte_length, new_length
            )));
        }
        tracing::trace!(old_length = *byte_length, new_length, "growing SharedArrayBuffer");
        *byte_length = new_length;
        Ok(())
    }

    /// Copies a range into a new shared buffer whose max length is its length.
    pub fn slice(&self, begin: i64, end: Option<i64>) -> JsResult<GrowableSharedArrayBuffer> {
        let len = self.byte_length();
        let first = relative_index(begin, len);
        let last = end.map_or(len, |e| relative_index(e, len));
        let count = last.saturating_sub(first);
        let copy = GrowableSharedArrayBuffer::new(count, count)?;
        copy.set_bytes(0, &self.get_bytes(first, count)?)?;
        Ok(copy)
    }
}

impl BufferSource for GrowableSharedArrayBuffer {
    /// Shared buffers are never detached.
    fn is_detached(&self) -> bool {
        false
    }

    fn byte_length(&self) -> usize {
        GrowableSharedArrayBuffer::byte_length(self)
    }

    fn get_bytes(&self, offset: usize, count: usize) -> JsResult<Vec<u8>> {
        check_range(offset, count, self.byte_length())?;
        let bytes = self.data.bytes.read();
        Ok(bytes[offset..offset + count].to_vec())
    }

    fn set_bytes(&self, offset: usize, src: &[u8]) -> JsResult<()> {
        check_range(offset, src.len(), self.byte_length())?;
        let mut bytes = self.data.bytes.write();
        bytes[offset..offset + src.len()].copy_from_slice(src);
        Ok(())
    }
}
