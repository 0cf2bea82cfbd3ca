//! DataView: untyped, endian-explicit access to a buffer window.
//!
//! Multi-byte accessors take `little_endian`; `false` is big-endian, the
//! default of the `DataView` getters and setters.

use core_types::{JsError, JsResult};
use num_bigint::BigInt;

use crate::buffer::{detached_error, BufferSource, ViewedBuffer};
use crate::element::{decode, encode, ElementType, ElementValue};

/// DataView for reading/writing multiple numeric types in an ArrayBuffer
#[derive(Debug, Clone)]
pub struct DataView {
    buffer: ViewedBuffer,
    byte_offset: usize,
    byte_length: usize,
}

impl DataView {
    /// Create a new DataView over `buffer`.
    ///
    /// Without `byte_length`, the view extends to the end of the buffer as
    /// it is now; the window is fixed from then on.
    ///
    /// # Errors
    ///
    /// `TypeError` if the buffer is detached, `RangeError` if the window
    /// does not fit in the buffer.
    pub fn new(
        buffer: impl Into<ViewedBuffer>,
        byte_offset: Option<usize>,
        byte_length: Option<usize>,
    ) -> JsResult<Self> {
        let buffer = buffer.into();
        let offset = byte_offset.unwrap_or(0);
        if buffer.is_detached() {
            return Err(detached_error());
        }

        let buffer_length = buffer.byte_length();
        if offset > buffer_length {
            return Err(JsError::range_error(format!(
                "Start offset {} is outside the bounds of the buffer",
                offset
            )));
        }

        let length = match byte_length {
            Some(len) => {
                if offset.checked_add(len).map_or(true, |end| end > buffer_length) {
                    return Err(JsError::range_error(format!(
                        "Invalid DataView length {}",
                        len
                    )));
                }
                len
            }
            None => buffer_length - offset,
        };

        Ok(DataView {
            buffer,
            byte_offset: offset,
            byte_length: length,
        })
    }

    /// Get the underlying buffer
    pub fn buffer(&self) -> &ViewedBuffer {
        &self.buffer
    }

    /// Get the byte offset
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Get the byte length
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// Resolves a view-relative offset to a buffer position.
    fn position(&self, offset: usize, width: usize) -> JsResult<usize> {
        if self.buffer.is_detached() {
            return Err(detached_error());
        }
        if self.byte_offset + self.byte_length > self.buffer.byte_length() {
            return Err(JsError::type_error("DataView is out of bounds of its buffer"));
        }
        match offset.checked_add(width) {
            Some(end) if end <= self.byte_length => Ok(self.byte_offset + offset),
            _ => Err(JsError::range_error("Offset is outside the bounds of the DataView")),
        }
    }

    /// Reads one element of type `ty` at `offset`.
    pub fn get_value(&self, ty: ElementType, offset: usize, little_endian: bool) -> JsResult<ElementValue> {
        let width = ty.bytes_per_element();
        let position = self.position(offset, width)?;
        let bytes = self.buffer.get_bytes(position, width)?;
        Ok(decode(ty, &bytes, little_endian))
    }

    /// Writes `value` as one element of type `ty` at `offset`.
    ///
    /// The value is converted before any bounds check, so a Number/BigInt
    /// mismatch is a `TypeError` even for an out-of-range offset.
    pub fn set_value(
        &self,
        ty: ElementType,
        offset: usize,
        value: &ElementValue,
        little_endian: bool,
    ) -> JsResult<()> {
        let bytes = encode(ty, value, little_endian)?;
        let position = self.position(offset, bytes.len())?;
        self.buffer.set_bytes(position, &bytes)
    }

    fn get_number(&self, ty: ElementType, offset: usize, little_endian: bool) -> JsResult<f64> {
        match self.get_value(ty, offset, little_endian)? {
            ElementValue::Number(n) => Ok(n),
            ElementValue::BigInt(_) => Err(JsError::type_error("Expected a Number element")),
        }
    }

    fn get_bigint(&self, ty: ElementType, offset: usize, little_endian: bool) -> JsResult<BigInt> {
        match self.get_value(ty, offset, little_endian)? {
            ElementValue::BigInt(b) => Ok(b),
            ElementValue::Number(_) => Err(JsError::type_error("Expected a BigInt element")),
        }
    }

    fn set_number(&self, ty: ElementType, offset: usize, value: f64, little_endian: bool) -> JsResult<()> {
        self.set_value(ty, offset, &ElementValue::Number(value), little_endian)
    }

    /// Get Int8 value at byte offset
    pub fn get_int8(&self, offset: usize) -> JsResult<i8> {
        Ok(self.get_number(ElementType::Int8, offset, false)? as i8)
    }

    /// Set Int8 value at byte offset (wraps modulo 2^8)
    pub fn set_int8(&self, offset: usize, value: f64) -> JsResult<()> {
        self.set_number(ElementType::Int8, offset, value, false)
    }

    /// Get Uint8 value at byte offset
    pub fn get_uint8(&self, offset: usize) -> JsResult<u8> {
        Ok(self.get_number(ElementType::Uint8, offset, false)? as u8)
    }

    /// Set Uint8 value at byte offset (wraps modulo 2^8)
    pub fn set_uint8(&self, offset: usize, value: f64) -> JsResult<()> {
        self.set_number(ElementType::Uint8, offset, value, false)
    }

    /// Get Int16 value at byte offset
    pub fn get_int16(&self, offset: usize, little_endian: bool) -> JsResult<i16> {
        Ok(self.get_number(ElementType::Int16, offset, little_endian)? as i16)
    }

    /// Set Int16 value at byte offset
    pub fn set_int16(&self, offset: usize, value: f64, little_endian: bool) -> JsResult<()> {
        self.set_number(ElementType::Int16, offset, value, little_endian)
    }

    /// Get Uint16 value at byte offset
    pub fn get_uint16(&self, offset: usize, little_endian: bool) -> JsResult<u16> {
        Ok(self.get_number(ElementType::Uint16, offset, little_endian)? as u16)
    }

    /// Set Uint16 value at byte offset
    pub fn set_uint16(&self, offset: usize, value: f64, little_endian: bool) -> JsResult<()> {
        self.set_number(ElementType::Uint16, offset, value, little_endian)
    }

    /// Get Int32 value at byte offset
    pub fn get_int32(&self, offset: usize, little_endian: bool) -> JsResult<i32> {
        Ok(self.get_number(ElementType::Int32, offset, little_endian)? as i32)
    }

    /// Set Int32 value at byte offset
    pub fn set_int32(&self, offset: usize, value: f64, little_endian: bool) -> JsResult<()> {
        self.set_number(ElementType::Int32, offset, value, little_endian)
    }

    /// Get Uint32 value at byte offset
    pub fn get_uint32(&self, offset: usize, little_endian: bool) -> JsResult<u32> {
        Ok(self.get_number(ElementType::Uint32, offset, little_endian)? as u32)
    }

    /// Set Uint32 value at byte offset
    pub fn set_uint32(&self, offset: usize, value: f64, little_endian: bool) -> JsResult<()> {
        self.set_number(ElementType::Uint32, offset, value, little_endian)
    }

    /// Get Float32 value at byte offset
    pub fn get_float32(&self, offset: usize, little_endian: bool) -> JsResult<f32> {
        Ok(self.get_number(ElementType::Float32, offset, little_endian)? as f32)
    }

    /// Set Float32 value at byte offset (rounds to binary32)
    pub fn set_float32(&self, offset: usize, value: f64, little_endian: bool) -> JsResult<()> {
        self.set_number(ElementType::Float32, offset, value, little_endian)
    }

    /// Get Float64 value at byte offset
    pub fn get_float64(&self, offset: usize, little_endian: bool) -> JsResult<f64> {
        self.get_number(ElementType::Float64, offset, little_endian)
    }

    /// Set Float64 value at byte offset
    pub fn set_float64(&self, offset: usize, value: f64, little_endian: bool) -> JsResult<()> {
        self.set_number(ElementType::Float64, offset, value, little_endian)
    }

    /// Get BigInt64 value at byte offset
    pub fn get_big_int64(&self, offset: usize, little_endian: bool) -> JsResult<BigInt> {
        self.get_bigint(ElementType::BigInt64, offset, little_endian)
    }

    /// Set BigInt64 value at byte offset (wraps modulo 2^64)
    pub fn set_big_int64(&self, offset: usize, value: &BigInt, little_endian: bool) -> JsResult<()> {
        self.set_value(ElementType::BigInt64, offset, &ElementValue::BigInt(value.clone()), little_endian)
    }

    /// Get BigUint64 value at byte offset
    pub fn get_big_uint64(&self, offset: usize, little_endian: bool) -> JsResult<BigInt> {
        self.get_bigint(ElementType::BigUint64, offset, little_endian)
    }

    /// Set BigUint64 value at byte offset (wraps modulo 2^64)
    pub fn set_big_uint64(&self, offset: usize, value: &BigInt, little_endian: bool) -> JsResult<()> {
        self.set_value(ElementType::BigUint64, offset, &ElementValue::BigInt(value.clone()), little_endian)
    }
}
