//! TypedArray: an indexed, typed view over a buffer byte range.
//!
//! Elements are stored little-endian. Every access goes through the viewed
//! buffer, so views created with [`TypedArray::subarray`] or over a shared
//! [`ArrayBuffer`] observe each other's writes, and a detached buffer is
//! noticed on the next access.

use std::cmp::Ordering;

use core_types::{JsError, JsResult};

use crate::array_buffer::ArrayBuffer;
use crate::buffer::{detached_error, BufferSource, ViewedBuffer};
use crate::conversions::relative_index;
use crate::element::{decode, encode, ElementType, ElementValue};
use crate::iter::{Entries, Keys, Values};

/// Byte order of TypedArray element storage.
const STORAGE_LITTLE_ENDIAN: bool = true;

fn encode_all(kind: ElementType, values: &[ElementValue]) -> JsResult<Vec<u8>> {
    let mut bytes = Vec::with_capacity(values.len() * kind.bytes_per_element());
    for value in values {
        bytes.extend(encode(kind, value, STORAGE_LITTLE_ENDIAN)?);
    }
    Ok(bytes)
}

fn content_type_error(target: ElementType, source: ElementType) -> JsError {
    JsError::type_error(format!(
        "Cannot mix BigInt and other types: {} from {}",
        target.name(),
        source.name()
    ))
}

/// TypedArray - a typed view into an ArrayBuffer
#[derive(Debug, Clone)]
pub struct TypedArray {
    buffer: ViewedBuffer,
    kind: ElementType,
    byte_offset: usize,
    length: usize,
}

impl TypedArray {
    /// Create a new TypedArray of `length` zeroed elements
    pub fn new(kind: ElementType, length: usize) -> JsResult<Self> {
        let byte_length = length
            .checked_mul(kind.bytes_per_element())
            .ok_or_else(|| JsError::range_error(format!("Invalid typed array length: {}", length)))?;
        let buffer = ArrayBuffer::new(byte_length)?;
        Ok(TypedArray {
            buffer: buffer.into(),
            kind,
            byte_offset: 0,
            length,
        })
    }

    /// Create a TypedArray from element values, converting each one
    pub fn from_values<I>(kind: ElementType, values: I) -> JsResult<Self>
    where
        I: IntoIterator<Item = ElementValue>,
    {
        let values: Vec<ElementValue> = values.into_iter().collect();
        let bytes = encode_all(kind, &values)?;
        let buffer = ArrayBuffer::from_bytes(&bytes)?;
        Ok(TypedArray {
            buffer: buffer.into(),
            kind,
            byte_offset: 0,
            length: values.len(),
        })
    }

    /// Copy another TypedArray's elements into a fresh buffer of `kind`.
    ///
    /// # Errors
    ///
    /// `TypeError` if `source` is detached or out of bounds, or if one of
    /// the two kinds holds BigInts and the other Numbers.
    pub fn from_typed_array(kind: ElementType, source: &TypedArray) -> JsResult<Self> {
        let values = source.to_vec()?;
        if kind.is_bigint() != source.kind.is_bigint() {
            return Err(content_type_error(kind, source.kind));
        }
        Self::from_values(kind, values)
    }

    /// Create a TypedArray view on an existing buffer
    ///
    /// Without `length`, the view covers the rest of the buffer, whose byte
    /// length must then be a multiple of the element size.
    pub fn from_buffer(
        buffer: impl Into<ViewedBuffer>,
        kind: ElementType,
        byte_offset: Option<usize>,
        length: Option<usize>,
    ) -> JsResult<Self> {
        let buffer = buffer.into();
        let bpe = kind.bytes_per_element();
        let offset = byte_offset.unwrap_or(0);

        if offset % bpe != 0 {
            return Err(JsError::range_error(format!(
                "Start offset of {} should be a multiple of {}",
                kind.name(),
                bpe
            )));
        }
        if buffer.is_detached() {
            return Err(detached_error());
        }

        let buffer_length = buffer.byte_length();
        let length = match length {
            Some(len) => {
                let end = len.checked_mul(bpe).and_then(|bytes| bytes.checked_add(offset));
                if end.map_or(true, |end| end > buffer_length) {
                    return Err(JsError::range_error(format!(
                        "Invalid typed array length: {}",
                        len
                    )));
                }
                len
            }
            None => {
                if buffer_length % bpe != 0 {
                    return Err(JsError::range_error(format!(
                        "Byte length of {} should be a multiple of {}",
                        kind.name(),
                        bpe
                    )));
                }
                if offset > buffer_length {
                    return Err(JsError::range_error(format!(
                        "Start offset {} is outside the bounds of the buffer",
                        offset
                    )));
                }
                (buffer_length - offset) / bpe
            }
        };

        Ok(TypedArray {
            buffer,
            kind,
            byte_offset: offset,
            length,
        })
    }

    /// Get the element kind
    pub fn kind(&self) -> ElementType {
        self.kind
    }

    /// Get the length (number of elements), 0 if the view is no longer valid
    pub fn length(&self) -> usize {
        self.validate().unwrap_or(0)
    }

    /// Get the byte length, 0 if the view is no longer valid
    pub fn byte_length(&self) -> usize {
        self.length() * self.kind.bytes_per_element()
    }

    /// Get the byte offset
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Get the underlying buffer
    pub fn buffer(&self) -> &ViewedBuffer {
        &self.buffer
    }

    pub fn bytes_per_element(&self) -> usize {
        self.kind.bytes_per_element()
    }

    /// Checks that the view still fits an attached buffer and returns its length.
    pub(crate) fn validate(&self) -> JsResult<usize> {
        if self.buffer.is_detached() {
            return Err(detached_error());
        }
        let end = self.byte_offset + self.length * self.kind.bytes_per_element();
        if end > self.buffer.byte_length() {
            return Err(JsError::type_error(format!(
                "{} is out of bounds of its buffer",
                self.kind.name()
            )));
        }
        Ok(self.length)
    }

    fn position(&self, index: usize) -> usize {
        self.byte_offset + index * self.kind.bytes_per_element()
    }

    /// Buffer position of `index`, if the element is in range and fits the buffer.
    fn element_position(&self, index: usize) -> Option<usize> {
        if index >= self.length {
            return None;
        }
        let start = self.position(index);
        (start + self.kind.bytes_per_element() <= self.buffer.byte_length()).then_some(start)
    }

    pub(crate) fn read(&self, index: usize) -> JsResult<ElementValue> {
        let bpe = self.kind.bytes_per_element();
        let bytes = self.buffer.get_bytes(self.position(index), bpe)?;
        Ok(decode(self.kind, &bytes, STORAGE_LITTLE_ENDIAN))
    }

    fn write(&self, index: usize, value: &ElementValue) -> JsResult<()> {
        let bytes = encode(self.kind, value, STORAGE_LITTLE_ENDIAN)?;
        self.buffer.set_bytes(self.position(index), &bytes)
    }

    fn write_all(&self, values: &[ElementValue]) -> JsResult<()> {
        let bytes = encode_all(self.kind, values)?;
        self.buffer.set_bytes(self.byte_offset, &bytes)
    }

    /// Get element at index; `None` when out of range
    pub fn get(&self, index: usize) -> JsResult<Option<ElementValue>> {
        if self.buffer.is_detached() {
            return Err(detached_error());
        }
        match self.element_position(index) {
            Some(_) => self.read(index).map(Some),
            None => Ok(None),
        }
    }

    /// Set element at index; out-of-range writes are ignored
    pub fn set(&self, index: usize, value: impl Into<ElementValue>) -> JsResult<()> {
        let bytes = encode(self.kind, &value.into(), STORAGE_LITTLE_ENDIAN)?;
        if self.buffer.is_detached() {
            return Err(detached_error());
        }
        if let Some(position) = self.element_position(index) {
            self.buffer.set_bytes(position, &bytes)?;
        }
        Ok(())
    }

    /// Copy every element out of the array.
    pub fn to_vec(&self) -> JsResult<Vec<ElementValue>> {
        let len = self.validate()?;
        let bpe = self.kind.bytes_per_element();
        let bytes = self.buffer.get_bytes(self.byte_offset, len * bpe)?;
        Ok(bytes
            .chunks_exact(bpe)
            .map(|chunk| decode(self.kind, chunk, STORAGE_LITTLE_ENDIAN))
            .collect())
    }

    /// Get element at a relative index (negative counts from the end)
    pub fn at(&self, index: i64) -> JsResult<Option<ElementValue>> {
        let len = self.validate()?;
        let k = if index < 0 { len as i64 + index } else { index };
        if k < 0 || k as u64 >= len as u64 {
            return Ok(None);
        }
        self.read(k as usize).map(Some)
    }

    /// Create a new TypedArray with a copy of a range of elements
    pub fn slice(&self, start: i64, end: Option<i64>) -> JsResult<TypedArray> {
        let len = self.validate()?;
        let first = relative_index(start, len);
        let last = end.map_or(len, |e| relative_index(e, len));
        let count = last.saturating_sub(first);

        let result = TypedArray::new(self.kind, count)?;
        if count > 0 {
            let bpe = self.kind.bytes_per_element();
            let bytes = self.buffer.get_bytes(self.position(first), count * bpe)?;
            result.buffer.set_bytes(0, &bytes)?;
        }
        Ok(result)
    }

    /// Create a new view on the same buffer
    pub fn subarray(&self, begin: i64, end: Option<i64>) -> JsResult<TypedArray> {
        let len = self.validate()?;
        let first = relative_index(begin, len);
        let last = end.map_or(len, |e| relative_index(e, len));
        Ok(TypedArray {
            buffer: self.buffer.clone(),
            kind: self.kind,
            byte_offset: self.position(first),
            length: last.saturating_sub(first),
        })
    }

    fn check_fits(&self, offset: usize, count: usize, len: usize) -> JsResult<()> {
        match offset.checked_add(count) {
            Some(end) if end <= len => Ok(()),
            _ => Err(JsError::range_error(format!(
                "Source of length {} at offset {} overflows {} of length {}",
                count,
                offset,
                self.kind.name(),
                len
            ))),
        }
    }

    /// Copy another TypedArray's elements in, starting at `offset`.
    ///
    /// Overlapping views of one buffer are handled: the source is read in
    /// full before anything is written.
    pub fn set_array(&self, source: &TypedArray, offset: usize) -> JsResult<()> {
        let len = self.validate()?;
        let source_len = source.validate()?;
        self.check_fits(offset, source_len, len)?;
        if self.kind.is_bigint() != source.kind.is_bigint() {
            return Err(content_type_error(self.kind, source.kind));
        }

        if self.kind == source.kind {
            let bytes = source
                .buffer
                .get_bytes(source.byte_offset, source_len * source.kind.bytes_per_element())?;
            self.buffer.set_bytes(self.position(offset), &bytes)
        } else {
            let values = source.to_vec()?;
            let bytes = encode_all(self.kind, &values)?;
            self.buffer.set_bytes(self.position(offset), &bytes)
        }
    }

    /// Convert and copy `values` in, starting at `offset`.
    ///
    /// Every value is converted before anything is written.
    pub fn set_values(&self, values: &[ElementValue], offset: usize) -> JsResult<()> {
        let len = self.validate()?;
        self.check_fits(offset, values.len(), len)?;
        let bytes = encode_all(self.kind, values)?;
        self.buffer.set_bytes(self.position(offset), &bytes)
    }

    /// Copy within the array
    pub fn copy_within(&self, target: i64, start: i64, end: Option<i64>) -> JsResult<&Self> {
        let len = self.validate()?;
        let to = relative_index(target, len);
        let from = relative_index(start, len);
        let last = end.map_or(len, |e| relative_index(e, len));
        let count = last.saturating_sub(from).min(len - to);

        if count > 0 {
            let bpe = self.kind.bytes_per_element();
            let bytes = self.buffer.get_bytes(self.position(from), count * bpe)?;
            self.buffer.set_bytes(self.position(to), &bytes)?;
        }
        Ok(self)
    }

    /// Fill the array with a value
    pub fn fill(
        &self,
        value: impl Into<ElementValue>,
        start: Option<i64>,
        end: Option<i64>,
    ) -> JsResult<&Self> {
        let bytes = encode(self.kind, &value.into(), STORAGE_LITTLE_ENDIAN)?;
        let len = self.validate()?;
        let first = start.map_or(0, |s| relative_index(s, len));
        let last = end.map_or(len, |e| relative_index(e, len));

        for i in first..last {
            self.buffer.set_bytes(self.position(i), &bytes)?;
        }
        Ok(self)
    }

    /// Reverse the array in place
    pub fn reverse(&self) -> JsResult<&Self> {
        let len = self.validate()?;
        let bpe = self.kind.bytes_per_element();
        let bytes = self.buffer.get_bytes(self.byte_offset, len * bpe)?;
        let reversed: Vec<u8> = bytes.chunks_exact(bpe).rev().flatten().copied().collect();
        self.buffer.set_bytes(self.byte_offset, &reversed)?;
        Ok(self)
    }

    /// Sort the array in place: ascending, -0 before +0, NaN last
    pub fn sort(&self) -> JsResult<&Self> {
        self.sort_by(ElementValue::compare_default)
    }

    /// Sort the array in place with a comparator (stable)
    pub fn sort_by<F>(&self, compare: F) -> JsResult<&Self>
    where
        F: FnMut(&ElementValue, &ElementValue) -> Ordering,
    {
        let values = merge_sort(self.to_vec()?, compare);
        self.write_all(&values)?;
        Ok(self)
    }

    /// Check if the array includes a value (NaN matches NaN)
    pub fn includes(&self, value: &ElementValue, from_index: Option<i64>) -> JsResult<bool> {
        let len = self.validate()?;
        let start = from_index.map_or(0, |i| relative_index(i, len));
        for i in start..len {
            if self.read(i)?.same_value_zero(value) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Find the first index of a value (strict equality)
    pub fn index_of(&self, value: &ElementValue, from_index: Option<i64>) -> JsResult<Option<usize>> {
        let len = self.validate()?;
        let start = from_index.map_or(0, |i| relative_index(i, len));
        for i in start..len {
            if self.read(i)?.strict_equals(value) {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    /// Find the last index of a value (strict equality), searching backwards
    pub fn last_index_of(&self, value: &ElementValue, from_index: Option<i64>) -> JsResult<Option<usize>> {
        let len = self.validate()?;
        if len == 0 {
            return Ok(None);
        }
        let last = len as i64 - 1;
        let start = match from_index {
            None => last,
            Some(i) if i < 0 => len as i64 + i,
            Some(i) => i.min(last),
        };
        if start < 0 {
            return Ok(None);
        }
        for i in (0..=start as usize).rev() {
            if self.read(i)?.strict_equals(value) {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    /// Join the elements into a string
    pub fn join(&self, separator: Option<&str>) -> JsResult<String> {
        let parts: Vec<String> = self.to_vec()?.iter().map(ToString::to_string).collect();
        Ok(parts.join(separator.unwrap_or(",")))
    }

    /// Execute a callback for each element
    pub fn for_each<F>(&self, mut callback: F) -> JsResult<()>
    where
        F: FnMut(&ElementValue, usize) -> JsResult<()>,
    {
        let len = self.validate()?;
        for i in 0..len {
            if let Some(value) = self.get(i)? {
                callback(&value, i)?;
            }
        }
        Ok(())
    }

    /// Map each element using a callback
    pub fn map<F>(&self, mut callback: F) -> JsResult<TypedArray>
    where
        F: FnMut(ElementValue, usize) -> JsResult<ElementValue>,
    {
        let len = self.validate()?;
        let result = TypedArray::new(self.kind, len)?;
        for i in 0..len {
            if let Some(value) = self.get(i)? {
                let mapped = callback(value, i)?;
                result.write(i, &mapped)?;
            }
        }
        Ok(result)
    }

    /// Filter elements using a callback
    pub fn filter<F>(&self, mut callback: F) -> JsResult<TypedArray>
    where
        F: FnMut(&ElementValue, usize) -> JsResult<bool>,
    {
        let len = self.validate()?;
        let mut kept = Vec::new();
        for i in 0..len {
            let Some(value) = self.get(i)? else {
                continue;
            };
            if callback(&value, i)? {
                kept.push(value);
            }
        }
        TypedArray::from_values(self.kind, kept)
    }

    /// Elements that no longer fit a shrunk buffer are skipped.
    fn fold<I, F>(&self, indices: I, initial: Option<ElementValue>, mut callback: F) -> JsResult<ElementValue>
    where
        I: Iterator<Item = usize>,
        F: FnMut(ElementValue, ElementValue, usize) -> JsResult<ElementValue>,
    {
        let mut acc = initial;
        for i in indices {
            let Some(value) = self.get(i)? else {
                continue;
            };
            acc = Some(match acc {
                Some(acc) => callback(acc, value, i)?,
                None => value,
            });
        }
        acc.ok_or_else(|| JsError::type_error("Reduce of empty array with no initial value"))
    }

    /// Reduce elements left to right
    ///
    /// Without `initial`, the first element seeds the accumulator; an empty
    /// array is then a `TypeError`.
    pub fn reduce<F>(&self, initial: Option<ElementValue>, callback: F) -> JsResult<ElementValue>
    where
        F: FnMut(ElementValue, ElementValue, usize) -> JsResult<ElementValue>,
    {
        let len = self.validate()?;
        self.fold(0..len, initial, callback)
    }

    /// Reduce elements right to left
    pub fn reduce_right<F>(&self, initial: Option<ElementValue>, callback: F) -> JsResult<ElementValue>
    where
        F: FnMut(ElementValue, ElementValue, usize) -> JsResult<ElementValue>,
    {
        let len = self.validate()?;
        self.fold((0..len).rev(), initial, callback)
    }

    /// Returns true if the predicate holds for every element
    pub fn every<F>(&self, mut predicate: F) -> JsResult<bool>
    where
        F: FnMut(&ElementValue, usize) -> JsResult<bool>,
    {
        Ok(self.find_entry(0..self.validate()?, |v, i| Ok(!predicate(v, i)?))?.is_none())
    }

    /// Returns true if the predicate holds for some element
    pub fn some<F>(&self, predicate: F) -> JsResult<bool>
    where
        F: FnMut(&ElementValue, usize) -> JsResult<bool>,
    {
        Ok(self.find_entry(0..self.validate()?, predicate)?.is_some())
    }

    fn find_entry<I, F>(&self, indices: I, mut predicate: F) -> JsResult<Option<(usize, ElementValue)>>
    where
        I: Iterator<Item = usize>,
        F: FnMut(&ElementValue, usize) -> JsResult<bool>,
    {
        for i in indices {
            let Some(value) = self.get(i)? else {
                continue;
            };
            if predicate(&value, i)? {
                return Ok(Some((i, value)));
            }
        }
        Ok(None)
    }

    /// Find an element that satisfies a predicate
    pub fn find<F>(&self, predicate: F) -> JsResult<Option<ElementValue>>
    where
        F: FnMut(&ElementValue, usize) -> JsResult<bool>,
    {
        let len = self.validate()?;
        Ok(self.find_entry(0..len, predicate)?.map(|(_, v)| v))
    }

    pub fn find_index<F>(&self, predicate: F) -> JsResult<Option<usize>>
    where
        F: FnMut(&ElementValue, usize) -> JsResult<bool>,
    {
        let len = self.validate()?;
        Ok(self.find_entry(0..len, predicate)?.map(|(i, _)| i))
    }

    /// Find the last element that satisfies a predicate
    pub fn find_last<F>(&self, predicate: F) -> JsResult<Option<ElementValue>>
    where
        F: FnMut(&ElementValue, usize) -> JsResult<bool>,
    {
        let len = self.validate()?;
        Ok(self.find_entry((0..len).rev(), predicate)?.map(|(_, v)| v))
    }

    pub fn find_last_index<F>(&self, predicate: F) -> JsResult<Option<usize>>
    where
        F: FnMut(&ElementValue, usize) -> JsResult<bool>,
    {
        let len = self.validate()?;
        Ok(self.find_entry((0..len).rev(), predicate)?.map(|(i, _)| i))
    }

    /// Copy of the array in reverse order
    pub fn to_reversed(&self) -> JsResult<TypedArray> {
        let mut values = self.to_vec()?;
        values.reverse();
        TypedArray::from_values(self.kind, values)
    }

    /// Sorted copy of the array, default order
    pub fn to_sorted(&self) -> JsResult<TypedArray> {
        self.to_sorted_by(ElementValue::compare_default)
    }

    /// Sorted copy of the array, by comparator
    pub fn to_sorted_by<F>(&self, compare: F) -> JsResult<TypedArray>
    where
        F: FnMut(&ElementValue, &ElementValue) -> Ordering,
    {
        TypedArray::from_values(self.kind, merge_sort(self.to_vec()?, compare))
    }

    /// Copy of the array with one element replaced
    ///
    /// # Errors
    ///
    /// `RangeError` if the relative `index` is out of range.
    pub fn with(&self, index: i64, value: impl Into<ElementValue>) -> JsResult<TypedArray> {
        let len = self.validate()?;
        let value = value.into();
        encode(self.kind, &value, STORAGE_LITTLE_ENDIAN)?;
        let k = if index < 0 { len as i64 + index } else { index };
        if k < 0 || k as u64 >= len as u64 {
            return Err(JsError::range_error(format!("Invalid typed array index: {}", index)));
        }
        let copy = self.slice(0, None)?;
        copy.write(k as usize, &value)?;
        Ok(copy)
    }

    /// Iterate over indices
    pub fn keys(&self) -> Keys {
        Keys::new(self.clone())
    }

    /// Iterate over element values
    pub fn values(&self) -> Values {
        Values::new(self.clone())
    }

    /// Iterate over `(index, value)` pairs
    pub fn entries(&self) -> Entries {
        Entries::new(self.clone())
    }
}

/// Stable bottom-up merge sort.
///
/// The comparator may be inconsistent (not a total order); the result is
/// then some permutation of `values`, never a panic.
fn merge_sort<F>(values: Vec<ElementValue>, mut compare: F) -> Vec<ElementValue>
where
    F: FnMut(&ElementValue, &ElementValue) -> Ordering,
{
    let len = values.len();
    let mut order: Vec<usize> = (0..len).collect();
    let mut merged = vec![0usize; len];
    let mut width = 1;
    while width < len {
        for start in (0..len).step_by(2 * width) {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut left, mut right) = (start, mid);
            for slot in &mut merged[start..end] {
                let take_right = right < end
                    && (left >= mid || compare(&values[order[right]], &values[order[left]]) == Ordering::Less);
                if take_right {
                    *slot = order[right];
                    right += 1;
                } else {
                    *slot = order[left];
                    left += 1;
                }
            }
        }
        std::mem::swap(&mut order, &mut merged);
        width *= 2;
    }

    let mut slots: Vec<Option<ElementValue>> = values.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}
