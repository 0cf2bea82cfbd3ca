//! Iterators returned by `TypedArray::keys`, `values` and `entries`.
//!
//! Each step re-validates the array, so an iterator notices a buffer that
//! was detached (or shrunk) after it was created. It yields that error once
//! and then ends.

use core_types::JsResult;

use crate::element::ElementValue;
use crate::typed_array::TypedArray;

#[derive(Debug, Clone)]
struct Cursor {
    array: TypedArray,
    next: usize,
    done: bool,
}

impl Cursor {
    fn new(array: TypedArray) -> Self {
        Cursor {
            array,
            next: 0,
            done: false,
        }
    }

    fn advance(&mut self) -> Option<JsResult<usize>> {
        if self.done {
            return None;
        }
        match self.array.validate() {
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
            Ok(len) if self.next >= len => {
                self.done = true;
                None
            }
            Ok(_) => {
                let index = self.next;
                self.next += 1;
                Some(Ok(index))
            }
        }
    }
}

/// Iterator over the indices of a TypedArray.
#[derive(Debug, Clone)]
pub struct Keys {
    cursor: Cursor,
}

impl Keys {
    pub(crate) fn new(array: TypedArray) -> Self {
        Keys {
            cursor: Cursor::new(array),
        }
    }
}

impl Iterator for Keys {
    type Item = JsResult<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance()
    }
}

/// Iterator over the element values of a TypedArray.
#[derive(Debug, Clone)]
pub struct Values {
    cursor: Cursor,
}

impl Values {
    pub(crate) fn new(array: TypedArray) -> Self {
        Values {
            cursor: Cursor::new(array),
        }
    }
}

impl Iterator for Values {
    type Item = JsResult<ElementValue>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor.advance()?;
        Some(index.and_then(|i| self.cursor.array.read(i)))
    }
}

/// Iterator over `(index, value)` pairs of a TypedArray.
#[derive(Debug, Clone)]
pub struct Entries {
    cursor: Cursor,
}

impl Entries {
    pub(crate) fn new(array: TypedArray) -> Self {
        Entries {
            cursor: Cursor::new(array),
        }
    }
}

impl Iterator for Entries {
    type Item = JsResult<(usize, ElementValue)>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor.advance()?;
        Some(index.and_then(|i| Ok((i, self.cursor.array.read(i)?))))
    }
}
