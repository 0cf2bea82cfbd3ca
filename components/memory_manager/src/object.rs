//! Heap object representation
//!
//! A [`HeapObject`] is the minimal allocation unit tracked by the collector:
//! a size for accounting, a mark bit, and a payload that exposes its outgoing
//! references through the [`Trace`] capability.

use std::fmt;

/// Handle naming an object in the heap set.
///
/// An `ObjectRef` is just an id, so it is `Copy` and never owns the object.
/// Holding one does not keep the object alive; only the root set does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(u64);

impl ObjectRef {
    /// Creates a handle from a raw heap id.
    pub fn from_raw(id: u64) -> Self {
        ObjectRef(id)
    }

    /// Returns the raw heap id.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability every graph node exposes so the collector can traverse it.
///
/// This is the whole contract between the collector and the rest of the
/// runtime: arrays, objects and closures report the heap objects they point
/// at, and the collector does the rest.
pub trait Trace {
    /// Returns every heap object directly referenced by this payload.
    fn get_references(&self) -> Vec<ObjectRef>;
}

impl Trace for () {
    fn get_references(&self) -> Vec<ObjectRef> {
        Vec::new()
    }
}

impl Trace for String {
    fn get_references(&self) -> Vec<ObjectRef> {
        Vec::new()
    }
}

/// A slot list: the payload of array-like and object-like nodes.
impl Trace for Vec<ObjectRef> {
    fn get_references(&self) -> Vec<ObjectRef> {
        self.clone()
    }
}

impl<T: Trace> Trace for Option<T> {
    fn get_references(&self) -> Vec<ObjectRef> {
        self.as_ref().map(Trace::get_references).unwrap_or_default()
    }
}

/// A garbage-collected object.
///
/// Exclusively owned by the heap set until swept.
#[derive(Debug, Clone)]
pub struct HeapObject<T> {
    id: ObjectRef,
    size: usize,
    pub(crate) marked: bool,
    payload: T,
}

impl<T: Trace> HeapObject<T> {
    pub(crate) fn new(id: ObjectRef, size: usize, payload: T) -> Self {
        HeapObject {
            id,
            size,
            marked: false,
            payload,
        }
    }

    /// Returns the handle naming this object.
    pub fn id(&self) -> ObjectRef {
        self.id
    }

    /// Returns the number of bytes accounted to this object.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns whether the last mark phase reached this object.
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Returns the payload.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Returns the payload for mutation (e.g. storing a new reference).
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    /// Returns every heap object directly referenced by this object.
    pub fn get_references(&self) -> Vec<ObjectRef> {
        self.payload.get_references()
    }
}
