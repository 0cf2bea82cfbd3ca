//! Heap set and memory accounting.
//!
//! The heap is an arena of [`HeapObject`]s indexed by id. It owns every
//! object until the collector sweeps it, and keeps a running total of the
//! bytes accounted to live objects against a fixed budget.

use std::collections::HashMap;

use crate::object::{HeapObject, ObjectRef, Trace};

/// Default heap budget (64MB)
pub const DEFAULT_HEAP_SIZE: usize = 64 * 1024 * 1024;

/// Collector configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcConfig {
    /// Total bytes the heap may account to live objects
    pub heap_size_bytes: usize,
}

impl GcConfig {
    /// Returns a copy of this configuration with a different heap budget.
    pub fn with_heap_size(mut self, heap_size_bytes: usize) -> Self {
        self.heap_size_bytes = heap_size_bytes;
        self
    }
}

impl Default for GcConfig {
    fn default() -> Self {
        GcConfig {
            heap_size_bytes: DEFAULT_HEAP_SIZE,
        }
    }
}

/// The set of objects currently owned by the collector.
#[derive(Debug)]
pub struct Heap<T> {
    /// Live objects keyed by id
    objects: HashMap<ObjectRef, HeapObject<T>>,
    /// Next id to hand out; ids are never reused
    next_id: u64,
    /// Bytes accounted to objects in `objects`
    used_bytes: usize,
    /// Budget from the configuration
    capacity: usize,
}

impl<T: Trace> Heap<T> {
    /// Creates an empty heap with the given byte budget.
    pub fn new(capacity: usize) -> Self {
        Heap {
            objects: HashMap::new(),
            next_id: 1,
            used_bytes: 0,
            capacity,
        }
    }

    /// Returns true if `size` more bytes fit in the budget.
    pub fn fits(&self, size: usize) -> bool {
        self.used_bytes
            .checked_add(size)
            .is_some_and(|total| total <= self.capacity)
    }

    /// Inserts a new object and accounts its bytes.
    ///
    /// The caller must have checked [`Heap::fits`] first.
    pub(crate) fn insert(&mut self, size: usize, payload: T) -> ObjectRef {
        let id = ObjectRef::from_raw(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, HeapObject::new(id, size, payload));
        self.used_bytes += size;
        id
    }

    /// Removes an object and returns the bytes it accounted for.
    pub(crate) fn remove(&mut self, id: ObjectRef) -> Option<usize> {
        let obj = self.objects.remove(&id)?;
        self.used_bytes -= obj.size();
        Some(obj.size())
    }

    /// Returns the object named by `id`, if it is still in the heap.
    pub fn get(&self, id: ObjectRef) -> Option<&HeapObject<T>> {
        self.objects.get(&id)
    }

    /// Returns the object named by `id` for mutation.
    pub fn get_mut(&mut self, id: ObjectRef) -> Option<&mut HeapObject<T>> {
        self.objects.get_mut(&id)
    }

    /// Returns true if `id` names an object still in the heap.
    pub fn contains(&self, id: ObjectRef) -> bool {
        self.objects.contains_key(&id)
    }

    /// Clears every mark bit.
    pub(crate) fn clear_marks(&mut self) {
        for obj in self.objects.values_mut() {
            obj.marked = false;
        }
    }

    /// Returns the ids of every unmarked object.
    pub(crate) fn unmarked(&self) -> Vec<ObjectRef> {
        self.objects
            .values()
            .filter(|obj| !obj.marked)
            .map(HeapObject::id)
            .collect()
    }

    /// Iterates over all objects in the heap (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &HeapObject<T>> {
        self.objects.values()
    }

    /// Returns the number of objects in the heap.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the heap holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns the bytes accounted to live objects.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Returns the heap budget in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
