//! Mark-and-sweep garbage collector.
//!
//! The collector owns the heap set and an explicit root set:
//! - Allocation accounts bytes against a fixed budget
//! - When a request does not fit, one full collection runs before giving up
//! - Marking walks the object graph from the roots with an explicit worklist,
//!   so reference cycles and very deep chains are handled without recursion
//! - Sweeping drops every object the mark phase did not reach

use std::collections::HashSet;
use std::time::Instant;

use core_types::{JsError, JsResult};

use crate::heap::{GcConfig, Heap};
use crate::object::{HeapObject, ObjectRef, Trace};

/// Result of a single collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionStats {
    /// Objects in the heap when the collection started
    pub objects_before: usize,
    /// Objects left after sweeping
    pub objects_after: usize,
    /// Bytes released by the sweep
    pub bytes_freed: usize,
    /// Wall-clock time spent collecting, in milliseconds
    pub duration_ms: f64,
}

impl CollectionStats {
    /// Returns the number of objects the sweep removed.
    pub fn objects_freed(&self) -> usize {
        self.objects_before - self.objects_after
    }
}

/// Cumulative statistics over the collector's lifetime.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GcStats {
    /// Number of collections performed
    pub collections: usize,
    /// Number of successful allocations
    pub allocations: usize,
    /// Objects reclaimed across all collections
    pub total_objects_freed: usize,
    /// Bytes reclaimed across all collections
    pub total_bytes_freed: usize,
}

/// Stop-the-world mark-sweep collector rooted at an explicit root set.
///
/// # Example
///
/// ```
/// use memory_manager::{GarbageCollector, ObjectRef};
///
/// let mut gc: GarbageCollector = GarbageCollector::new(1024);
/// let a = gc.allocate(16).unwrap();
/// let b = gc.allocate(16).unwrap();
/// gc.get_mut(a).unwrap().payload_mut().push(b);
/// gc.add_root(a);
///
/// let stats = gc.collect();
/// assert_eq!(stats.objects_after, 2);
///
/// gc.remove_root(a);
/// let stats = gc.collect();
/// assert_eq!(stats.objects_after, 0);
/// assert_eq!(stats.bytes_freed, 32);
/// ```
#[derive(Debug)]
pub struct GarbageCollector<T: Trace = Vec<ObjectRef>> {
    /// Objects owned by the collector
    heap: Heap<T>,
    /// Handles that keep objects reachable
    roots: HashSet<ObjectRef>,
    /// Configuration the collector was built with
    config: GcConfig,
    /// Cumulative statistics
    stats: GcStats,
}

impl<T: Trace> GarbageCollector<T> {
    /// Creates a collector with the given heap budget in bytes.
    pub fn new(heap_size_bytes: usize) -> Self {
        Self::with_config(GcConfig::default().with_heap_size(heap_size_bytes))
    }

    /// Creates a collector from a full configuration.
    pub fn with_config(config: GcConfig) -> Self {
        GarbageCollector {
            heap: Heap::new(config.heap_size_bytes),
            roots: HashSet::new(),
            config,
            stats: GcStats::default(),
        }
    }

    /// Allocates an object with a default payload.
    ///
    /// # Errors
    ///
    /// `ValueError` if `size` is negative, `MemoryError` if the request does
    /// not fit even after a full collection.
    pub fn allocate(&mut self, size: i64) -> JsResult<ObjectRef>
    where
        T: Default,
    {
        self.allocate_with(size, T::default())
    }

    /// Allocates an object carrying `payload`.
    ///
    /// # Arguments
    ///
    /// * `size` - Number of bytes to account to the object
    /// * `payload` - The object's contents, including its outgoing references
    ///
    /// # Returns
    ///
    /// A handle to the new object. The object is not rooted.
    pub fn allocate_with(&mut self, size: i64, payload: T) -> JsResult<ObjectRef> {
        if size < 0 {
            return Err(JsError::value_error(format!(
                "Allocation size must be non-negative, got {}",
                size
            )));
        }
        let size = usize::try_from(size)
            .map_err(|_| JsError::memory_error(format!("Allocation of {} bytes is too large", size)))?;

        if !self.heap.fits(size) {
            tracing::debug!(
                requested = size,
                used = self.heap.used_bytes(),
                capacity = self.heap.capacity(),
                "heap budget exceeded, collecting before allocation"
            );
            self.collect();
            if !self.heap.fits(size) {
                tracing::warn!(
                    requested = size,
                    used = self.heap.used_bytes(),
                    capacity = self.heap.capacity(),
                    "allocation failed after collection"
                );
                return Err(JsError::memory_error(format!(
                    "Heap exhausted: requested {} bytes with {} of {} bytes in use",
                    size,
                    self.heap.used_bytes(),
                    self.heap.capacity()
                )));
            }
        }

        self.stats.allocations += 1;
        Ok(self.heap.insert(size, payload))
    }

    /// Adds `obj` to the root set. Adding an existing root is a no-op.
    pub fn add_root(&mut self, obj: ObjectRef) {
        if self.roots.insert(obj) {
            tracing::trace!(root = %obj, "root added");
        }
    }

    /// Removes `obj` from the root set. Removing an absent root is a no-op.
    pub fn remove_root(&mut self, obj: ObjectRef) {
        if self.roots.remove(&obj) {
            tracing::trace!(root = %obj, "root removed");
        }
    }

    /// Returns true if `obj` is in the root set.
    pub fn is_root(&self, obj: ObjectRef) -> bool {
        self.roots.contains(&obj)
    }

    /// Returns the number of roots.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Runs a full mark-sweep collection.
    ///
    /// 1. Clear all mark bits
    /// 2. Mark everything reachable from the roots
    /// 3. Sweep every unmarked object and release its bytes
    pub fn collect(&mut self) -> CollectionStats {
        let start = Instant::now();
        let objects_before = self.heap.len();

        self.heap.clear_marks();
        self.mark();
        let bytes_freed = self.sweep();
        self.prune_roots();

        let stats = CollectionStats {
            objects_before,
            objects_after: self.heap.len(),
            bytes_freed,
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
        };

        self.stats.collections += 1;
        self.stats.total_objects_freed += stats.objects_freed();
        self.stats.total_bytes_freed += bytes_freed;

        tracing::debug!(
            objects_before = stats.objects_before,
            objects_after = stats.objects_after,
            bytes_freed = stats.bytes_freed,
            duration_ms = stats.duration_ms,
            "collection finished"
        );
        stats
    }

    /// Marks every object reachable from the root set.
    ///
    /// Each object is marked exactly once; references to ids no longer in
    /// the heap are skipped.
    fn mark(&mut self) {
        let mut worklist: Vec<ObjectRef> = self.roots.iter().copied().collect();

        while let Some(id) = worklist.pop() {
            let Some(obj) = self.heap.get_mut(id) else {
                continue;
            };
            if obj.marked {
                continue;
            }
            obj.marked = true;

            for child in obj.get_references() {
                if self.heap.get(child).is_some_and(|c| !c.marked) {
                    worklist.push(child);
                }
            }
        }
    }

    /// Removes every unmarked object and returns the bytes released.
    fn sweep(&mut self) -> usize {
        self.heap
            .unmarked()
            .into_iter()
            .filter_map(|id| self.heap.remove(id))
            .sum()
    }

    /// Drops roots naming ids that are not in the heap. Ids are never reused,
    /// so such a root can no longer keep anything alive.
    fn prune_roots(&mut self) {
        let before = self.roots.len();
        let heap = &self.heap;
        self.roots.retain(|&root| heap.contains(root));
        let pruned = before - self.roots.len();
        if pruned > 0 {
            tracing::trace!(pruned, "dropped dangling roots");
        }
    }

    /// Returns the object named by `obj`, if it has not been collected.
    pub fn get(&self, obj: ObjectRef) -> Option<&HeapObject<T>> {
        self.heap.get(obj)
    }

    /// Returns the object named by `obj` for mutation.
    pub fn get_mut(&mut self, obj: ObjectRef) -> Option<&mut HeapObject<T>> {
        self.heap.get_mut(obj)
    }

    /// Returns true if `obj` has not been collected.
    pub fn contains(&self, obj: ObjectRef) -> bool {
        self.heap.contains(obj)
    }

    /// Returns the number of objects in the heap.
    pub fn object_count(&self) -> usize {
        self.heap.len()
    }

    /// Returns the bytes accounted to objects in the heap.
    pub fn used_bytes(&self) -> usize {
        self.heap.used_bytes()
    }

    /// Returns the heap budget in bytes.
    pub fn heap_size_bytes(&self) -> usize {
        self.heap.capacity()
    }

    /// Returns the bytes still available before a collection is needed.
    pub fn free_bytes(&self) -> usize {
        self.heap.capacity() - self.heap.used_bytes()
    }

    /// Returns the configuration this collector was built with.
    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    /// Returns cumulative statistics.
    pub fn stats(&self) -> &GcStats {
        &self.stats
    }
}

impl<T: Trace> Default for GarbageCollector<T> {
    fn default() -> Self {
        Self::with_config(GcConfig::default())
    }
}
