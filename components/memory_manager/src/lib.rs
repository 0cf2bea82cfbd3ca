//! Memory Manager - Garbage collector and heap management
//!
//! This component provides:
//! - A heap set of [`HeapObject`]s with byte accounting against a fixed budget
//! - Stop-the-world mark-and-sweep collection rooted at an explicit root set
//! - The [`Trace`] capability other components implement so their objects
//!   can be traversed
//!
//! Other components obtain GC-managed memory only through
//! [`GarbageCollector::allocate`] and [`GarbageCollector::allocate_with`].

pub mod gc;
pub mod heap;
pub mod object;

// Re-export main types
pub use gc::{CollectionStats, GarbageCollector, GcStats};
pub use heap::{GcConfig, Heap, DEFAULT_HEAP_SIZE};
pub use object::{HeapObject, ObjectRef, Trace};
