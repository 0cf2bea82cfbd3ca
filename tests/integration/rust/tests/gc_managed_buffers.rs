//! Garbage collector and binary data integration tests
//!
//! Heap objects hold buffer handles and references to each other; the
//! collector decides which of them survive.

use binary_data::{ArrayBuffer, BufferSource, ElementType, TypedArray};
use core_types::ErrorKind;
use memory_manager::{GarbageCollector, ObjectRef, Trace};

/// Payload of a script object in these tests.
#[derive(Debug)]
enum Payload {
    /// An ArrayBuffer owned by the object
    Buffer(ArrayBuffer),
    /// A plain object with outgoing references
    Object(Vec<ObjectRef>),
}

impl Trace for Payload {
    fn get_references(&self) -> Vec<ObjectRef> {
        match self {
            Payload::Buffer(_) => Vec::new(),
            Payload::Object(edges) => edges.clone(),
        }
    }
}

fn allocate_buffer(gc: &mut GarbageCollector<Payload>, len: usize) -> ObjectRef {
    let buffer = ArrayBuffer::new(len).unwrap();
    gc.allocate_with(len as i64, Payload::Buffer(buffer)).unwrap()
}

fn buffer_of(gc: &GarbageCollector<Payload>, obj: ObjectRef) -> ArrayBuffer {
    match gc.get(obj).unwrap().payload() {
        Payload::Buffer(buffer) => buffer.clone(),
        Payload::Object(_) => panic!("{} is not a buffer", obj),
    }
}

/// Test: a buffer reachable from a root survives and keeps its bytes
#[test]
fn test_rooted_buffer_survives() {
    let mut gc = GarbageCollector::new(1024);
    let buf = allocate_buffer(&mut gc, 16);
    let holder = gc.allocate_with(32, Payload::Object(vec![buf])).unwrap();
    gc.add_root(holder);

    let arr = TypedArray::from_buffer(buffer_of(&gc, buf), ElementType::Uint8, None, None).unwrap();
    arr.fill(9.0, None, None).unwrap();

    let stats = gc.collect();
    assert_eq!(stats.objects_freed(), 0);
    assert_eq!(buffer_of(&gc, buf).get_bytes(0, 16).unwrap(), vec![9; 16]);
}

/// Test: an unreachable cycle holding a buffer is reclaimed
#[test]
fn test_unreachable_cycle_with_buffer_is_reclaimed() {
    let mut gc = GarbageCollector::new(1024);
    let buf = allocate_buffer(&mut gc, 64);
    let a = gc.allocate_with(16, Payload::Object(vec![buf])).unwrap();
    let b = gc.allocate_with(16, Payload::Object(vec![a])).unwrap();
    if let Payload::Object(edges) = gc.get_mut(a).unwrap().payload_mut() {
        edges.push(b);
    }

    let stats = gc.collect();
    assert_eq!(stats.objects_freed(), 3);
    assert_eq!(stats.bytes_freed, 96);
    assert_eq!(gc.used_bytes(), 0);
    assert!(!gc.contains(buf));
}

/// Test: a handle kept outside the heap outlives the collected object
#[test]
fn test_buffer_handle_outlives_heap_object() {
    let mut gc = GarbageCollector::new(1024);
    let buf = allocate_buffer(&mut gc, 8);
    let handle = buffer_of(&gc, buf);
    gc.collect();
    assert!(!gc.contains(buf));
    handle.set_bytes(0, &[1]).unwrap();
    assert_eq!(handle.get_bytes(0, 1).unwrap(), vec![1]);
}

/// Test: allocation pressure collects garbage buffers before failing
#[test]
fn test_allocation_pressure_collects_buffers() {
    let mut gc = GarbageCollector::new(256);
    let keep = allocate_buffer(&mut gc, 128);
    gc.add_root(keep);
    for _ in 0..10 {
        allocate_buffer(&mut gc, 128);
    }
    assert_eq!(gc.object_count(), 2);
    assert!(gc.stats().collections >= 9);

    let err = gc
        .allocate_with(200, Payload::Object(Vec::new()))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::MemoryError);
    assert!(gc.contains(keep));
}

/// Test: unrooting releases the whole graph on the next collection
#[test]
fn test_remove_root_releases_graph() {
    let mut gc = GarbageCollector::new(4096);
    let buffers: Vec<ObjectRef> = (0..4).map(|_| allocate_buffer(&mut gc, 32)).collect();
    let root = gc.allocate_with(8, Payload::Object(buffers.clone())).unwrap();
    gc.add_root(root);

    assert_eq!(gc.collect().objects_freed(), 0);
    gc.remove_root(root);
    let stats = gc.collect();
    assert_eq!(stats.objects_freed(), 5);
    assert_eq!(stats.objects_after, 0);
    assert!(buffers.iter().all(|b| !gc.contains(*b)));
}
