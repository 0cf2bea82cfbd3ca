//! Contract tests verifying the memory_manager API.
//! These tests ensure all exported types and functions exist with correct signatures.

use core_types::ErrorKind;
use memory_manager::{
    CollectionStats, GarbageCollector, GcConfig, HeapObject, ObjectRef, Trace, DEFAULT_HEAP_SIZE,
};

/// A user-defined graph node, the way interpreter objects plug in.
#[derive(Debug, Default)]
struct Node {
    name: String,
    edges: Vec<ObjectRef>,
}

impl Trace for Node {
    fn get_references(&self) -> Vec<ObjectRef> {
        self.edges.clone()
    }
}

/// Test GarbageCollector contract: new(heap_size_bytes) -> Self
#[test]
fn contract_gc_new() {
    let gc: GarbageCollector = GarbageCollector::new(4096);
    assert_eq!(gc.heap_size_bytes(), 4096);
    assert_eq!(gc.used_bytes(), 0);
    assert_eq!(gc.object_count(), 0);
}

/// Test GarbageCollector contract: with_config(GcConfig) -> Self
#[test]
fn contract_gc_with_config() {
    let gc: GarbageCollector = GarbageCollector::with_config(GcConfig::default());
    assert_eq!(gc.heap_size_bytes(), DEFAULT_HEAP_SIZE);
    assert_eq!(gc.config().heap_size_bytes, DEFAULT_HEAP_SIZE);
}

/// Test GarbageCollector contract: allocate(size) -> JsResult<ObjectRef>
#[test]
fn contract_gc_allocate() {
    let mut gc: GarbageCollector = GarbageCollector::new(4096);
    let obj = gc.allocate(64).unwrap();
    let heap_obj: &HeapObject<Vec<ObjectRef>> = gc.get(obj).unwrap();
    assert_eq!(heap_obj.id(), obj);
    assert_eq!(heap_obj.size(), 64);
}

/// Test allocate error taxonomy: ValueError then MemoryError
#[test]
fn contract_gc_allocate_errors() {
    let mut gc: GarbageCollector = GarbageCollector::new(16);
    assert_eq!(gc.allocate(-5).unwrap_err().kind, ErrorKind::ValueError);
    assert_eq!(gc.allocate(17).unwrap_err().kind, ErrorKind::MemoryError);
}

/// Test allocate_with(size, payload) and get_references()
#[test]
fn contract_gc_allocate_with_payload() {
    let mut gc: GarbageCollector<Node> = GarbageCollector::new(4096);
    let leaf = gc.allocate(8).unwrap();
    let parent = gc
        .allocate_with(
            16,
            Node {
                name: "parent".to_string(),
                edges: vec![leaf],
            },
        )
        .unwrap();

    let obj = gc.get(parent).unwrap();
    assert_eq!(obj.payload().name, "parent");
    assert_eq!(obj.get_references(), vec![leaf]);
}

/// Test collect() -> CollectionStats
#[test]
fn contract_gc_collect() {
    let mut gc: GarbageCollector = GarbageCollector::new(4096);
    gc.allocate(8).unwrap();
    let stats: CollectionStats = gc.collect();
    assert_eq!(stats.objects_before, 1);
    assert_eq!(stats.objects_after, 0);
    assert_eq!(stats.bytes_freed, 8);
    assert_eq!(stats.objects_freed(), 1);
}

/// Test add_root / remove_root
#[test]
fn contract_gc_roots() {
    let mut gc: GarbageCollector<Node> = GarbageCollector::new(4096);
    let obj = gc.allocate(8).unwrap();
    gc.add_root(obj);
    assert!(gc.is_root(obj));
    assert_eq!(gc.collect().objects_after, 1);

    gc.remove_root(obj);
    gc.remove_root(obj);
    assert!(!gc.is_root(obj));
    assert_eq!(gc.collect().objects_after, 0);
    assert!(gc.get(obj).is_none());
}

/// Test payload mutation through get_mut keeps new edges alive
#[test]
fn contract_gc_get_mut_edges() {
    let mut gc: GarbageCollector<Node> = GarbageCollector::new(4096);
    let root = gc.allocate(8).unwrap();
    let child = gc.allocate(8).unwrap();
    gc.add_root(root);
    gc.get_mut(root).unwrap().payload_mut().edges.push(child);

    gc.collect();
    assert!(gc.contains(child));

    gc.get_mut(root).unwrap().payload_mut().edges.clear();
    gc.collect();
    assert!(!gc.contains(child));
}
