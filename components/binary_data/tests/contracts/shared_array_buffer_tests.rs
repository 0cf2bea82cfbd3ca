//! Contract tests for GrowableSharedArrayBuffer

use binary_data::{BufferSource, GrowableSharedArrayBuffer, ViewedBuffer};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn contract_shared_buffer_is_send_sync() {
    assert_send_sync::<GrowableSharedArrayBuffer>();
}

#[test]
fn contract_shared_buffer_constructor() {
    let buf = GrowableSharedArrayBuffer::new(8, 64).unwrap();
    assert_eq!(buf.byte_length(), 8);
    assert_eq!(buf.max_byte_length(), 64);
    assert!(buf.growable());
}

#[test]
fn contract_shared_buffer_grow() {
    let buf = GrowableSharedArrayBuffer::new(8, 64).unwrap();
    buf.grow(64).unwrap();
    assert_eq!(buf.byte_length(), 64);
    assert_eq!(buf.get_bytes(60, 4).unwrap(), vec![0; 4]);
}

#[test]
fn contract_shared_buffer_shrink_rejected() {
    let buf = GrowableSharedArrayBuffer::new(8, 64).unwrap();
    assert!(buf.grow(7).unwrap_err().is_type_error());
    assert_eq!(buf.byte_length(), 8);
}

#[test]
fn contract_shared_buffer_grow_beyond_max() {
    let buf = GrowableSharedArrayBuffer::new(8, 64).unwrap();
    assert!(buf.grow(65).unwrap_err().is_range_error());
}

#[test]
fn contract_shared_buffer_never_detached() {
    let buf: ViewedBuffer = GrowableSharedArrayBuffer::new(8, 8).unwrap().into();
    assert!(!buf.is_detached());
}

#[test]
fn contract_shared_buffer_concurrent_growth_is_monotonic() {
    let buf = GrowableSharedArrayBuffer::new(0, 4096).unwrap();
    crossbeam::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|_| {
                for len in (0..=4096).step_by(16) {
                    let _ = buf.grow(len);
                }
            });
        }
        s.spawn(|_| {
            let mut last = 0;
            for _ in 0..1000 {
                let now = buf.byte_length();
                assert!(now >= last);
                last = now;
            }
        });
    })
    .unwrap();
    assert_eq!(buf.byte_length(), 4096);
}
