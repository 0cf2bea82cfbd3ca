//! Contract tests for DataView

use binary_data::{ArrayBuffer, BufferSource, DataView, ElementType, ElementValue};
use num_bigint::BigInt;

#[test]
fn contract_data_view_constructor() {
    let buf = ArrayBuffer::new(16).unwrap();
    let view = DataView::new(&buf, None, None).unwrap();
    assert_eq!(view.byte_offset(), 0);
    assert_eq!(view.byte_length(), 16);
}

#[test]
fn contract_data_view_with_offset() {
    let buf = ArrayBuffer::new(16).unwrap();
    let view = DataView::new(&buf, Some(4), Some(8)).unwrap();
    assert_eq!(view.byte_offset(), 4);
    assert_eq!(view.byte_length(), 8);
}

#[test]
fn contract_data_view_invalid_window() {
    let buf = ArrayBuffer::new(16).unwrap();
    assert!(DataView::new(&buf, Some(17), None).unwrap_err().is_range_error());
    assert!(DataView::new(&buf, Some(8), Some(9)).unwrap_err().is_range_error());
}

#[test]
fn contract_data_view_default_big_endian() {
    let buf = ArrayBuffer::new(4).unwrap();
    let view = DataView::new(&buf, None, None).unwrap();
    view.set_uint32(0, 0x01020304 as f64, false).unwrap();
    assert_eq!(buf.get_bytes(0, 4).unwrap(), vec![1, 2, 3, 4]);
    view.set_uint32(0, 0x01020304 as f64, true).unwrap();
    assert_eq!(buf.get_bytes(0, 4).unwrap(), vec![4, 3, 2, 1]);
}

#[test]
fn contract_data_view_int8_wraps() {
    let buf = ArrayBuffer::new(1).unwrap();
    let view = DataView::new(&buf, None, None).unwrap();
    view.set_int8(0, 255.0).unwrap();
    assert_eq!(view.get_int8(0).unwrap(), -1);
    view.set_int8(0, 128.0).unwrap();
    assert_eq!(view.get_int8(0).unwrap(), -128);
}

#[test]
fn contract_data_view_float_bit_patterns() {
    let buf = ArrayBuffer::new(8).unwrap();
    let view = DataView::new(&buf, None, None).unwrap();

    view.set_float64(0, -0.0, false).unwrap();
    assert_eq!(buf.get_bytes(0, 8).unwrap(), vec![0x80, 0, 0, 0, 0, 0, 0, 0]);

    view.set_float32(0, f64::INFINITY, false).unwrap();
    assert_eq!(buf.get_bytes(0, 4).unwrap(), vec![0x7F, 0x80, 0, 0]);
    assert_eq!(view.get_float32(0, false).unwrap(), f32::INFINITY);

    view.set_float64(0, f64::NAN, true).unwrap();
    assert!(view.get_float64(0, true).unwrap().is_nan());
}

#[test]
fn contract_data_view_bigint_wraps() {
    let buf = ArrayBuffer::new(8).unwrap();
    let view = DataView::new(&buf, None, None).unwrap();
    let too_big = (BigInt::from(1) << 64usize) + BigInt::from(5);
    view.set_big_uint64(0, &too_big, false).unwrap();
    assert_eq!(view.get_big_uint64(0, false).unwrap(), BigInt::from(5));
    view.set_big_int64(0, &BigInt::from(u64::MAX), false).unwrap();
    assert_eq!(view.get_big_int64(0, false).unwrap(), BigInt::from(-1));
}

#[test]
fn contract_data_view_detached_before_bounds() {
    let buf = ArrayBuffer::new(4).unwrap();
    let view = DataView::new(&buf, None, None).unwrap();
    buf.detach();
    // out of range too, but detachment wins
    assert!(view.get_uint32(100, false).unwrap_err().is_type_error());
    assert_eq!(view.byte_length(), 4);
    assert!(view.buffer().as_array_buffer().unwrap().detached());
}

#[test]
fn contract_data_view_out_of_range() {
    let buf = ArrayBuffer::new(4).unwrap();
    let view = DataView::new(&buf, None, None).unwrap();
    assert!(view.get_float64(0, false).unwrap_err().is_range_error());
    assert!(view.set_int16(3, 1.0, false).unwrap_err().is_range_error());
}

#[test]
fn contract_data_view_generic_accessors() {
    let buf = ArrayBuffer::new(8).unwrap();
    let view = DataView::new(&buf, None, None).unwrap();
    for ty in ElementType::ALL {
        let value = if ty.is_bigint() {
            ElementValue::BigInt(BigInt::from(7))
        } else {
            ElementValue::Number(7.0)
        };
        view.set_value(ty, 0, &value, true).unwrap();
        assert_eq!(view.get_value(ty, 0, true).unwrap(), value, "{}", ty);
    }
}
