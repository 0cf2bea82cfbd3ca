//! Element types and the generic element codec.
//!
//! The 11 element types differ only in byte width and conversion rule, so
//! each one is described by an [`ElementDescriptor`] and a single
//! encode/decode pair serves both `DataView` and `TypedArray`.

use std::cmp::Ordering;
use std::fmt;

use core_types::{JsError, JsResult};
use num_bigint::BigInt;

use crate::conversions::{bigint_to_u64_bits, number_to_string, to_integer_bits, to_uint8_clamp};

/// How a value is reduced to an element's bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Number modulo 2^bits
    Wrap,
    /// Number clamped to [0, 255], ties to even
    Clamp,
    /// IEEE-754 binary32/binary64
    Float,
    /// BigInt modulo 2^64
    BigWrap,
}

/// Byte width, signedness and conversion rule of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementDescriptor {
    /// Bytes per element
    pub width: usize,
    /// Whether the stored bits are read back as two's complement
    pub signed: bool,
    /// Conversion applied on write
    pub conversion: Conversion,
}

/// TypedArray element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    Uint8,
    /// 8-bit unsigned integer (clamped)
    Uint8Clamped,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    Uint16,
    /// 32-bit signed integer
    Int32,
    /// 32-bit unsigned integer
    Uint32,
    /// 32-bit floating point
    Float32,
    /// 64-bit floating point
    Float64,
    /// 64-bit signed BigInt
    BigInt64,
    /// 64-bit unsigned BigInt
    BigUint64,
}

impl ElementType {
    /// Every element type, in constructor order.
    pub const ALL: [ElementType; 11] = [
        ElementType::Int8,
        ElementType::Uint8,
        ElementType::Uint8Clamped,
        ElementType::Int16,
        ElementType::Uint16,
        ElementType::Int32,
        ElementType::Uint32,
        ElementType::Float32,
        ElementType::Float64,
        ElementType::BigInt64,
        ElementType::BigUint64,
    ];

    /// Returns the width, signedness and conversion rule of this type.
    pub const fn descriptor(self) -> ElementDescriptor {
        use Conversion::*;
        let (width, signed, conversion) = match self {
            ElementType::Int8 => (1, true, Wrap),
            ElementType::Uint8 => (1, false, Wrap),
            ElementType::Uint8Clamped => (1, false, Clamp),
            ElementType::Int16 => (2, true, Wrap),
            ElementType::Uint16 => (2, false, Wrap),
            ElementType::Int32 => (4, true, Wrap),
            ElementType::Uint32 => (4, false, Wrap),
            ElementType::Float32 => (4, true, Float),
            ElementType::Float64 => (8, true, Float),
            ElementType::BigInt64 => (8, true, BigWrap),
            ElementType::BigUint64 => (8, false, BigWrap),
        };
        ElementDescriptor {
            width,
            signed,
            conversion,
        }
    }

    /// Get the byte size of each element for this kind
    pub const fn bytes_per_element(self) -> usize {
        self.descriptor().width
    }

    /// Returns true for the BigInt64/BigUint64 content type.
    pub const fn is_bigint(self) -> bool {
        matches!(self.descriptor().conversion, Conversion::BigWrap)
    }

    /// Get the constructor name of this TypedArray kind
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Int8 => "Int8Array",
            ElementType::Uint8 => "Uint8Array",
            ElementType::Uint8Clamped => "Uint8ClampedArray",
            ElementType::Int16 => "Int16Array",
            ElementType::Uint16 => "Uint16Array",
            ElementType::Int32 => "Int32Array",
            ElementType::Uint32 => "Uint32Array",
            ElementType::Float32 => "Float32Array",
            ElementType::Float64 => "Float64Array",
            ElementType::BigInt64 => "BigInt64Array",
            ElementType::BigUint64 => "BigUint64Array",
        }
    }

    /// Returns the value a freshly zeroed element reads back as.
    pub fn zero(self) -> ElementValue {
        if self.is_bigint() {
            ElementValue::BigInt(BigInt::from(0))
        } else {
            ElementValue::Number(0.0)
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value read from or written to an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    /// Regular number value
    Number(f64),
    /// BigInt value
    BigInt(BigInt),
}

impl ElementValue {
    /// Returns the Number, or None for a BigInt.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ElementValue::Number(n) => Some(*n),
            ElementValue::BigInt(_) => None,
        }
    }

    /// Returns the BigInt, or None for a Number.
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            ElementValue::Number(_) => None,
            ElementValue::BigInt(b) => Some(b),
        }
    }

    /// Returns true for a BigInt.
    pub fn is_bigint(&self) -> bool {
        matches!(self, ElementValue::BigInt(_))
    }

    /// Strict equality (`===`): NaN is never equal to itself.
    pub fn strict_equals(&self, other: &ElementValue) -> bool {
        match (self, other) {
            (ElementValue::Number(a), ElementValue::Number(b)) => a == b,
            (ElementValue::BigInt(a), ElementValue::BigInt(b)) => a == b,
            _ => false,
        }
    }

    /// SameValueZero: like strict equality, but NaN equals NaN.
    pub fn same_value_zero(&self, other: &ElementValue) -> bool {
        match (self, other) {
            (ElementValue::Number(a), ElementValue::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }

    /// Default TypedArray sort order: ascending, -0 before +0, NaN last.
    pub fn compare_default(&self, other: &ElementValue) -> Ordering {
        match (self, other) {
            (ElementValue::Number(a), ElementValue::Number(b)) => match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ if a < b => Ordering::Less,
                _ if a > b => Ordering::Greater,
                _ => match (a.is_sign_negative(), b.is_sign_negative()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => Ordering::Equal,
                },
            },
            (ElementValue::BigInt(a), ElementValue::BigInt(b)) => a.cmp(b),
            (ElementValue::Number(_), ElementValue::BigInt(_)) => Ordering::Less,
            (ElementValue::BigInt(_), ElementValue::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for ElementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementValue::Number(n) => f.write_str(&number_to_string(*n)),
            ElementValue::BigInt(b) => write!(f, "{}", b),
        }
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ElementValue {
                fn from(n: $t) -> Self {
                    ElementValue::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i8, u8, i16, u16, i32, u32);

impl From<BigInt> for ElementValue {
    fn from(b: BigInt) -> Self {
        ElementValue::BigInt(b)
    }
}

/// Converts `value` to the bytes of one `ty` element.
///
/// # Errors
///
/// `TypeError` when a Number is written to a BigInt type or vice versa.
pub fn encode(ty: ElementType, value: &ElementValue, little_endian: bool) -> JsResult<Vec<u8>> {
    let d = ty.descriptor();
    let raw = match (d.conversion, value) {
        (Conversion::BigWrap, ElementValue::BigInt(b)) => bigint_to_u64_bits(b),
        (Conversion::BigWrap, ElementValue::Number(n)) => {
            return Err(JsError::type_error(format!(
                "Cannot convert {} to a BigInt",
                number_to_string(*n)
            )));
        }
        (_, ElementValue::BigInt(_)) => {
            return Err(JsError::type_error("Cannot convert a BigInt value to a number"));
        }
        (Conversion::Wrap, ElementValue::Number(n)) => to_integer_bits(*n, (d.width * 8) as u32),
        (Conversion::Clamp, ElementValue::Number(n)) => to_uint8_clamp(*n) as u64,
        (Conversion::Float, ElementValue::Number(n)) if d.width == 4 => (*n as f32).to_bits() as u64,
        (Conversion::Float, ElementValue::Number(n)) => n.to_bits(),
    };

    let mut bytes = raw.to_le_bytes()[..d.width].to_vec();
    if !little_endian {
        bytes.reverse();
    }
    Ok(bytes)
}

/// Reads one `ty` element from `bytes`, which must be exactly one element wide.
pub fn decode(ty: ElementType, bytes: &[u8], little_endian: bool) -> ElementValue {
    let d = ty.descriptor();
    debug_assert_eq!(bytes.len(), d.width);

    let mut le = [0u8; 8];
    le[..d.width].copy_from_slice(bytes);
    if !little_endian {
        le[..d.width].reverse();
    }
    let raw = u64::from_le_bytes(le);

    match d.conversion {
        Conversion::Float if d.width == 4 => ElementValue::Number(f32::from_bits(raw as u32) as f64),
        Conversion::Float => ElementValue::Number(f64::from_bits(raw)),
        Conversion::BigWrap if d.signed => ElementValue::BigInt(BigInt::from(raw as i64)),
        Conversion::BigWrap => ElementValue::BigInt(BigInt::from(raw)),
        Conversion::Wrap | Conversion::Clamp if d.signed => {
            let shift = 64 - (d.width as u32 * 8);
            ElementValue::Number((((raw << shift) as i64) >> shift) as f64)
        }
        Conversion::Wrap | Conversion::Clamp => ElementValue::Number(raw as f64),
    }
}
