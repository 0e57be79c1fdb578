//! Element types matrices are generated, packed and compared over.

use std::fmt::{Debug, Display};

use tracing::warn;

use crate::ulp::{ulp_distance, FLOAT_ULP_TOLERANCE};

/// One matrix element: a fixed-width little-endian wire format, the
/// multiply-accumulate used by the reference product, and tolerant equality
/// against a downloaded result.
pub trait Element: Copy + Default + Debug + Display + PartialEq + 'static {
    /// Width of one encoded element in bytes.
    const WIRE_SIZE: usize;

    /// Type name printed in the run banner.
    const NAME: &'static str;

    /// Encode `self` little-endian into the first [`Self::WIRE_SIZE`]
    /// bytes of `out`.
    fn write_le(self, out: &mut [u8]);

    /// Decode one element from at least [`Self::WIRE_SIZE`] bytes.
    fn read_le(bytes: &[u8]) -> Self;

    /// Raw bit pattern, for hex mismatch reports.
    fn bits(self) -> u32;

    /// Narrow a scaled uniform sample into an element.
    fn from_sample(v: f32) -> Self;

    /// `acc + a * b` with the wraparound the device ALU uses.
    fn mul_acc(acc: Self, a: Self, b: Self) -> Self;

    /// Whether a computed value matches its reference.
    fn almost_equal(actual: Self, expected: Self) -> bool;
}

/// Encode `values` little-endian into the front of `out`.
///
/// Panics if `out` is shorter than the encoded length.
pub fn encode_slice<T: Element>(values: &[T], out: &mut [u8]) {
    let len = values.len() * T::WIRE_SIZE;
    for (chunk, &v) in out[..len].chunks_exact_mut(T::WIRE_SIZE).zip(values) {
        v.write_le(chunk);
    }
}

/// Decode `count` elements from the front of `bytes`.
///
/// Panics if `bytes` is shorter than the encoded length.
pub fn decode_slice<T: Element>(bytes: &[u8], count: usize) -> Vec<T> {
    bytes[..count * T::WIRE_SIZE]
        .chunks_exact(T::WIRE_SIZE)
        .map(T::read_le)
        .collect()
}

impl Element for i32 {
    const WIRE_SIZE: usize = 4;
    const NAME: &'static str = "integer";

    fn write_le(self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[..4]);
        i32::from_le_bytes(raw)
    }

    fn bits(self) -> u32 {
        self as u32
    }

    fn from_sample(v: f32) -> Self {
        v as i32
    }

    fn mul_acc(acc: Self, a: Self, b: Self) -> Self {
        acc.wrapping_add(a.wrapping_mul(b))
    }

    fn almost_equal(actual: Self, expected: Self) -> bool {
        actual == expected
    }
}

impl Element for f32 {
    const WIRE_SIZE: usize = 4;
    const NAME: &'static str = "float";

    fn write_le(self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[..4]);
        f32::from_le_bytes(raw)
    }

    fn bits(self) -> u32 {
        self.to_bits()
    }

    fn from_sample(v: f32) -> Self {
        v
    }

    fn mul_acc(acc: Self, a: Self, b: Self) -> Self {
        acc + a * b
    }

    fn almost_equal(actual: Self, expected: Self) -> bool {
        let d = ulp_distance(actual, expected);
        if d > FLOAT_ULP_TOLERANCE {
            warn!(
                "*** almost_equal_ulp: a={actual}, b={expected}, ulp={d}, ia={:x}, ib={:x}",
                actual.to_bits(),
                expected.to_bits()
            );
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i32_le_roundtrip() {
        let mut buf = [0u8; 8];
        (-2i32).write_le(&mut buf);
        0x0102_0304i32.write_le(&mut buf[4..]);
        assert_eq!(buf, [0xfe, 0xff, 0xff, 0xff, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(i32::read_le(&buf), -2);
        assert_eq!(i32::read_le(&buf[4..]), 0x0102_0304);
    }

    #[test]
    fn test_f32_le_roundtrip() {
        let mut buf = [0u8; 4];
        1.5f32.write_le(&mut buf);
        assert_eq!(buf, 1.5f32.to_le_bytes());
        assert_eq!(f32::read_le(&buf), 1.5);
    }

    #[test]
    fn test_i32_from_sample_truncates() {
        assert_eq!(i32::from_sample(3.9), 3);
        assert_eq!(i32::from_sample(0.0), 0);
    }

    #[test]
    fn test_i32_mul_acc_wraps() {
        let acc = i32::mul_acc(1, i32::MAX, 2);
        assert_eq!(acc, 1i32.wrapping_add(i32::MAX.wrapping_mul(2)));
    }

    #[test]
    fn test_i32_equality_is_exact() {
        assert!(i32::almost_equal(7, 7));
        assert!(!i32::almost_equal(7, 8));
    }

    #[test]
    fn test_f32_equality_within_tolerance() {
        let a = 100.0f32;
        let inside = f32::from_bits(a.to_bits() + FLOAT_ULP_TOLERANCE as u32);
        let outside = f32::from_bits(a.to_bits() + FLOAT_ULP_TOLERANCE as u32 + 1);
        assert!(f32::almost_equal(a, a));
        assert!(f32::almost_equal(inside, a));
        assert!(!f32::almost_equal(outside, a));
    }

    #[test]
    fn test_bits_views() {
        assert_eq!((-1i32).bits(), 0xffff_ffff);
        assert_eq!(1.0f32.bits(), 0x3f80_0000);
    }

    #[test]
    fn test_slice_codec_roundtrip() {
        let values = [3i32, -9, 0, i32::MAX];
        let mut wire = [0u8; 16];
        encode_slice(&values, &mut wire);
        assert_eq!(decode_slice::<i32>(&wire, 4), values);

        let floats = [0.5f32, -19.0];
        let mut wire = [0u8; 8];
        encode_slice(&floats, &mut wire);
        assert_eq!(decode_slice::<f32>(&wire, 2), floats);
    }
}
