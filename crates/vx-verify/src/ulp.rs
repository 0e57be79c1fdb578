//! Bit-pattern distance between floats.

/// Largest ULP gap still treated as equal by the float comparator.
pub const FLOAT_ULP_TOLERANCE: i64 = 6;

/// Distance between `a` and `b` in units in the last place.
///
/// Both bit patterns are reinterpreted as signed 32-bit integers and
/// widened to 64 bits, so the subtraction is defined even across the sign
/// boundary.
pub fn ulp_distance(a: f32, b: f32) -> i64 {
    let ia = i64::from(a.to_bits() as i32);
    let ib = i64::from(b.to_bits() as i32);
    (ia - ib).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_values_have_zero_distance() {
        assert_eq!(ulp_distance(1.5, 1.5), 0);
        assert_eq!(ulp_distance(0.0, 0.0), 0);
    }

    #[test]
    fn test_adjacent_values_are_one_apart() {
        let a = 1.0f32;
        let b = f32::from_bits(a.to_bits() + 1);
        assert_eq!(ulp_distance(a, b), 1);
        assert_eq!(ulp_distance(b, a), 1);
    }

    #[test]
    fn test_distance_counts_representable_steps() {
        let a = 2.0f32;
        let b = f32::from_bits(a.to_bits() + 7);
        assert_eq!(ulp_distance(a, b), 7);
    }

    #[test]
    fn test_signed_zero_is_far_from_zero() {
        // -0.0 sits at i32::MIN in the signed view, far from +0.0.
        assert!(ulp_distance(0.0, -0.0) > FLOAT_ULP_TOLERANCE);
    }
}
