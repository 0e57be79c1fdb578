//! Per-element comparison of downloaded results against the reference.

use tracing::warn;

use crate::element::Element;
use crate::error::{Result, VerifyError};

/// Tally from one verification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOutcome {
    /// Elements compared.
    pub checked: usize,
    /// Elements that failed tolerant equality.
    pub errors: usize,
}

impl VerifyOutcome {
    pub fn passed(&self) -> bool {
        self.errors == 0
    }
}

/// Compare `actual` against `expected` element by element.
///
/// Every mismatch is logged with its index and both bit patterns. The scan
/// never stops early, so the tally covers the whole buffer.
pub fn verify_results<T: Element>(actual: &[T], expected: &[T]) -> Result<VerifyOutcome> {
    if actual.len() != expected.len() {
        return Err(VerifyError::LengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    let mut errors = 0;
    for (i, (&cur, &want)) in actual.iter().zip(expected.iter()).enumerate() {
        if !T::almost_equal(cur, want) {
            warn!(
                "error at result #{i}: actual 0x{:x}, expected 0x{:x}",
                cur.bits(),
                want.bits()
            );
            errors += 1;
        }
    }
    Ok(VerifyOutcome {
        checked: actual.len(),
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_all_equal_passes() {
        let data = vec![1, 2, 3, 4];
        let outcome = verify_results::<i32>(&data, &data).unwrap();
        assert_eq!(outcome.checked, 4);
        assert_eq!(outcome.errors, 0);
        assert!(outcome.passed());
    }

    #[test]
    fn test_verify_counts_every_mismatch() {
        let actual = vec![1, 0, 3, 0];
        let expected = vec![1, 2, 3, 4];
        let outcome = verify_results::<i32>(&actual, &expected).unwrap();
        assert_eq!(outcome.checked, 4);
        assert_eq!(outcome.errors, 2);
        assert!(!outcome.passed());
    }

    #[test]
    fn test_verify_float_uses_ulp_tolerance() {
        let expected = vec![8.0f32, 16.0];
        let nudged = vec![
            f32::from_bits(8.0f32.to_bits() + 3),
            f32::from_bits(16.0f32.to_bits() - 6),
        ];
        let outcome = verify_results::<f32>(&nudged, &expected).unwrap();
        assert_eq!(outcome.errors, 0);

        let corrupt = vec![f32::from_bits(8.0f32.to_bits() + 7), 16.0];
        let outcome = verify_results::<f32>(&corrupt, &expected).unwrap();
        assert_eq!(outcome.errors, 1);
    }

    #[test]
    fn test_verify_rejects_length_mismatch() {
        let actual = vec![1, 2, 3];
        let expected = vec![1, 2, 3, 4];
        assert!(matches!(
            verify_results::<i32>(&actual, &expected),
            Err(VerifyError::LengthMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_verify_empty_passes() {
        let outcome = verify_results::<i32>(&[], &[]).unwrap();
        assert_eq!(outcome.checked, 0);
        assert!(outcome.passed());
    }
}
