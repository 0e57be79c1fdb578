//! CPU reference for the kernel under test.

use crate::element::Element;
use crate::error::{Result, VerifyError};

/// Multiply two square row-major matrices on the host.
///
/// Classic triple loop with one accumulator per output cell, matching the
/// per-task computation the kernel performs.
pub fn matrix_multiply<T: Element>(a: &[T], b: &[T], size: u32) -> Result<Vec<T>> {
    let n = size as usize;
    let points = n * n;
    if a.len() != points {
        return Err(VerifyError::BadMatrixLen {
            size,
            expected: points,
            actual: a.len(),
        });
    }
    if b.len() != points {
        return Err(VerifyError::BadMatrixLen {
            size,
            expected: points,
            actual: b.len(),
        });
    }

    let mut out = vec![T::default(); points];
    for row in 0..n {
        for col in 0..n {
            let mut acc = T::default();
            for e in 0..n {
                acc = T::mul_acc(acc, a[row * n + e], b[e * n + col]);
            }
            out[row * n + col] = acc;
        }
    }
    Ok(out)
}
