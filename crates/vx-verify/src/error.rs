use thiserror::Error;

/// Errors from reference computation and result checking.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("matrix has {actual} elements, expected {expected} for size {size}")]
    BadMatrixLen {
        size: u32,
        expected: usize,
        actual: usize,
    },

    #[error("result has {actual} elements, reference has {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, VerifyError>;
