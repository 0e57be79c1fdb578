use thiserror::Error;

use vx_device::DeviceError;
use vx_verify::VerifyError;

/// Errors a test run can fail with.
#[derive(Error, Debug)]
pub enum TestError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error("kernel image '{path}': {source}")]
    KernelImage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("matrix size must be at least 1")]
    InvalidSize,
}

pub type Result<T> = std::result::Result<T, TestError>;
