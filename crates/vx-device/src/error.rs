use thiserror::Error;

use crate::device::DeviceAddr;

#[derive(Error, Debug)]
pub enum DeviceError {
    /// A runtime entry point returned a nonzero status code.
    #[error("'{call}' returned {code}")]
    Api { call: &'static str, code: i32 },
    /// The binary was built without a native device backend.
    #[error("no device backend compiled in (rebuild with the `vortex` feature)")]
    Unavailable,
    /// An access touched device memory that is not mapped, or a region was
    /// released more than once.
    #[error("device fault at {addr}: {reason}")]
    Fault { addr: DeviceAddr, reason: String },
    #[error("invalid device argument: {0}")]
    InvalidArg(String),
}

pub type Result<T> = std::result::Result<T, DeviceError>;
