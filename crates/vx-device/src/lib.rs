//! Device access for the vx test kit.
//!
//! The [`Device`] trait is the capability interface test harnesses program
//! against: kernel upload, global memory management, host/device copies and
//! execution control. Two implementations live here. [`MockDevice`] is an
//! in-memory double for exercising harness logic without hardware.
//! `VortexDevice` (behind the `vortex` feature) binds the native runtime
//! library.

pub mod device;
pub mod error;
pub mod mock;

#[cfg(feature = "vortex")]
pub mod vortex;

pub use device::{Device, DeviceAddr, MemKind, MAX_TIMEOUT};
pub use error::{DeviceError, Result};
pub use mock::{DeviceMemory, MockDevice};

#[cfg(feature = "vortex")]
pub use vortex::VortexDevice;
