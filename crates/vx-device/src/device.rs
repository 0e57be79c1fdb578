use std::fmt;
use std::time::Duration;

use crate::error::Result;

/// Longest interval a client will block waiting for the device to finish.
///
/// Passed to [`Device::ready_wait`] by callers that have no tighter bound of
/// their own. Exceeding it is a fatal error; there is no cancellation.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// An address in device memory.
///
/// Addresses are opaque to the host: they are produced by
/// [`Device::mem_alloc`] (or fixed by the kernel ABI) and handed back to the
/// copy and free entry points unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceAddr(u64);

impl DeviceAddr {
    pub const fn new(raw: u64) -> Self {
        DeviceAddr(raw)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeviceAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Kind of device memory to allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemKind {
    /// Device DRAM, visible to every core (`VX_MEM_TYPE_GLOBAL`).
    Global,
    /// Core-local scratch memory (`VX_MEM_TYPE_LOCAL`).
    Local,
}

/// Capability interface over an accelerator runtime.
///
/// The runtime itself (allocator, kernel loader, scheduler) lives behind
/// this trait; the test harness drives it without naming a concrete
/// binding. Opening a device maps to an implementation's constructor and
/// closing to its `Drop`. All operations are synchronous and every nonzero
/// runtime status surfaces as [`DeviceError::Api`] carrying the failing
/// call's name and code.
///
/// [`DeviceError::Api`]: crate::error::DeviceError::Api
pub trait Device {
    /// Returns the name of this backend (e.g. "vortex", "mock").
    fn name(&self) -> &str;

    /// Upload a compiled kernel image to the device.
    fn upload_kernel(&mut self, image: &[u8]) -> Result<()>;

    /// Allocate `size` bytes of device memory of the given kind.
    fn mem_alloc(&mut self, size: u64, kind: MemKind) -> Result<DeviceAddr>;

    /// Release a buffer previously returned by [`Device::mem_alloc`].
    fn mem_free(&mut self, addr: DeviceAddr) -> Result<()>;

    /// Copy `data` from the host into device memory at `dst`.
    fn copy_to_dev(&mut self, dst: DeviceAddr, data: &[u8]) -> Result<()>;

    /// Copy `data.len()` bytes of device memory at `src` back to the host.
    ///
    /// The host destination comes first, matching the C entry point's
    /// argument order.
    fn copy_from_dev(&mut self, data: &mut [u8], src: DeviceAddr) -> Result<()>;

    /// Begin executing the uploaded kernel.
    fn start(&mut self) -> Result<()>;

    /// Block until the device is idle again, or until `timeout` elapses.
    fn ready_wait(&mut self, timeout: Duration) -> Result<()>;
}
