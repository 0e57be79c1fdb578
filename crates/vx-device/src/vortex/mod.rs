//! Native runtime backend, enabled with the `vortex` feature.
//!
//! Wraps the C runtime library behind the [`Device`] trait. The handle owns
//! the underlying device session and closes it on drop.

use std::os::raw::c_int;
use std::time::Duration;

use crate::device::{Device, DeviceAddr, MemKind};
use crate::error::{DeviceError, Result};

mod sys {
    use std::ffi::c_void;
    use std::os::raw::c_int;

    pub type VxDeviceH = *mut c_void;

    pub const VX_MEM_TYPE_GLOBAL: c_int = 0;
    pub const VX_MEM_TYPE_LOCAL: c_int = 1;

    #[link(name = "vortex")]
    extern "C" {
        pub fn vx_dev_open(hdevice: *mut VxDeviceH) -> c_int;
        pub fn vx_dev_close(hdevice: VxDeviceH) -> c_int;
        pub fn vx_mem_alloc(
            hdevice: VxDeviceH,
            size: u64,
            mem_type: c_int,
            dev_addr: *mut u64,
        ) -> c_int;
        pub fn vx_mem_free(hdevice: VxDeviceH, dev_addr: u64) -> c_int;
        pub fn vx_copy_to_dev(
            hdevice: VxDeviceH,
            dev_addr: u64,
            host_ptr: *const c_void,
            size: u64,
        ) -> c_int;
        pub fn vx_copy_from_dev(
            hdevice: VxDeviceH,
            host_ptr: *mut c_void,
            dev_addr: u64,
            size: u64,
        ) -> c_int;
        pub fn vx_upload_kernel_bytes(
            hdevice: VxDeviceH,
            content: *const c_void,
            size: u64,
        ) -> c_int;
        pub fn vx_start(hdevice: VxDeviceH) -> c_int;
        pub fn vx_ready_wait(hdevice: VxDeviceH, timeout: u64) -> c_int;
    }
}

fn check(call: &'static str, code: c_int) -> Result<()> {
    if code == 0 {
        Ok(())
    } else {
        Err(DeviceError::Api { call, code })
    }
}

fn mem_type(kind: MemKind) -> c_int {
    match kind {
        MemKind::Global => sys::VX_MEM_TYPE_GLOBAL,
        MemKind::Local => sys::VX_MEM_TYPE_LOCAL,
    }
}

/// Open session on a native device.
///
/// Holds a raw handle, so it is deliberately neither `Send` nor `Sync`.
pub struct VortexDevice {
    handle: sys::VxDeviceH,
}

impl VortexDevice {
    /// Open the first available device.
    pub fn open() -> Result<Self> {
        let mut handle: sys::VxDeviceH = std::ptr::null_mut();
        // SAFETY: `handle` is a valid out-pointer for the duration of the
        // call; on failure the runtime leaves it untouched.
        check("vx_dev_open", unsafe { sys::vx_dev_open(&mut handle) })?;
        if handle.is_null() {
            return Err(DeviceError::Api {
                call: "vx_dev_open",
                code: -1,
            });
        }
        Ok(VortexDevice { handle })
    }
}

impl Drop for VortexDevice {
    fn drop(&mut self) {
        // SAFETY: `handle` came from a successful `vx_dev_open` and is
        // closed exactly once. The close status cannot be surfaced here.
        unsafe {
            sys::vx_dev_close(self.handle);
        }
    }
}

impl Device for VortexDevice {
    fn name(&self) -> &str {
        "vortex"
    }

    fn upload_kernel(&mut self, image: &[u8]) -> Result<()> {
        // SAFETY: `image` outlives the call; the runtime copies it into
        // device memory before returning.
        check("vx_upload_kernel_bytes", unsafe {
            sys::vx_upload_kernel_bytes(self.handle, image.as_ptr().cast(), image.len() as u64)
        })
    }

    fn mem_alloc(&mut self, size: u64, kind: MemKind) -> Result<DeviceAddr> {
        let mut dev_addr = 0u64;
        // SAFETY: `dev_addr` is a valid out-pointer for the duration of the
        // call.
        check("vx_mem_alloc", unsafe {
            sys::vx_mem_alloc(self.handle, size, mem_type(kind), &mut dev_addr)
        })?;
        Ok(DeviceAddr::new(dev_addr))
    }

    fn mem_free(&mut self, addr: DeviceAddr) -> Result<()> {
        // SAFETY: the handle is live; the runtime validates the address.
        check("vx_mem_free", unsafe {
            sys::vx_mem_free(self.handle, addr.as_u64())
        })
    }

    fn copy_to_dev(&mut self, dst: DeviceAddr, data: &[u8]) -> Result<()> {
        // SAFETY: `data` is readable for `data.len()` bytes and outlives
        // the call.
        check("vx_copy_to_dev", unsafe {
            sys::vx_copy_to_dev(
                self.handle,
                dst.as_u64(),
                data.as_ptr().cast(),
                data.len() as u64,
            )
        })
    }

    fn copy_from_dev(&mut self, data: &mut [u8], src: DeviceAddr) -> Result<()> {
        // SAFETY: `data` is writable for `data.len()` bytes and outlives
        // the call.
        check("vx_copy_from_dev", unsafe {
            sys::vx_copy_from_dev(
                self.handle,
                data.as_mut_ptr().cast(),
                src.as_u64(),
                data.len() as u64,
            )
        })
    }

    fn start(&mut self) -> Result<()> {
        // SAFETY: the handle is live.
        check("vx_start", unsafe { sys::vx_start(self.handle) })
    }

    fn ready_wait(&mut self, timeout: Duration) -> Result<()> {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        // SAFETY: the handle is live.
        check("vx_ready_wait", unsafe {
            sys::vx_ready_wait(self.handle, millis)
        })
    }
}
