//! Scriptable in-memory device double.
//!
//! `MockDevice` implements the [`Device`] trait without any hardware: it
//! keeps device memory as a map of byte regions and lets a test script what
//! "execution" does through an `on_start` hook. It executes no kernels and
//! models no scheduler; the behavior under test always lives in the test
//! itself. Failure injection and a call journal make error paths and
//! resource-safety properties checkable.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::device::{Device, DeviceAddr, MemKind};
use crate::error::{DeviceError, Result};

/// First address handed out by the mock allocator.
const HEAP_BASE: u64 = 0x1000_0000;

/// Allocation alignment in bytes.
const ALIGN: u64 = 64;

/// Device memory as the mock models it: disjoint byte regions keyed by
/// their start address.
#[derive(Debug, Default)]
pub struct DeviceMemory {
    regions: BTreeMap<u64, Vec<u8>>,
}

impl DeviceMemory {
    /// Read `len` bytes starting at `addr`.
    ///
    /// Returns `None` unless `addr` is the start of a region holding at
    /// least `len` bytes.
    pub fn read(&self, addr: DeviceAddr, len: usize) -> Option<Vec<u8>> {
        let region = self.regions.get(&addr.as_u64())?;
        if region.len() < len {
            return None;
        }
        Some(region[..len].to_vec())
    }

    /// Write `data` at `addr`, creating the region if it does not exist and
    /// growing it if it is shorter than `data`.
    pub fn write(&mut self, addr: DeviceAddr, data: &[u8]) {
        let region = self.regions.entry(addr.as_u64()).or_default();
        if region.len() < data.len() {
            region.resize(data.len(), 0);
        }
        region[..data.len()].copy_from_slice(data);
    }

    fn insert(&mut self, addr: u64, bytes: Vec<u8>) {
        self.regions.insert(addr, bytes);
    }

    fn remove(&mut self, addr: u64) -> Option<Vec<u8>> {
        self.regions.remove(&addr)
    }
}

struct FailPoint {
    call: &'static str,
    remaining: usize,
    code: i32,
}

/// In-memory implementation of [`Device`] for testing clients of the
/// capability interface.
#[derive(Default)]
pub struct MockDevice {
    memory: DeviceMemory,
    /// Live allocations: start address -> requested size.
    allocated: BTreeMap<u64, u64>,
    next_addr: u64,
    kernel: Option<Vec<u8>>,
    started: bool,
    freed: Vec<DeviceAddr>,
    calls: Vec<&'static str>,
    failure: Option<FailPoint>,
    on_start: Option<Box<dyn FnMut(&mut DeviceMemory)>>,
}

impl MockDevice {
    pub fn new() -> Self {
        MockDevice {
            next_addr: HEAP_BASE,
            ..MockDevice::default()
        }
    }

    /// Install a hook that runs when [`Device::start`] is called, with full
    /// access to the mock's memory. Tests use this to stand in for whatever
    /// the kernel would have written.
    pub fn set_on_start(&mut self, hook: impl FnMut(&mut DeviceMemory) + 'static) {
        self.on_start = Some(Box::new(hook));
    }

    /// Make the `nth` (0-based) future occurrence of `call` fail with
    /// `code`. Only one failure can be scripted at a time; it is consumed
    /// when it fires.
    pub fn fail_call(&mut self, call: &'static str, nth: usize, code: i32) {
        self.failure = Some(FailPoint {
            call,
            remaining: nth,
            code,
        });
    }

    /// Every entry point hit so far, in order.
    pub fn calls(&self) -> &[&'static str] {
        &self.calls
    }

    /// Every successfully freed buffer, in order.
    pub fn freed(&self) -> &[DeviceAddr] {
        &self.freed
    }

    /// Number of allocations that have not been freed.
    pub fn live_allocations(&self) -> usize {
        self.allocated.len()
    }

    /// The most recently uploaded kernel image, if any.
    pub fn kernel(&self) -> Option<&[u8]> {
        self.kernel.as_deref()
    }

    /// Whether execution was started.
    pub fn started(&self) -> bool {
        self.started
    }

    /// Post-mortem view of device memory.
    pub fn memory(&self) -> &DeviceMemory {
        &self.memory
    }

    /// Journal the call and fire a scripted failure if one matches.
    fn touch(&mut self, call: &'static str) -> Result<()> {
        self.calls.push(call);
        if let Some(fp) = self.failure.as_mut() {
            if fp.call == call {
                if fp.remaining == 0 {
                    let code = fp.code;
                    self.failure = None;
                    return Err(DeviceError::Api { call, code });
                }
                fp.remaining -= 1;
            }
        }
        Ok(())
    }
}

impl Device for MockDevice {
    fn name(&self) -> &str {
        "mock"
    }

    fn upload_kernel(&mut self, image: &[u8]) -> Result<()> {
        self.touch("upload_kernel")?;
        self.kernel = Some(image.to_vec());
        Ok(())
    }

    fn mem_alloc(&mut self, size: u64, _kind: MemKind) -> Result<DeviceAddr> {
        self.touch("mem_alloc")?;
        if size == 0 {
            return Err(DeviceError::InvalidArg("zero-size allocation".into()));
        }
        let addr = self.next_addr;
        self.next_addr += (size + ALIGN - 1) & !(ALIGN - 1);
        self.memory.insert(addr, vec![0; size as usize]);
        self.allocated.insert(addr, size);
        Ok(DeviceAddr::new(addr))
    }

    fn mem_free(&mut self, addr: DeviceAddr) -> Result<()> {
        self.touch("mem_free")?;
        if self.allocated.remove(&addr.as_u64()).is_none() {
            return Err(DeviceError::Fault {
                addr,
                reason: "free of unallocated or already-freed region".into(),
            });
        }
        self.memory.remove(addr.as_u64());
        self.freed.push(addr);
        Ok(())
    }

    fn copy_to_dev(&mut self, dst: DeviceAddr, data: &[u8]) -> Result<()> {
        self.touch("copy_to_dev")?;
        if let Some(&size) = self.allocated.get(&dst.as_u64()) {
            if data.len() as u64 > size {
                return Err(DeviceError::Fault {
                    addr: dst,
                    reason: format!("copy of {} bytes overruns {size}-byte allocation", data.len()),
                });
            }
        }
        // Writes outside any allocation create an ad-hoc region; this is how
        // the fixed kernel-argument address is populated.
        self.memory.write(dst, data);
        Ok(())
    }

    fn copy_from_dev(&mut self, data: &mut [u8], src: DeviceAddr) -> Result<()> {
        self.touch("copy_from_dev")?;
        match self.memory.read(src, data.len()) {
            Some(bytes) => {
                data.copy_from_slice(&bytes);
                Ok(())
            }
            None => Err(DeviceError::Fault {
                addr: src,
                reason: format!("read of {} bytes from unmapped region", data.len()),
            }),
        }
    }

    fn start(&mut self) -> Result<()> {
        self.touch("start")?;
        self.started = true;
        if let Some(hook) = self.on_start.as_mut() {
            hook(&mut self.memory);
        }
        Ok(())
    }

    fn ready_wait(&mut self, _timeout: Duration) -> Result<()> {
        self.touch("ready_wait")
    }
}
