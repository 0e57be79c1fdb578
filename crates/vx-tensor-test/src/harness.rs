//! The linear test procedure.
//!
//! One run is a strictly ordered sequence: upload the kernel, allocate the
//! three device buffers, publish the argument block, stage and upload the
//! inputs, execute, download the output and verify it against the CPU
//! reference. Every runtime call is checked; the first failure aborts the
//! sequence and every buffer acquired so far is released exactly once.

use std::cmp;
use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use vx_device::{Device, DeviceAddr, MemKind, MAX_TIMEOUT};
use vx_verify::{matrix_multiply, verify_results, DType, Element, VerifyOutcome};

use crate::error::{Result, TestError};
use crate::kernel_args::{KernelArgs, KERNEL_ARG_DEV_ADDR};
use crate::staging::StagingBuffer;

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub size: u32,
    pub seed: u64,
}

/// The three device buffers a run owns.
///
/// Addresses are taken out when released, so every path frees each buffer
/// at most once and error paths free exactly what was acquired.
#[derive(Debug, Default)]
struct BufferSet {
    a: Option<DeviceAddr>,
    b: Option<DeviceAddr>,
    c: Option<DeviceAddr>,
}

impl BufferSet {
    fn release(&mut self, device: &mut dyn Device) {
        for addr in [self.a.take(), self.b.take(), self.c.take()]
            .into_iter()
            .flatten()
        {
            if let Err(e) = device.mem_free(addr) {
                warn!("failed to free {addr}: {e}");
            }
        }
    }
}

/// Map the compiled kernel image into memory.
pub fn load_kernel(path: &Path) -> Result<Mmap> {
    let open_err = |source| TestError::KernelImage {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(open_err)?;
    // SAFETY: the mapping is read-only and only lives until the upload;
    // nothing truncates the file while it is mapped.
    let image = unsafe { Mmap::map(&file) }.map_err(open_err)?;
    Ok(image)
}

/// Deterministic inputs: uniform samples scaled by the matrix dimension.
pub fn generate_inputs<T: Element>(size: u32, seed: u64) -> (Vec<T>, Vec<T>) {
    let n = size as usize;
    let num_points = n * n;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut src_a = Vec::with_capacity(num_points);
    let mut src_b = Vec::with_capacity(num_points);
    for _ in 0..num_points {
        let a: f32 = rng.gen();
        let b: f32 = rng.gen();
        src_a.push(T::from_sample(a * size as f32));
        src_b.push(T::from_sample(b * size as f32));
    }
    (src_a, src_b)
}

/// Run the whole procedure for the element type picked at the command
/// line.
pub fn run(
    device: &mut dyn Device,
    kernel: &[u8],
    dtype: DType,
    config: &RunConfig,
) -> Result<VerifyOutcome> {
    match dtype {
        DType::I32 => run_test::<i32>(device, kernel, config),
        DType::F32 => run_test::<f32>(device, kernel, config),
    }
}

/// Run the whole procedure over one element type.
///
/// Returns the verification tally. Runtime failures surface as errors, but
/// only after every acquired buffer has been released.
pub fn run_test<T: Element>(
    device: &mut dyn Device,
    kernel: &[u8],
    config: &RunConfig,
) -> Result<VerifyOutcome> {
    let mut buffers = BufferSet::default();
    let result = execute::<T>(device, kernel, config, &mut buffers);
    info!("cleanup");
    buffers.release(device);
    result
}

fn execute<T: Element>(
    device: &mut dyn Device,
    kernel: &[u8],
    config: &RunConfig,
    buffers: &mut BufferSet,
) -> Result<VerifyOutcome> {
    let size = config.size;
    if size == 0 {
        return Err(TestError::InvalidSize);
    }
    let n = size as usize;
    let num_points = n * n;
    let buf_size = num_points * T::WIRE_SIZE;

    info!("data type: {}", T::NAME);
    info!("matrix size: {size}x{size}");
    info!("buffer size: {buf_size} bytes");

    info!("upload program");
    device.upload_kernel(kernel)?;

    info!("allocate device memory");
    let a_addr = device.mem_alloc(buf_size as u64, MemKind::Global)?;
    buffers.a = Some(a_addr);
    let b_addr = device.mem_alloc(buf_size as u64, MemKind::Global)?;
    buffers.b = Some(b_addr);
    let c_addr = device.mem_alloc(buf_size as u64, MemKind::Global)?;
    buffers.c = Some(c_addr);

    let args = KernelArgs {
        a_addr,
        b_addr,
        c_addr,
        size,
        num_tasks: num_points as u32,
    };
    info!("dev_src0={a_addr}");
    info!("dev_src1={b_addr}");
    info!("dev_dst={c_addr}");

    info!("allocate staging buffer");
    let mut staging = StagingBuffer::new(cmp::max(buf_size, KernelArgs::PACKED_LEN));

    info!("upload kernel argument");
    let packed = args.pack();
    device.copy_to_dev(KERNEL_ARG_DEV_ADDR, staging.pack_bytes(&packed))?;

    let (src_a, src_b) = generate_inputs::<T>(size, config.seed);
    let refs = matrix_multiply(&src_a, &src_b, size)?;

    info!("upload source buffer0");
    device.copy_to_dev(a_addr, staging.pack_elements(&src_a))?;

    info!("upload source buffer1");
    device.copy_to_dev(b_addr, staging.pack_elements(&src_b))?;

    info!("clear destination buffer");
    device.copy_to_dev(c_addr, staging.zeroed(buf_size))?;

    info!("start device");
    device.start()?;

    info!("wait for completion");
    device.ready_wait(MAX_TIMEOUT)?;

    info!("download destination buffer");
    device.copy_from_dev(staging.recv(buf_size), c_addr)?;

    info!("verify result");
    let actual: Vec<T> = staging.unpack_elements(num_points);
    Ok(verify_results(&actual, &refs)?)
}
