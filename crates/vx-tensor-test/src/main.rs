use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use vx_device::Device;
use vx_tensor_test::cli::Options;
use vx_tensor_test::harness::{self, RunConfig};
use vx_tensor_test::Result;
use vx_verify::VerifyOutcome;

/// Exit status for failures of the runtime API; exit(-1) as the OS sees it.
const EXIT_RUNTIME_FAILURE: u8 = 255;

/// Exit status for a completed run with verification mismatches.
const EXIT_VERIFY_FAILURE: u8 = 1;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_target(false)
        .without_time()
        .init();

    let opts = Options::parse();
    match run(&opts) {
        Ok(outcome) if outcome.passed() => {
            info!("PASSED!");
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            warn!("Found {} errors!", outcome.errors);
            warn!("FAILED!");
            ExitCode::from(EXIT_VERIFY_FAILURE)
        }
        Err(e) => {
            error!("Error: {e}!");
            ExitCode::from(EXIT_RUNTIME_FAILURE)
        }
    }
}

fn run(opts: &Options) -> Result<VerifyOutcome> {
    info!("open device connection");
    let mut device = open_device()?;

    let kernel = harness::load_kernel(&opts.kernel)?;
    let config = RunConfig {
        size: opts.size,
        seed: opts.seed,
    };
    harness::run(device.as_mut(), &kernel, opts.dtype, &config)
}

#[cfg(feature = "vortex")]
fn open_device() -> Result<Box<dyn Device>> {
    Ok(Box::new(vx_device::VortexDevice::open()?))
}

#[cfg(not(feature = "vortex"))]
fn open_device() -> Result<Box<dyn Device>> {
    Err(vx_device::DeviceError::Unavailable.into())
}
