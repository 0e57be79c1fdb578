//! Matrix-multiply regression test for the device runtime.
//!
//! The binary uploads a compiled kernel, feeds it two seeded random square
//! matrices through device memory and checks the downloaded product against
//! a CPU reference, tolerantly for floats. Harness logic is written against
//! the `vx-device` capability trait, so the whole procedure is testable
//! against an in-memory device double.

pub mod cli;
pub mod error;
pub mod harness;
pub mod kernel_args;
pub mod staging;

pub use error::{Result, TestError};
