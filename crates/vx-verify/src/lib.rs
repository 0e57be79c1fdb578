//! Host-side verification for device kernel tests.
//!
//! Provides the pieces a regression harness needs to judge a kernel run:
//! a reference matrix product computed on the CPU ([`matrix_multiply`]),
//! a tolerant comparator (exact for integers, bit-pattern distance for
//! floats) and a full-buffer scan that tallies mismatches
//! ([`verify_results`]). Element behavior is abstracted by the [`Element`]
//! trait so the same harness runs over `i32` and `f32` data.

pub mod dtype;
pub mod element;
pub mod error;
pub mod matmul;
pub mod ulp;
pub mod verify;

pub use dtype::DType;
pub use element::{decode_slice, encode_slice, Element};
pub use error::{Result, VerifyError};
pub use matmul::matrix_multiply;
pub use ulp::{ulp_distance, FLOAT_ULP_TOLERANCE};
pub use verify::{verify_results, VerifyOutcome};
