//! # vkplan - plan-side bookkeeping for VkFFT-style GPU FFTs
//!
//! Everything a GPU FFT wrapper has to work out on the host before and after
//! handing a buffer to the transform engine. No transform is computed here.
//!
//! ## Features
//!
//! - **Axis canonicalization**: any array shape and axis selection mapped onto
//!   the engine's fixed `(nx, ny, nz, nbatch)` layout with per-axis skip flags
//! - **Plan validation**: C2C, R2C and DCT 1-4 parameter checks with typed errors
//! - **Normalization scales**: forward/inverse factors for norm `0`, `1` and
//!   `"ortho"`, at the plan's native precision (f16, f32 or f64)
//! - **Result diagnostics**: the full VkFFT result-code catalogue and
//!   human-readable error messages carrying plan context
//! - **Accuracy sweeps**: size filters and tolerances for systematic testing
//!
//! ## Cargo Features
//!
//! - `std` (default): `std::error::Error` impls and environment-driven sweeps
//! - `parallel`: build sweep cases with Rayon
//! - `verbose-logging`: debug logs of every planned layout
//!
//! ## Example
//!
//! ```
//! use vkplan::{forward_scale, inverse_scale, ElementType, PlanParams};
//!
//! let config = PlanParams::new()
//!     .axes(&[-1, -3])
//!     .build(&[10, 16, 32], ElementType::C64)
//!     .unwrap();
//! assert_eq!(config.shape(), [32, 16, 10, 1]);
//! assert_eq!(config.skip(), [false, true, false]);
//!
//! let f = forward_scale(&config).to_f64();
//! let i = inverse_scale(&config).to_f64();
//! assert!((f * i - 1.0).abs() < 1e-6);
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Shape canonicalization onto the engine's 4D layout.
pub mod axes;
/// Transform parameters and the validated plan configuration.
pub mod config;
pub mod error;
/// Radix classification of transform lengths.
pub mod primes;
pub mod result;
/// Normalization scale factors.
pub mod scale;
/// Accuracy sweep descriptions.
pub mod sweep;

pub use axes::{plan_axes, AxisLayout, CANONICAL_RANK, MAX_TRANSFORM_AXES};
pub use config::{
    DctSelect, DctType, ElementType, NormMode, PlanConfig, PlanParams, Precision, TransformKind,
    TuningOptions,
};
pub use error::{ErrorKind, PlanError};
pub use result::{check, decode, EngineError, ErrorContext, ResultCategory, VkFftResult};
pub use scale::{
    forward_scale, forward_scale_for, inverse_scale, inverse_scale_for, is_dct_norm_approximate,
    Scale,
};
pub use sweep::{SizeFilter, SweepCase, SweepConfig};
