//! losvel — line-of-sight Doppler velocities from spectral-line bisectors.
//!
//! Converts sampled absorption-line intensity profiles (e.g. solar
//! spectroscopy at discrete wavelengths) into LOS velocities with the
//! bisector method. The pipeline has two stages:
//!
//! 1. **Extract** – per-profile bisector table: parabolic line-centre fit,
//!    blue/red wing split, wing midpoints at intensity levels 0.1..0.9 of
//!    the line depth.
//! 2. **Aggregate** – per-pixel extraction over the field of view,
//!    non-finite cleanup, reference wavelength from the field-and-level mean
//!    bisector position, first-order Doppler conversion.
//!
//! Input is a real-valued intensity cube (two spatial axes × one spectral
//! axis) plus a wavelength axis; output is an `(nx, ny, 10)` velocity cube
//! in km/s together with the cleaned bisector positions. A single 1-D
//! profile is handled as a degenerate 1×1 field.
//!
//! Spectral calibration, noise modeling, line identification, file formats
//! and plotting stay outside this crate.

pub mod bisector;
pub mod config;
pub mod polyfit;
pub(crate) mod profile;
pub mod velocity;

#[cfg(test)]
pub(crate) mod test_utils;

pub use bisector::{extract_bisector, Bisector, BisectorPoint, N_LEVELS};
pub use config::{ExtractConfig, VelocityConfig};
pub use velocity::{
    compute_los_velocity, compute_los_velocity_profile, LosVelocity, VelocityError, C_KM_S,
};
