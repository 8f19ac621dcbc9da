//! Cube-level aggregation: per-pixel bisectors → reference wavelength →
//! LOS velocities.

use ndarray::{Array1, Array3, ArrayView1, ArrayView3, Axis, Zip};

use crate::bisector::{extract_bisector, N_LEVELS};
use crate::config::{ExtractConfig, VelocityConfig};

/// Speed of light in km/s, for first-order Doppler conversion.
pub const C_KM_S: f64 = 299_792.458;

// ── Error type ─────────────────────────────────────────────────────────────

/// Fatal input errors of the cube aggregation.
///
/// Per-pixel degeneracies (failed fits, unreachable levels) are never
/// errors; they surface as zero bisector slots in the output instead.
#[derive(Debug, Clone, PartialEq)]
pub enum VelocityError {
    /// Wavelength axis length differs from the cube's spectral-axis length.
    SpectralAxisMismatch {
        /// Length of the supplied wavelength axis.
        axis_len: usize,
        /// Spectral-axis length of the cube.
        spectral_len: usize,
    },
    /// The fractional reference index leaves the wavelength axis bounds, so
    /// no local spectral sampling can be taken around it.
    ReferenceOutOfRange {
        /// Mean bisector position that was used as the reference index.
        reference: f64,
        /// Length of the wavelength axis.
        axis_len: usize,
    },
}

impl std::fmt::Display for VelocityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SpectralAxisMismatch {
                axis_len,
                spectral_len,
            } => write!(
                f,
                "wavelength axis has {} entries, cube spectral axis has {}",
                axis_len, spectral_len
            ),
            Self::ReferenceOutOfRange { reference, axis_len } => write!(
                f,
                "reference index {} outside wavelength axis of length {}",
                reference, axis_len
            ),
        }
    }
}

impl std::error::Error for VelocityError {}

// ── Result type ────────────────────────────────────────────────────────────

/// Aggregated result of one cube pass.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LosVelocity {
    /// LOS velocities in km/s, shape `(nx, ny, 10)`.
    ///
    /// The Doppler conversion is applied uniformly, unset (zero) bisector
    /// slots included, so consumers must discard levels/pixels whose
    /// bisector entry is zero. Slot 0 (line core) and near-continuum slots
    /// are unreliable by convention.
    pub velocity: Array3<f64>,
    /// Cleaned bisector positions (fractional sample index), same shape.
    pub bisectors: Array3<f64>,
    /// Field-and-level mean bisector position, in fractional sample index.
    pub reference_index: f64,
    /// Wavelength axis linearly interpolated at `reference_index`.
    pub reference_wavelength: f64,
    /// Local spectral sampling `|Δλ|` at the reference index.
    pub spectral_sampling: f64,
    /// Field-mean profile normalized to unit maximum (diagnostic only).
    pub mean_profile: Array1<f64>,
}

// ── Aggregation ────────────────────────────────────────────────────────────

/// Compute LOS Doppler velocities for every pixel and bisector level.
///
/// `cube` has axes `(x, y, wavelength)`; `wavelengths` must have one entry
/// per spectral sample. Each pixel's profile goes through
/// [`extract_bisector`](crate::bisector::extract_bisector), non-finite
/// bisector values are coerced to `0.0`, and the reference index is the
/// arithmetic mean over every pixel and level of the cleaned bisector cube.
/// Zeros from failed fits and unset levels count as ordinary contributions
/// to that mean (a known bias of the method, kept for numeric agreement
/// with the original tool). Velocities follow
/// `Δv = Δλ_sample · (b − ref) / λ_ref · c`.
///
/// Pixel extraction runs in parallel when `config.pixel_delay` is zero and
/// sequentially (sleeping between pixels) otherwise.
pub fn compute_los_velocity(
    cube: ArrayView3<'_, f64>,
    wavelengths: &[f64],
    config: &VelocityConfig,
) -> Result<LosVelocity, VelocityError> {
    let (nx, ny, nw) = cube.dim();
    if wavelengths.len() != nw {
        return Err(VelocityError::SpectralAxisMismatch {
            axis_len: wavelengths.len(),
            spectral_len: nw,
        });
    }

    let mean_profile = field_mean_profile(&cube);
    tracing::debug!(nx, ny, nw, "extracting per-pixel bisectors");

    let mut bisectors = Array3::<f64>::zeros((nx, ny, N_LEVELS));
    let lanes = Zip::from(cube.lanes(Axis(2))).and(bisectors.lanes_mut(Axis(2)));
    if config.pixel_delay.is_zero() {
        lanes.par_for_each(|prof, mut out| {
            let pos = lane_positions(prof, &config.extract);
            for (slot, p) in out.iter_mut().zip(pos.iter()) {
                *slot = *p;
            }
        });
    } else {
        lanes.for_each(|prof, mut out| {
            let pos = lane_positions(prof, &config.extract);
            for (slot, p) in out.iter_mut().zip(pos.iter()) {
                *slot = *p;
            }
            std::thread::sleep(config.pixel_delay);
        });
    }

    sanitize_non_finite(&mut bisectors);

    // Single scalar over the whole cleaned cube, all pixels and levels.
    let reference = bisectors.mean().unwrap_or(0.0);
    let refid = reference.floor();
    if refid < 0.0 || refid as usize + 1 >= wavelengths.len() {
        return Err(VelocityError::ReferenceOutOfRange {
            reference,
            axis_len: wavelengths.len(),
        });
    }
    let refid = refid as usize;
    let spectral_sampling = (wavelengths[refid + 1] - wavelengths[refid]).abs();
    let reference_wavelength =
        (reference - refid as f64) * spectral_sampling + wavelengths[refid];
    tracing::debug!(
        reference,
        reference_wavelength,
        spectral_sampling,
        "reference wavelength established"
    );

    let velocity = bisectors
        .mapv(|b| spectral_sampling * (b - reference) / reference_wavelength * C_KM_S);

    Ok(LosVelocity {
        velocity,
        bisectors,
        reference_index: reference,
        reference_wavelength,
        spectral_sampling,
        mean_profile,
    })
}

/// Treat a single profile as a degenerate 1×1 field and aggregate it.
///
/// Output cubes have shape `(1, 1, 10)`.
pub fn compute_los_velocity_profile(
    profile: &[f64],
    wavelengths: &[f64],
    config: &VelocityConfig,
) -> Result<LosVelocity, VelocityError> {
    let n = profile.len();
    let cube = Array3::from_shape_vec((1, 1, n), profile.to_vec())
        .expect("1x1xn shape always matches the data length");
    compute_los_velocity(cube.view(), wavelengths, config)
}

/// Extract one pixel's bisector positions from a spectral lane.
///
/// Lanes of a standard-layout cube are contiguous and borrowed directly;
/// a strided spectral axis falls back to one copy per pixel.
fn lane_positions(prof: ArrayView1<'_, f64>, config: &ExtractConfig) -> [f64; N_LEVELS] {
    match prof.as_slice() {
        Some(s) => extract_bisector(s, config),
        None => extract_bisector(&prof.to_vec(), config),
    }
    .positions()
}

/// Sum the cube over both spatial axes and normalize by its own maximum.
///
/// Diagnostic output only; the velocity computation never reads it.
fn field_mean_profile(cube: &ArrayView3<'_, f64>) -> Array1<f64> {
    let summed = cube.sum_axis(Axis(0)).sum_axis(Axis(0));
    let max = summed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        summed.mapv(|v| v / max)
    } else {
        summed
    }
}

/// Replace every non-finite entry with `0.0`.
///
/// Required cleanup pass before the reference mean, so a single NaN pixel
/// cannot poison the whole velocity cube.
pub(crate) fn sanitize_non_finite(cube: &mut Array3<f64>) {
    cube.mapv_inplace(|v| if v.is_finite() { v } else { 0.0 });
}
