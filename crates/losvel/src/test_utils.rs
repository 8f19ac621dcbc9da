//! Shared synthetic-spectrum helpers for unit tests.

use ndarray::Array3;

/// Gaussian absorption line on a unit continuum.
///
/// `depth` in (0, 1) is the central line depth; `centre` is in fractional
/// sample-index units.
pub(crate) fn gaussian_absorption(n: usize, centre: f64, sigma: f64, depth: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let d = (i as f64 - centre) / sigma;
            1.0 - depth * (-0.5 * d * d).exp()
        })
        .collect()
}

/// Cube with the same profile at every spatial pixel.
pub(crate) fn uniform_cube(nx: usize, ny: usize, profile: &[f64]) -> Array3<f64> {
    let n = profile.len();
    let mut cube = Array3::zeros((nx, ny, n));
    for x in 0..nx {
        for y in 0..ny {
            for (w, &v) in profile.iter().enumerate() {
                cube[[x, y, w]] = v;
            }
        }
    }
    cube
}

/// Cube whose line centre varies per pixel via `centre_of(x, y)`.
pub(crate) fn shifted_cube(
    nx: usize,
    ny: usize,
    n: usize,
    sigma: f64,
    depth: f64,
    centre_of: impl Fn(usize, usize) -> f64,
) -> Array3<f64> {
    let mut cube = Array3::zeros((nx, ny, n));
    for x in 0..nx {
        for y in 0..ny {
            let prof = gaussian_absorption(n, centre_of(x, y), sigma, depth);
            for (w, &v) in prof.iter().enumerate() {
                cube[[x, y, w]] = v;
            }
        }
    }
    cube
}

/// Uniformly sampled wavelength axis.
pub(crate) fn linear_axis(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 * step).collect()
}
