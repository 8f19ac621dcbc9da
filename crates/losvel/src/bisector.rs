//! Per-profile bisector extraction: line-centre fit + level-wise wing
//! midpoints.

use crate::config::ExtractConfig;
use crate::polyfit;
use crate::profile;

/// Number of bisector table slots per profile (slot 0 is the line-centre
/// fit, slots 1..9 the intensity levels 0.1..0.9).
pub const N_LEVELS: usize = 10;

/// One bisector table entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BisectorPoint {
    /// Position in fractional sample-index units (not wavelength).
    pub position: f64,
    /// Normalized intensity of the level. Slot 0 carries the fitted minimum
    /// intensity instead.
    pub depth: f64,
}

/// Fixed 10-slot bisector table for one profile.
///
/// Slot 0 holds the parabolic line-centre fit; slots 1..9 hold the blue/red
/// wing midpoints at normalized intensity levels 0.1..0.9, counted from the
/// line depth toward the continuum. Slots the shallower wing never reaches
/// stay at the zero default, which downstream treats as "no signal". Slot 0
/// is set whenever any other slot is.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bisector {
    pub points: [BisectorPoint; N_LEVELS],
}

impl Bisector {
    /// All positions as a flat array, unset slots as `0.0`.
    pub fn positions(&self) -> [f64; N_LEVELS] {
        let mut out = [0.0; N_LEVELS];
        for (slot, p) in out.iter_mut().zip(self.points.iter()) {
            *slot = p.position;
        }
        out
    }

    /// True when no valid line centre was found (every slot at the zero
    /// default).
    pub fn is_empty(&self) -> bool {
        self.points.iter().all(|p| *p == BisectorPoint::default())
    }
}

/// Extract the bisector table from one intensity profile.
///
/// The profile is normalized to unit maximum, the global minimum located and
/// clamped so a symmetric window of `2·fit_half_width + 1` samples stays in
/// bounds, and a least-squares parabola fitted over that window. The
/// analytic vertex becomes slot 0. The fitted centre is then inserted into
/// the sample sequence, intensities rescaled to span `[0, 1]`, and the
/// profile split into a blue wing (positions `<= centre`) and a red wing
/// (positions `>= centre`). With `m1 = floor(10·min(max(blue), max(red)))`
/// capped at 10, each level `k in 1..m1` stores the midpoint of the two
/// wings' linearly interpolated positions at intensity `k/10`.
///
/// Degenerate inputs — non-positive maximum, profile shorter than the fit
/// window, downward-curving or singular fit, centre at a sampling boundary —
/// return the all-zero table rather than an error; downstream treats those
/// pixels as signal-free. The minimum-index clamp can park the fit window
/// off the true minimum for lines at the very profile edge; such pixels are
/// not flagged here and keep their (physically doubtful) fit.
pub fn extract_bisector(values: &[f64], config: &ExtractConfig) -> Bisector {
    let mut bis = Bisector::default();

    let n = values.len();
    let hw = config.fit_half_width.max(1);
    if n < 2 * hw + 1 {
        return bis;
    }
    let norm = match profile::normalize_peak(values) {
        Some(v) => v,
        None => return bis,
    };

    // Keep the fit window in bounds even when the minimum sits at the edge.
    let m = profile::argmin(&norm).clamp(hw, n - 1 - hw);

    let xs: Vec<f64> = (m - hw..=m + hw).map(|i| i as f64).collect();
    let fit = match polyfit::fit_quadratic(&xs, &norm[m - hw..=m + hw]) {
        // Not an upward-curving minimum: silent skip, not an error.
        Some(f) if f.opens_upward() => f,
        _ => return bis,
    };
    let centre = fit.vertex_x();
    // A near-zero curvature can throw the vertex far outside the sampling
    // range; positions must stay within [0, n-1].
    if !centre.is_finite() || centre < 0.0 || centre > (n - 1) as f64 {
        return bis;
    }
    let depth = fit.eval(centre);
    bis.points[0] = BisectorPoint {
        position: centre,
        depth,
    };

    let mut aug = profile::augment_with_centre(&norm, centre, depth);
    if !profile::rescale_unit(&mut aug) {
        return bis;
    }
    let (blue, red) = profile::split_wings(&aug, centre);
    // The centre must sit strictly inside both wings.
    if blue.len() < 2 || red.len() < 2 {
        return bis;
    }

    let blue_top = blue.iter().map(|s| s[1]).fold(f64::NEG_INFINITY, f64::max);
    let red_top = red.iter().map(|s| s[1]).fold(f64::NEG_INFINITY, f64::max);
    let m1 = ((10.0 * blue_top.min(red_top)).floor() as usize).min(N_LEVELS);

    for k in 1..m1 {
        let target = k as f64 / 10.0;
        let pb = profile::crossing_from_core(blue.iter().rev().copied(), target);
        let pr = profile::crossing_from_core(red.iter().copied(), target);
        if let (Some(pb), Some(pr)) = (pb, pr) {
            bis.points[k] = BisectorPoint {
                position: 0.5 * (pb + pr),
                depth: target,
            };
        }
    }

    if config.verbose {
        tracing::trace!(centre, depth, m1, "bisector extracted");
    }
    bis
}
