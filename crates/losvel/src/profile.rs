//! 1-D spectral-profile primitives shared by the bisector extractor.

/// A profile sample as `[position, intensity]`, position in fractional
/// sample-index units.
pub(crate) type Sample = [f64; 2];

/// Index of the smallest sample under the f64 total order. Ties resolve to
/// the first occurrence; a stray NaN sample cannot poison the comparison.
pub(crate) fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap()
}

/// Divide every sample by the profile maximum so the continuum sits at 1.0.
///
/// Returns `None` when the maximum is not strictly positive or not finite.
pub(crate) fn normalize_peak(values: &[f64]) -> Option<Vec<f64>> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 {
        return None;
    }
    Some(values.iter().map(|&v| v / max).collect())
}

/// Insert the fitted line centre into the sampled profile and sort by
/// position. The centre is skipped when it coincides exactly with an
/// existing integer sample index.
pub(crate) fn augment_with_centre(values: &[f64], centre: f64, depth: f64) -> Vec<Sample> {
    let mut out: Vec<Sample> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v])
        .collect();

    let coincides =
        centre >= 0.0 && centre.fract() == 0.0 && (centre as usize) < values.len();
    if !coincides {
        out.push([centre, depth]);
    }
    out.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap());
    out
}

/// Rescale intensities in place so they span `[0, 1]`.
///
/// Returns `false` (leaving the samples untouched) when the span is
/// degenerate.
pub(crate) fn rescale_unit(samples: &mut [Sample]) -> bool {
    let min = samples.iter().map(|s| s[1]).fold(f64::INFINITY, f64::min);
    let max = samples.iter().map(|s| s[1]).fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if !span.is_finite() || span <= f64::EPSILON {
        return false;
    }
    for s in samples.iter_mut() {
        s[1] = (s[1] - min) / span;
    }
    true
}

/// Split an augmented profile at the line centre.
///
/// The blue wing holds positions `<= centre`, the red wing positions
/// `>= centre`; the centre sample itself belongs to both.
pub(crate) fn split_wings(samples: &[Sample], centre: f64) -> (Vec<Sample>, Vec<Sample>) {
    let blue = samples.iter().copied().filter(|s| s[0] <= centre).collect();
    let red = samples.iter().copied().filter(|s| s[0] >= centre).collect();
    (blue, red)
}

/// Position where a wing first crosses `target` intensity, walking from the
/// line core toward the continuum.
///
/// `samples` must be ordered core-to-continuum. Returns the linear
/// interpolation between the bracketing pair, or `None` when the wing never
/// reaches the target.
pub(crate) fn crossing_from_core<I>(mut samples: I, target: f64) -> Option<f64>
where
    I: Iterator<Item = Sample>,
{
    let mut prev = samples.next()?;
    for cur in samples {
        let (v0, v1) = (prev[1], cur[1]);
        if (v0 - target) * (v1 - target) <= 0.0 {
            if (v1 - v0).abs() < f64::EPSILON {
                return Some(cur[0]);
            }
            return Some(prev[0] + (target - v0) * (cur[0] - prev[0]) / (v1 - v0));
        }
        prev = cur;
    }
    None
}
