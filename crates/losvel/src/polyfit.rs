//! Degree-2 least-squares fitting for sub-sample line-centre location.

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

/// Fitted quadratic `y = c2·x² + c1·x + c0` over absolute sample indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadFit {
    pub c2: f64,
    pub c1: f64,
    pub c0: f64,
}

impl QuadFit {
    /// Evaluate the polynomial at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        (self.c2 * x + self.c1) * x + self.c0
    }

    /// Abscissa of the stationary point: `−c1 / (2·c2)`.
    pub fn vertex_x(&self) -> f64 {
        -self.c1 / (2.0 * self.c2)
    }

    /// True when the parabola opens upward, i.e. the vertex is a minimum.
    pub fn opens_upward(&self) -> bool {
        self.c2 > 0.0
    }
}

/// Fit `y ≈ c2·x² + c1·x + c0` to `(xs[i], ys[i])` by least squares.
///
/// The abscissas are shifted to their mean before solving the normal
/// equations, then the coefficients are shifted back; raw sample indices in
/// the hundreds would otherwise put `x⁴` terms near the f64 precision edge.
///
/// Returns `None` for fewer than 3 points, a singular normal system, or a
/// non-finite solution. Curvature checks are left to the caller.
pub fn fit_quadratic(xs: &[f64], ys: &[f64]) -> Option<QuadFit> {
    let n = xs.len();
    if n < 3 || ys.len() != n {
        return None;
    }

    let shift = xs.iter().sum::<f64>() / n as f64;

    // Design matrix D = [t², t, 1] with t = x − shift.
    let mut d = DMatrix::<f64>::zeros(n, 3);
    for (i, &x) in xs.iter().enumerate() {
        let t = x - shift;
        d[(i, 0)] = t * t;
        d[(i, 1)] = t;
        d[(i, 2)] = 1.0;
    }

    let dt = d.transpose();
    let s = &dt * &d;
    let rhs = dt * DVector::from_column_slice(ys);

    let s3: Matrix3<f64> = s.fixed_view::<3, 3>(0, 0).into_owned();
    let s_inv = s3.try_inverse()?;
    let sol = s_inv * Vector3::new(rhs[0], rhs[1], rhs[2]);
    let (a, b, c) = (sol[0], sol[1], sol[2]);
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return None;
    }

    // Undo the abscissa shift: y = a(x−s)² + b(x−s) + c.
    Some(QuadFit {
        c2: a,
        c1: b - 2.0 * a * shift,
        c0: (a * shift - b) * shift + c,
    })
}
