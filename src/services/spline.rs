//! Cubic smoothing spline
//!
//! Fits the natural cubic spline `g` that minimizes `∫ g''(x)² dx` subject to
//! `Σ (y_i - g(x_i))² <= smoothing` (Reinsch, 1967). A smoothing factor of 0
//! interpolates the data; larger factors trade fidelity for a straighter curve,
//! down to the least-squares line.
//!
//! For a penalty weight `λ` the fitted values solve
//! `(R + λ QᵀQ) γ = Qᵀy`, `g = y - λ Q γ`, where `γ` holds the second
//! derivatives at interior knots, `Q` is the banded second-difference matrix and
//! `R` the tridiagonal Gram matrix of the hat functions. The residual sum grows
//! monotonically with `λ`, so `λ` is found by bisection in log space.
//!
//! Abscissae are rescaled to `[0, 1]` before fitting. The fitted curve does not
//! depend on that scaling, only the value of `λ` does.

use thiserror::Error;
use tracing::debug;

/// Minimum points required for a fit
pub const MIN_SPLINE_POINTS: usize = 2;

/// Initial bracket for `log10(λ)` in unit-interval coordinates
const LOG_LAMBDA_MIN: f64 = -12.0;
const LOG_LAMBDA_MAX: f64 = 12.0;
/// Long series need a smaller `λ`; the lower end moves down in these steps
const LOG_LAMBDA_WIDEN: f64 = 12.0;
/// Below this the fit falls back to interpolation (`λ = 0`)
const LOG_LAMBDA_FLOOR: f64 = -96.0;
const BISECTION_STEPS: usize = 100;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplineError {
    #[error("spline needs at least {required} points, got {points} points")]
    InsufficientData { points: usize, required: usize },

    #[error("x and y lengths differ ({x_len} vs {y_len})")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("x values must be strictly increasing (index {index})")]
    NotIncreasing { index: usize },

    #[error("non-finite value at index {index}")]
    NonFinite { index: usize },

    #[error("smoothing factor must be finite and non-negative, got {0}")]
    InvalidSmoothing(f64),

    #[error("linear system is singular")]
    Singular,
}

/// A fitted natural cubic spline
#[derive(Debug, Clone)]
pub struct SmoothingSpline {
    origin: f64,
    span: f64,
    /// Knots in unit coordinates
    knots: Vec<f64>,
    /// Fitted values at the knots
    values: Vec<f64>,
    /// Second derivatives at the knots (unit coordinates), zero at both ends
    second_derivatives: Vec<f64>,
    residual_sum_of_squares: f64,
}

impl SmoothingSpline {
    /// Fit a smoothing spline through `(x, y)`.
    ///
    /// `x` must be strictly increasing and hold at least [`MIN_SPLINE_POINTS`] values.
    pub fn fit(x: &[f64], y: &[f64], smoothing: f64) -> Result<Self, SplineError> {
        if x.len() != y.len() {
            return Err(SplineError::LengthMismatch { x_len: x.len(), y_len: y.len() });
        }
        if x.len() < MIN_SPLINE_POINTS {
            return Err(SplineError::InsufficientData { points: x.len(), required: MIN_SPLINE_POINTS });
        }
        if !smoothing.is_finite() || smoothing < 0.0 {
            return Err(SplineError::InvalidSmoothing(smoothing));
        }
        if let Some(index) = x.iter().zip(y).position(|(a, b)| !a.is_finite() || !b.is_finite()) {
            return Err(SplineError::NonFinite { index });
        }
        if let Some(index) = x.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SplineError::NotIncreasing { index: index + 1 });
        }

        let n = x.len();
        let origin = x[0];
        let span = x[n - 1] - origin;
        let knots: Vec<f64> = x.iter().map(|v| (v - origin) / span).collect();

        if n == 2 {
            return Ok(Self {
                origin,
                span,
                knots,
                values: y.to_vec(),
                second_derivatives: vec![0.0; 2],
                residual_sum_of_squares: 0.0,
            });
        }

        let system = PenalizedSystem::new(&knots, y);

        let (lambda, fit) = if smoothing == 0.0 {
            (0.0, system.solve(0.0)?)
        } else {
            system.search(smoothing)?
        };

        debug!(
            points = n,
            smoothing,
            lambda,
            residual = fit.residual,
            "Fitted smoothing spline"
        );

        let mut second_derivatives = Vec::with_capacity(n);
        second_derivatives.push(0.0);
        second_derivatives.extend_from_slice(&fit.gamma);
        second_derivatives.push(0.0);

        Ok(Self {
            origin,
            span,
            knots,
            values: fit.values,
            second_derivatives,
            residual_sum_of_squares: fit.residual,
        })
    }

    /// Evaluate the spline at `x` (original coordinates).
    ///
    /// Points outside the fitted range are extrapolated from the end segments.
    pub fn evaluate(&self, x: f64) -> f64 {
        let u = (x - self.origin) / self.span;
        let n = self.knots.len();
        let i = self
            .knots
            .partition_point(|k| *k <= u)
            .saturating_sub(1)
            .min(n - 2);

        let (x0, x1) = (self.knots[i], self.knots[i + 1]);
        let (g0, g1) = (self.values[i], self.values[i + 1]);
        let (c0, c1) = (self.second_derivatives[i], self.second_derivatives[i + 1]);
        let h = x1 - x0;
        let (a, b) = (x1 - u, u - x0);

        (c0 * a.powi(3) + c1 * b.powi(3)) / (6.0 * h)
            + (g0 / h - c0 * h / 6.0) * a
            + (g1 / h - c1 * h / 6.0) * b
    }

    /// Evaluate at every point of `xs`
    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|x| self.evaluate(*x)).collect()
    }

    /// Fitted values at the input abscissae
    pub fn fitted_values(&self) -> &[f64] {
        &self.values
    }

    /// `Σ (y_i - g(x_i))²` of the fit
    pub fn residual_sum_of_squares(&self) -> f64 {
        self.residual_sum_of_squares
    }
}

/// Banded pieces of the penalized normal equations
struct PenalizedSystem<'a> {
    y: &'a [f64],
    h: Vec<f64>,
    /// `R` main and first off-diagonal
    r0: Vec<f64>,
    r1: Vec<f64>,
    /// `QᵀQ` main, first and second off-diagonals
    p0: Vec<f64>,
    p1: Vec<f64>,
    p2: Vec<f64>,
    /// `Qᵀy`
    qty: Vec<f64>,
}

struct Solution {
    gamma: Vec<f64>,
    values: Vec<f64>,
    residual: f64,
}

impl<'a> PenalizedSystem<'a> {
    fn new(knots: &[f64], y: &'a [f64]) -> Self {
        let n = knots.len();
        let m = n - 2;
        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();

        // Column j of Q covers rows j, j+1, j+2
        let col = |j: usize| -> [f64; 3] {
            let (a, c) = (1.0 / h[j], 1.0 / h[j + 1]);
            [a, -(a + c), c]
        };

        let mut r0 = vec![0.0; m];
        let mut r1 = vec![0.0; m.saturating_sub(1)];
        let mut p0 = vec![0.0; m];
        let mut p1 = vec![0.0; m.saturating_sub(1)];
        let mut p2 = vec![0.0; m.saturating_sub(2)];
        let mut qty = vec![0.0; m];

        for j in 0..m {
            let q = col(j);
            r0[j] = (h[j] + h[j + 1]) / 3.0;
            p0[j] = q.iter().map(|v| v * v).sum();
            qty[j] = q[0] * y[j] + q[1] * y[j + 1] + q[2] * y[j + 2];

            if j + 1 < m {
                let next = col(j + 1);
                r1[j] = h[j + 1] / 6.0;
                p1[j] = q[1] * next[0] + q[2] * next[1];
            }
            if j + 2 < m {
                p2[j] = q[2] * col(j + 2)[0];
            }
        }

        Self { y, h, r0, r1, p0, p1, p2, qty }
    }

    /// Find the largest `λ` whose residual sum stays within `smoothing`.
    ///
    /// Every returned fit satisfies `residual <= smoothing`.
    fn search(&self, smoothing: f64) -> Result<(f64, Solution), SplineError> {
        let hi = self.solve(10f64.powf(LOG_LAMBDA_MAX))?;
        if hi.residual <= smoothing {
            return Ok((10f64.powf(LOG_LAMBDA_MAX), hi));
        }

        let mut hi_exp = LOG_LAMBDA_MAX;
        let mut lo_exp = LOG_LAMBDA_MIN;
        let mut lo = self.solve(10f64.powf(lo_exp))?;
        while lo.residual > smoothing {
            hi_exp = lo_exp;
            lo_exp -= LOG_LAMBDA_WIDEN;
            if lo_exp < LOG_LAMBDA_FLOOR {
                return Ok((0.0, self.solve(0.0)?));
            }
            lo = self.solve(10f64.powf(lo_exp))?;
        }

        let mut best = lo;
        let mut best_lambda = 10f64.powf(lo_exp);
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (lo_exp + hi_exp);
            let lambda = 10f64.powf(mid);
            let candidate = self.solve(lambda)?;
            if candidate.residual <= smoothing {
                lo_exp = mid;
                best = candidate;
                best_lambda = lambda;
            } else {
                hi_exp = mid;
            }
        }
        Ok((best_lambda, best))
    }

    fn solve(&self, lambda: f64) -> Result<Solution, SplineError> {
        let d0: Vec<f64> = self.r0.iter().zip(&self.p0).map(|(r, p)| r + lambda * p).collect();
        let d1: Vec<f64> = self.r1.iter().zip(&self.p1).map(|(r, p)| r + lambda * p).collect();
        let d2: Vec<f64> = self.p2.iter().map(|p| lambda * p).collect();

        let gamma = solve_pentadiagonal(&d0, &d1, &d2, &self.qty)?;

        // Residual e = λ Q γ
        let n = self.y.len();
        let mut residuals = vec![0.0; n];
        for (j, g) in gamma.iter().enumerate() {
            let (a, c) = (1.0 / self.h[j], 1.0 / self.h[j + 1]);
            residuals[j] += lambda * a * g;
            residuals[j + 1] -= lambda * (a + c) * g;
            residuals[j + 2] += lambda * c * g;
        }

        let values = self.y.iter().zip(&residuals).map(|(y, e)| y - e).collect();
        let residual = residuals.iter().map(|e| e * e).sum();

        Ok(Solution { gamma, values, residual })
    }
}

/// Solve a symmetric positive definite pentadiagonal system by `LDLᵀ`.
///
/// `d0` is the main diagonal, `d1[i] = A[i][i+1]`, `d2[i] = A[i][i+2]`.
fn solve_pentadiagonal(d0: &[f64], d1: &[f64], d2: &[f64], rhs: &[f64]) -> Result<Vec<f64>, SplineError> {
    let m = d0.len();
    let mut diag = vec![0.0; m];
    let mut l1 = vec![0.0; m];
    let mut l2 = vec![0.0; m];

    for i in 0..m {
        if i >= 2 {
            l2[i] = d2[i - 2] / diag[i - 2];
        }
        if i >= 1 {
            let coupling = if i >= 2 { l2[i] * l1[i - 1] * diag[i - 2] } else { 0.0 };
            l1[i] = (d1[i - 1] - coupling) / diag[i - 1];
        }

        let mut pivot = d0[i];
        if i >= 1 {
            pivot -= l1[i] * l1[i] * diag[i - 1];
        }
        if i >= 2 {
            pivot -= l2[i] * l2[i] * diag[i - 2];
        }
        if !(pivot.is_finite() && pivot > 0.0) {
            return Err(SplineError::Singular);
        }
        diag[i] = pivot;
    }

    let mut z = vec![0.0; m];
    for i in 0..m {
        let mut value = rhs[i];
        if i >= 1 {
            value -= l1[i] * z[i - 1];
        }
        if i >= 2 {
            value -= l2[i] * z[i - 2];
        }
        z[i] = value;
    }

    let mut x = vec![0.0; m];
    for i in (0..m).rev() {
        let mut value = z[i] / diag[i];
        if i + 1 < m {
            value -= l1[i + 1] * x[i + 1];
        }
        if i + 2 < m {
            value -= l2[i + 2] * x[i + 2];
        }
        x[i] = value;
    }

    Ok(x)
}
