use nalgebra::{Const, DimMin, SMatrix, SVector};

use super::linear;

/// Gain-ratio thresholds and radius factors for the trust region.
pub(super) const SHRINK_THRESHOLD: f64 = 0.25;
pub(super) const GROW_THRESHOLD: f64 = 0.75;
pub(super) const SHRINK_FACTOR: f64 = 0.5;
pub(super) const GROW_FACTOR: f64 = 2.0;

/// Predicted reductions smaller than this are treated as numerically
/// zero when forming the gain ratio.
const PREDICTION_FLOOR: f64 = 1e-15;

/// A selected dogleg step and whether the trust-region boundary cut it
/// short.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct DoglegStep<const N: usize> {
    pub(super) step: SVector<f64, N>,
    pub(super) at_boundary: bool,
}

/// Selects Powell's dogleg step for the current residual and Jacobian.
///
/// The returned step uses the same convention as the Newton step: the
/// solver subtracts it from the iterate. Selection follows the three
/// classic cases. The full Newton step is taken when it fits inside the
/// radius. When even the steepest-descent (Cauchy) step reaches past the
/// boundary, it is scaled back onto it. Otherwise the step is the point
/// where the segment from the Cauchy step to the Newton step crosses the
/// boundary.
///
/// Returns `None` when the Jacobian cannot be factorized or the
/// curvature `‖J·g‖²` along the gradient vanishes.
pub(super) fn step<const N: usize>(
    jacobian: &SMatrix<f64, N, N>,
    residual: &SVector<f64, N>,
    radius: f64,
) -> Option<DoglegStep<N>>
where
    Const<N>: DimMin<Const<N>, Output = Const<N>>,
{
    let newton = linear::solve(jacobian, residual)?;
    if newton.norm() <= radius {
        return Some(DoglegStep {
            step: newton,
            at_boundary: false,
        });
    }

    let gradient = jacobian.transpose() * residual;
    let curvature = (jacobian * gradient).norm_squared();
    if curvature == 0.0 || !curvature.is_finite() {
        return None;
    }
    let cauchy = (gradient.norm_squared() / curvature) * gradient;

    let cauchy_norm = cauchy.norm();
    if cauchy_norm >= radius {
        return Some(DoglegStep {
            step: (radius / cauchy_norm) * cauchy,
            at_boundary: true,
        });
    }

    // Boundary crossing of the segment from the Cauchy step toward the
    // Newton step: ‖cauchy + τ·v‖ = radius, taking the root form that
    // avoids cancellation.
    let v = newton - cauchy;
    let a = v.norm_squared();
    let b = cauchy.dot(&v);
    let c = cauchy_norm * cauchy_norm - radius * radius;
    let tau = if a > 0.0 {
        let d = (b * b - a * c).max(0.0).sqrt();
        let root = if b <= 0.0 { (d - b) / a } else { -c / (b + d) };
        root.clamp(0.0, 1.0)
    } else {
        1.0
    };

    Some(DoglegStep {
        step: cauchy + tau * v,
        at_boundary: true,
    })
}

/// Reduction in `‖f‖²` that the linear model predicts for a step about
/// to be subtracted from the iterate.
pub(super) fn predicted_reduction<const N: usize>(
    jacobian: &SMatrix<f64, N, N>,
    residual: &SVector<f64, N>,
    step: &SVector<f64, N>,
) -> f64 {
    let jp = jacobian * step;
    2.0 * residual.dot(&jp) - jp.norm_squared()
}

/// Ratio of actual to predicted reduction in `‖f‖²`.
///
/// A prediction at the numerical floor cannot be divided by, so the
/// ratio degenerates to full credit when the residual actually shrank
/// and no credit otherwise.
pub(super) fn gain_ratio(actual: f64, predicted: f64) -> f64 {
    if predicted.abs() < PREDICTION_FLOOR {
        if actual > 0.0 { 1.0 } else { 0.0 }
    } else {
        actual / predicted
    }
}
