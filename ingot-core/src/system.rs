use nalgebra::{SMatrix, SVector};

/// The outcome of evaluating a residual system at one trial point.
///
/// An evaluation either produces a residual, optionally with its Jacobian,
/// or rejects the trial point outright. Rejection means the point lies
/// outside the domain where the system can be evaluated at all, such as a
/// trial state that drives a material law out of its admissible range. It
/// is a recoverable condition, not a convergence failure: solvers respond
/// by retrying from a tamer point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation<const N: usize> {
    /// The system produced a residual at the trial point.
    Valid {
        residual: SVector<f64, N>,
        jacobian: Option<SMatrix<f64, N, N>>,
    },
    /// The system could not be evaluated at the trial point.
    Rejected,
}

impl<const N: usize> Evaluation<N> {
    /// A valid evaluation carrying only a residual.
    #[must_use]
    pub fn valid(residual: impl Into<SVector<f64, N>>) -> Self {
        Self::Valid {
            residual: residual.into(),
            jacobian: None,
        }
    }

    /// A valid evaluation carrying a residual and its Jacobian.
    #[must_use]
    pub fn valid_with_jacobian(
        residual: impl Into<SVector<f64, N>>,
        jacobian: impl Into<SMatrix<f64, N, N>>,
    ) -> Self {
        Self::Valid {
            residual: residual.into(),
            jacobian: Some(jacobian.into()),
        }
    }

    /// A rejected evaluation.
    #[must_use]
    pub fn rejected() -> Self {
        Self::Rejected
    }
}

/// A system of `N` nonlinear equations in `N` unknowns, expressed through
/// its residual `f(x)`.
///
/// A root of the residual is a solution of the system. The dimension is
/// fixed at compile time and is expected to be small, on the order of the
/// handful of internal variables integrated at one material point.
///
/// Evaluation takes `&mut self` so systems may keep scratch state or
/// record what they were asked, but solvers treat every call as a pure
/// question about the trial point: the same `x` is expected to produce
/// the same answer within one solve.
///
/// Any `FnMut(&SVector<f64, N>) -> Evaluation<N>` closure is a residual
/// system.
pub trait ResidualSystem<const N: usize> {
    /// Evaluates the residual at the trial point `x`.
    fn evaluate(&mut self, x: &SVector<f64, N>) -> Evaluation<N>;
}

impl<F, const N: usize> ResidualSystem<N> for F
where
    F: FnMut(&SVector<f64, N>) -> Evaluation<N>,
{
    fn evaluate(&mut self, x: &SVector<f64, N>) -> Evaluation<N> {
        self(x)
    }
}
