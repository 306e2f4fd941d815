use nalgebra::SVector;

/// Control actions an observer may request from the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Stop the solver before the next evaluation.
    StopEarly,
}

/// Iteration events emitted during a solve.
///
/// The solver emits exactly one event per residual evaluation, tagged
/// with the evaluation's ordinal. The ordinal starts at 1 and counts
/// every evaluation, including rejected ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<const N: usize> {
    /// The system produced a usable residual at `x`.
    Evaluated {
        iteration: usize,
        x: SVector<f64, N>,
        /// Mean residual norm `‖f‖ / n` at `x`.
        error: f64,
    },
    /// The system rejected the trial point. `x` is the damped retry
    /// point, halfway back toward the last accepted iterate.
    RetriedWithDamping { iteration: usize, x: SVector<f64, N> },
    /// The trust region rejected the assessed step and shrank its radius.
    StepRejected {
        iteration: usize,
        /// Ratio of actual to predicted reduction in `‖f‖²`.
        rho: f64,
        /// The radius after shrinking.
        radius: f64,
    },
}

impl<const N: usize> Event<N> {
    /// Returns the evaluation ordinal this event belongs to.
    #[must_use]
    pub fn iteration(&self) -> usize {
        match self {
            Self::Evaluated { iteration, .. }
            | Self::RetriedWithDamping { iteration, .. }
            | Self::StepRejected { iteration, .. } => *iteration,
        }
    }
}
