use nalgebra::SVector;

/// The result of a converged solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution<const N: usize> {
    /// The converged unknowns.
    pub x: SVector<f64, N>,
    /// Number of Newton-type steps applied before convergence.
    ///
    /// Damped retries are not steps, and a solve whose starting point
    /// already meets the tolerance reports zero.
    pub iterations: usize,
    /// Mean residual norm `‖f‖ / n` at `x`.
    pub error: f64,
}
