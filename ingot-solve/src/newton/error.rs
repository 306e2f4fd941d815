use nalgebra::SVector;
use thiserror::Error;

/// Errors that can occur during a Newton-type solve.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error<const N: usize> {
    /// The provided configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: &'static str },

    /// The system rejected the starting point, leaving no accepted state
    /// to damp back toward.
    #[error("the system rejected the starting point")]
    FirstEvaluationFailed,

    /// The Jacobian could not be factorized at the given iteration.
    #[error("singular jacobian at iteration {iteration}")]
    SingularJacobian { iteration: usize },

    /// The evaluation budget ran out before the residual met the
    /// tolerance.
    ///
    /// Carries the last iterate and its mean residual norm so the caller
    /// can decide how to retry, typically with a smaller imposed
    /// increment.
    #[error("no convergence after {iterations} iterations (mean residual norm {error:.3e})")]
    MaxIters {
        iterations: usize,
        error: f64,
        x: SVector<f64, N>,
    },

    /// An evaluation omitted the Jacobian the exact-Jacobian strategy
    /// requires.
    #[error("the system provided no jacobian at iteration {iteration}")]
    MissingJacobian { iteration: usize },

    /// An observer stopped the solve.
    #[error("stopped by observer at iteration {iteration}")]
    Stopped { iteration: usize },
}
