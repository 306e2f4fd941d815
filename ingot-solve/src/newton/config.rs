use nalgebra::SMatrix;

use super::Bounds;

/// How the solver obtains the Jacobian that shapes each step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy<const N: usize> {
    /// The system supplies an analytical Jacobian with every evaluation
    /// and each step solves `J·Δx = f`.
    Exact,
    /// Maintain a Jacobian estimate with Broyden's rank-one secant
    /// update, seeded once and never re-evaluated.
    Broyden { seed: SMatrix<f64, N, N> },
    /// Maintain an inverse-Jacobian estimate with the Sherman-Morrison
    /// form of the secant update. Each step is a matrix-vector product,
    /// with no linear solve to go singular.
    InverseBroyden { seed: SMatrix<f64, N, N> },
}

impl<const N: usize> Strategy<N> {
    /// The Broyden strategy seeded with the identity.
    #[must_use]
    pub fn broyden() -> Self {
        Self::Broyden {
            seed: SMatrix::identity(),
        }
    }

    /// The inverse-Broyden strategy seeded with the identity.
    #[must_use]
    pub fn inverse_broyden() -> Self {
        Self::InverseBroyden {
            seed: SMatrix::identity(),
        }
    }
}

/// Globalization applied on top of the step computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Globalization {
    /// Take raw strategy steps.
    None,
    /// Confine steps to Powell's dogleg trust region, starting from the
    /// given radius. Requires a strategy that maintains an explicit
    /// Jacobian, so it cannot be paired with [`Strategy::InverseBroyden`].
    PowellDogleg { radius: f64 },
}

impl Globalization {
    pub(super) fn initial_radius(&self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::PowellDogleg { radius } => *radius,
        }
    }
}

/// Configuration for the Newton-type solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config<const N: usize> {
    /// Convergence tolerance on the mean residual norm `‖f‖ / n`.
    pub epsilon: f64,
    /// Budget of residual evaluations for one solve.
    ///
    /// Every evaluation counts, including rejected ones.
    pub iter_max: usize,
    pub strategy: Strategy<N>,
    pub globalization: Globalization,
    pub bounds: Bounds<N>,
}

impl<const N: usize> Default for Config<N> {
    fn default() -> Self {
        Self {
            epsilon: 1e-8,
            iter_max: 100,
            strategy: Strategy::Exact,
            globalization: Globalization::None,
            bounds: Bounds::default(),
        }
    }
}

impl<const N: usize> Config<N> {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a static message if the tolerance or budget is unusable,
    /// a seed matrix contains non-finite entries, the trust-region radius
    /// is not a positive finite number, the dogleg is paired with the
    /// inverse-Broyden strategy, or the bounds are inconsistent.
    pub fn validate(&self) -> Result<(), &'static str> {
        if N == 0 {
            return Err("the system must have at least one unknown");
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err("epsilon must be finite and positive");
        }
        if self.iter_max == 0 {
            return Err("iter_max must be at least 1");
        }
        match &self.strategy {
            Strategy::Exact => {}
            Strategy::Broyden { seed } | Strategy::InverseBroyden { seed } => {
                if !seed.iter().all(|entry| entry.is_finite()) {
                    return Err("seed entries must be finite");
                }
            }
        }
        if let Globalization::PowellDogleg { radius } = self.globalization {
            if !radius.is_finite() || radius <= 0.0 {
                return Err("trust-region radius must be finite and positive");
            }
            if matches!(self.strategy, Strategy::InverseBroyden { .. }) {
                return Err("powell dogleg requires an explicit jacobian strategy");
            }
        }
        self.bounds.validate()
    }
}
