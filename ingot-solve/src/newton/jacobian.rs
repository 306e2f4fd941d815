use nalgebra::{Const, DimMin, SMatrix, SVector};

use super::{Strategy, linear};

/// Secant updates whose denominator magnitude falls at or below this
/// guard are skipped, keeping the previous estimate for one more step.
const UPDATE_GUARD: f64 = 100.0 * f64::EPSILON;

/// The Jacobian knowledge carried across iterations: either the matrix
/// itself or its inverse, fixed by the strategy when the solve starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Estimate<const N: usize> {
    Jacobian(SMatrix<f64, N, N>),
    Inverse(SMatrix<f64, N, N>),
}

impl<const N: usize> Estimate<N> {
    pub(super) fn seed(strategy: &Strategy<N>) -> Self {
        match strategy {
            // Replaced by the first evaluation's Jacobian before any step.
            Strategy::Exact => Self::Jacobian(SMatrix::identity()),
            Strategy::Broyden { seed } => Self::Jacobian(*seed),
            Strategy::InverseBroyden { seed } => Self::Inverse(*seed),
        }
    }

    /// The explicit Jacobian, when one is maintained.
    pub(super) fn explicit_jacobian(&self) -> Option<&SMatrix<f64, N, N>> {
        match self {
            Self::Jacobian(j) => Some(j),
            Self::Inverse(_) => None,
        }
    }

    /// Replaces the maintained Jacobian with a freshly evaluated one.
    pub(super) fn refresh(&mut self, jacobian: SMatrix<f64, N, N>) {
        if let Self::Jacobian(j) = self {
            *j = jacobian;
        }
    }

    /// Computes the raw step `Δx` satisfying `J·Δx = f`, or `Δx = H·f`
    /// when the inverse is maintained. Returns `None` on a singular
    /// factorization.
    pub(super) fn step(&self, f: &SVector<f64, N>) -> Option<SVector<f64, N>>
    where
        Const<N>: DimMin<Const<N>, Output = Const<N>>,
    {
        match self {
            Self::Jacobian(j) => linear::solve(j, f),
            Self::Inverse(h) => Some(h * f),
        }
    }

    /// Applies the rank-one secant update for a realized displacement
    /// `dx` and the residual change `df` it produced.
    pub(super) fn update(&mut self, dx: &SVector<f64, N>, df: &SVector<f64, N>) {
        match self {
            Self::Jacobian(j) => {
                let denom = dx.dot(dx);
                if denom > UPDATE_GUARD {
                    *j += (df - *j * dx) * dx.transpose() / denom;
                }
            }
            Self::Inverse(h) => {
                let h_df = *h * df;
                let denom = dx.dot(&h_df);
                if denom.abs() > UPDATE_GUARD {
                    *h += (dx - h_df) * (dx.transpose() * *h) / denom;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::{matrix, vector};

    #[test]
    fn forward_update_satisfies_the_secant_condition() {
        let mut estimate = Estimate::seed(&Strategy::<2>::broyden());
        let dx = vector![1.0, 0.0];
        let df = vector![3.0, 1.0];

        estimate.update(&dx, &df);

        let Estimate::Jacobian(j) = estimate else {
            panic!("broyden maintains an explicit jacobian");
        };
        assert_relative_eq!(j * dx, df, epsilon = 1e-14);
        assert_relative_eq!(j, matrix![3.0, 0.0; 1.0, 1.0], epsilon = 1e-14);
    }

    #[test]
    fn inverse_update_satisfies_the_secant_condition() {
        let mut estimate = Estimate::seed(&Strategy::<2>::inverse_broyden());
        let dx = vector![1.0, 0.0];
        let df = vector![3.0, 1.0];

        estimate.update(&dx, &df);

        let Estimate::Inverse(h) = estimate else {
            panic!("inverse broyden maintains an inverse estimate");
        };
        assert_relative_eq!(h * df, dx, epsilon = 1e-14);
    }

    #[test]
    fn inverse_update_tracks_the_inverse_of_the_forward_update() {
        let mut forward = Estimate::seed(&Strategy::<2>::broyden());
        let mut inverse = Estimate::seed(&Strategy::<2>::inverse_broyden());
        let dx = vector![0.7, -0.4];
        let df = vector![1.1, 0.3];

        forward.update(&dx, &df);
        inverse.update(&dx, &df);

        let (Estimate::Jacobian(j), Estimate::Inverse(h)) = (forward, inverse) else {
            panic!("estimate forms are fixed by the strategy");
        };
        assert_relative_eq!(j * h, SMatrix::<f64, 2, 2>::identity(), epsilon = 1e-12);
    }

    #[test]
    fn tiny_displacement_skips_the_forward_update() {
        let mut estimate = Estimate::<2>::Jacobian(SMatrix::identity());
        let dx = vector![1e-9, 0.0];

        estimate.update(&dx, &vector![5.0, 5.0]);

        assert_eq!(estimate, Estimate::Jacobian(SMatrix::identity()));
    }

    #[test]
    fn tiny_denominator_skips_the_inverse_update() {
        let mut estimate = Estimate::<2>::Inverse(SMatrix::identity());
        // dx orthogonal to H·df leaves the denominator at zero.
        let dx = vector![1.0, 0.0];
        let df = vector![0.0, 1.0];

        estimate.update(&dx, &df);

        assert_eq!(estimate, Estimate::Inverse(SMatrix::identity()));
    }

    #[test]
    fn negative_denominator_still_updates_the_inverse() {
        let mut estimate = Estimate::<2>::Inverse(SMatrix::identity());
        let dx = vector![1.0, 0.0];
        let df = vector![-2.0, 0.0];

        estimate.update(&dx, &df);

        let Estimate::Inverse(h) = estimate else {
            panic!("inverse broyden maintains an inverse estimate");
        };
        assert_relative_eq!(h * df, dx, epsilon = 1e-14);
    }

    #[test]
    fn exact_strategy_steps_with_the_refreshed_jacobian() {
        let mut estimate = Estimate::seed(&Strategy::<2>::Exact);
        estimate.refresh(matrix![2.0, 0.0; 0.0, 4.0]);

        let step = estimate.step(&vector![2.0, 2.0]).unwrap();
        assert_relative_eq!(step, vector![1.0, 0.5], epsilon = 1e-14);
    }

    #[test]
    fn inverse_estimate_steps_without_a_linear_solve() {
        let estimate = Estimate::<2>::Inverse(matrix![0.5, 0.0; 0.0, 0.25]);

        let step = estimate.step(&vector![2.0, 2.0]).unwrap();
        assert_relative_eq!(step, vector![1.0, 0.5], epsilon = 1e-14);
    }
}
