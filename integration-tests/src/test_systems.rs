pub mod linear {
    use ingot_core::{Evaluation, ResidualSystem};
    use nalgebra::{matrix, vector, SMatrix, SVector};

    /// An affine residual `f(x) = A·x - b`, used for integration tests.
    ///
    /// The root is known in closed form, and every evaluation is counted
    /// so a test can pin down exactly how much work a solve performed.
    /// The Jacobian is only reported to the solver when `with_jacobian`
    /// is set, which lets the same fixture drive both exact and secant
    /// strategies.
    pub struct LinearSystem<const N: usize> {
        pub matrix: SMatrix<f64, N, N>,
        pub offset: SVector<f64, N>,
        pub with_jacobian: bool,
        pub evaluations: usize,
    }

    impl<const N: usize> LinearSystem<N> {
        pub fn new(matrix: SMatrix<f64, N, N>, offset: SVector<f64, N>) -> Self {
            Self {
                matrix,
                offset,
                with_jacobian: true,
                evaluations: 0,
            }
        }

        /// The same system, but reporting residuals only.
        pub fn without_jacobian(mut self) -> Self {
            self.with_jacobian = false;
            self
        }
    }

    impl<const N: usize> ResidualSystem<N> for LinearSystem<N> {
        fn evaluate(&mut self, x: &SVector<f64, N>) -> Evaluation<N> {
            self.evaluations += 1;
            let residual = self.matrix * x - self.offset;
            if self.with_jacobian {
                Evaluation::valid_with_jacobian(residual, self.matrix)
            } else {
                Evaluation::valid(residual)
            }
        }
    }

    /// A scalar gain: `f(x) = 2x - 4`, with its root at `x = 2`.
    pub fn scalar_gain() -> LinearSystem<1> {
        LinearSystem::new(matrix![2.0], vector![4.0])
    }

    /// A coupled pair with the root at `[2, 1]`:
    ///
    /// ```text
    /// x + y = 3
    /// x - y = 1
    /// ```
    pub fn coupled_pair() -> LinearSystem<2> {
        LinearSystem::new(matrix![1.0, 1.0; 1.0, -1.0], vector![3.0, 1.0])
    }
}
