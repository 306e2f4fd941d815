use nalgebra::{Const, DimMin, SMatrix, SVector};

/// Solves the dense square system `J·Δx = f` by LU with partial pivoting.
///
/// Returns `None` when the factorization exposes a singular matrix: a
/// pivot that is non-finite or whose magnitude is at or below
/// `n · ε · max|J_ij|`. The threshold scales with the matrix, and the
/// all-zero matrix always fails it.
pub(super) fn solve<const N: usize>(
    jacobian: &SMatrix<f64, N, N>,
    f: &SVector<f64, N>,
) -> Option<SVector<f64, N>>
where
    Const<N>: DimMin<Const<N>, Output = Const<N>>,
{
    let tolerance = N as f64 * f64::EPSILON * jacobian.amax();
    if !tolerance.is_finite() {
        return None;
    }

    let lu = jacobian.lu();
    for pivot in lu.u().diagonal().iter() {
        if !pivot.is_finite() || pivot.abs() <= tolerance {
            return None;
        }
    }
    lu.solve(f)
}
