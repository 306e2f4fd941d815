use nalgebra::SVector;

/// Per-unknown bounds applied around each step.
///
/// Two soft corrections keep iterates tame without entering the residual
/// equations themselves. The increment cap limits how far one step may
/// move each unknown and is applied to the step before it is taken. The
/// physical bounds pin each unknown to its admissible interval and are
/// applied to the iterate after the step. Neither correction is visible
/// to the system except through the points it is asked to evaluate.
///
/// The default is unbounded in every direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<const N: usize> {
    /// Lower physical bound of each unknown.
    pub lower: SVector<f64, N>,
    /// Upper physical bound of each unknown.
    pub upper: SVector<f64, N>,
    /// Largest absolute change of each unknown in one step.
    pub max_step: SVector<f64, N>,
}

impl<const N: usize> Default for Bounds<N> {
    fn default() -> Self {
        Self {
            lower: SVector::repeat(f64::NEG_INFINITY),
            upper: SVector::repeat(f64::INFINITY),
            max_step: SVector::repeat(f64::INFINITY),
        }
    }
}

impl<const N: usize> Bounds<N> {
    /// Validates the bounds.
    ///
    /// # Errors
    ///
    /// Returns a static message if any interval is empty or contains NaN,
    /// or if any increment cap is not positive.
    pub fn validate(&self) -> Result<(), &'static str> {
        for i in 0..N {
            let (lower, upper) = (self.lower[i], self.upper[i]);
            if lower.is_nan() || upper.is_nan() || lower > upper {
                return Err("bounds must satisfy lower <= upper without NaN");
            }
            if self.max_step[i].is_nan() || self.max_step[i] <= 0.0 {
                return Err("max_step entries must be positive");
            }
        }
        Ok(())
    }

    /// Caps each component of a step at its increment limit.
    pub(super) fn clamp_step(&self, step: &mut SVector<f64, N>) {
        for i in 0..N {
            step[i] = step[i].clamp(-self.max_step[i], self.max_step[i]);
        }
    }

    /// Pins each component of an iterate to its physical interval.
    pub(super) fn clamp_x(&self, x: &mut SVector<f64, N>) {
        for i in 0..N {
            x[i] = x[i].clamp(self.lower[i], self.upper[i]);
        }
    }
}
