use nalgebra::SVector;

/// The last accepted evaluation: the iterate and its residual.
#[derive(Debug, Clone, Copy)]
pub(super) struct Accepted<const N: usize> {
    pub(super) x: SVector<f64, N>,
    pub(super) f: SVector<f64, N>,
}

/// A pending trust-region assessment of the most recently applied step.
///
/// Carries everything needed to judge the step once the next evaluation
/// lands, and to retry from the departure point if the step is rejected.
#[derive(Debug, Clone, Copy)]
pub(super) struct Assessment<const N: usize> {
    /// The accepted iterate the step departed from.
    pub(super) x: SVector<f64, N>,
    /// The residual at that iterate.
    pub(super) f: SVector<f64, N>,
    /// Model-predicted reduction in `‖f‖²` for the applied step.
    pub(super) predicted: f64,
    /// Whether the boundary cut the step short.
    pub(super) at_boundary: bool,
}

/// Mutable per-solve state, freshly built at the start of every solve.
#[derive(Debug)]
pub(super) struct State<const N: usize> {
    /// The current trial iterate.
    pub(super) x: SVector<f64, N>,
    /// Residual evaluations consumed so far.
    pub(super) iterations: usize,
    /// Newton-type steps applied so far.
    pub(super) steps: usize,
    /// Mean residual norm of the last successful evaluation.
    pub(super) error: f64,
    /// The last accepted evaluation, if any.
    pub(super) accepted: Option<Accepted<N>>,
    /// Whether the displacement from `accepted` to `x` was produced by an
    /// applied step, making it usable as a secant pair.
    pub(super) pair_valid: bool,
    /// Current trust-region radius. Unused without globalization.
    pub(super) radius: f64,
    /// Assessment awaiting the next evaluation, if a trust-region step
    /// was just applied.
    pub(super) assessment: Option<Assessment<N>>,
}

impl<const N: usize> State<N> {
    pub(super) fn new(x: SVector<f64, N>, radius: f64) -> Self {
        Self {
            x,
            iterations: 0,
            steps: 0,
            error: f64::INFINITY,
            accepted: None,
            pair_valid: false,
            radius,
            assessment: None,
        }
    }

    /// Records the current iterate and its residual as the accepted pair.
    pub(super) fn accept(&mut self, f: SVector<f64, N>) {
        self.accepted = Some(Accepted { x: self.x, f });
    }

    /// Moves the iterate halfway back toward the last accepted point and
    /// discards any pending assessment. Returns `false` when no accepted
    /// point exists to retreat to.
    pub(super) fn damp_toward_accepted(&mut self) -> bool {
        let Some(accepted) = self.accepted else {
            return false;
        };
        self.x = 0.5 * (self.x + accepted.x);
        self.pair_valid = false;
        self.assessment = None;
        true
    }

    /// The realized displacement since the last accepted evaluation and
    /// the residual change it produced, when that displacement came from
    /// an applied step rather than a damped retry.
    pub(super) fn secant_pair(
        &self,
        residual: &SVector<f64, N>,
    ) -> Option<(SVector<f64, N>, SVector<f64, N>)> {
        if !self.pair_valid {
            return None;
        }
        let accepted = self.accepted?;
        Some((self.x - accepted.x, residual - accepted.f))
    }

    /// Applies a step in the subtract convention.
    pub(super) fn apply_step(&mut self, step: &SVector<f64, N>) {
        self.x -= step;
        self.steps += 1;
        self.pair_valid = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::vector;

    #[test]
    fn damping_before_any_acceptance_reports_failure() {
        let mut state = State::new(vector![1.0, 2.0], 0.0);
        assert!(!state.damp_toward_accepted());
    }

    #[test]
    fn damping_halves_the_distance_to_the_accepted_point() {
        let mut state = State::new(vector![1.0, -1.0], 0.0);
        state.accept(vector![0.5, 0.5]);
        state.x = vector![5.0, 3.0];

        assert!(state.damp_toward_accepted());
        assert_relative_eq!(state.x, vector![3.0, 1.0]);

        assert!(state.damp_toward_accepted());
        assert_relative_eq!(state.x, vector![2.0, 0.0]);
    }

    #[test]
    fn damping_discards_the_pending_assessment_and_pair() {
        let mut state = State::new(vector![2.0], 1.0);
        state.accept(vector![1.0]);
        state.apply_step(&vector![0.5]);
        state.assessment = Some(Assessment {
            x: vector![2.0],
            f: vector![1.0],
            predicted: 1.0,
            at_boundary: true,
        });

        assert!(state.damp_toward_accepted());
        assert!(state.assessment.is_none());
        assert!(!state.pair_valid);
    }

    #[test]
    fn secant_pair_requires_an_applied_step() {
        let mut state = State::new(vector![1.0], 0.0);
        state.accept(vector![2.0]);
        assert!(state.secant_pair(&vector![1.5]).is_none());

        state.apply_step(&vector![-0.5]);
        let (dx, df) = state.secant_pair(&vector![1.5]).unwrap();
        assert_relative_eq!(dx, vector![0.5]);
        assert_relative_eq!(df, vector![-0.5]);

        state.accept(vector![1.5]);
        state.x = vector![3.0];
        assert!(state.damp_toward_accepted());
        assert!(state.secant_pair(&vector![1.0]).is_none());
    }

    #[test]
    fn applied_steps_are_counted_and_marked_as_pairs() {
        let mut state = State::new(vector![1.0], 0.0);
        state.apply_step(&vector![0.25]);
        state.apply_step(&vector![-0.5]);

        assert_relative_eq!(state.x, vector![1.25]);
        assert_eq!(state.steps, 2);
        assert!(state.pair_valid);
    }
}
