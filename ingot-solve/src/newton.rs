//! Newton-type solvers for small dense residual systems.
//!
//! # Algorithm
//!
//! [`Solver::solve`] drives a residual system `f(x) = 0` of fixed
//! dimension `N` until the mean residual norm `‖f‖ / n` falls below the
//! configured tolerance. Each pass of the loop asks the system for one
//! evaluation, so [`Config::iter_max`] bounds residual evaluations. A
//! successful pass applies one step `x := x − Δx` with `Δx` shaped by the
//! configured [`Strategy`]; per-unknown [`Bounds`] cap the step and pin
//! the result.
//!
//! A rejected evaluation is not fatal after the first: the solver damps
//! back to the midpoint between the failed trial and the last accepted
//! point and retries, spending budget but no step. Rejection of the very
//! first trial has no accepted point to retreat to and fails the solve.
//!
//! # Strategies
//!
//! - [`Strategy::Exact`]: the system provides its Jacobian with every
//!   evaluation and each step solves `J·Δx = f`.
//! - [`Strategy::Broyden`]: a seeded Jacobian estimate is kept current
//!   with rank-one secant updates built from accepted displacements.
//! - [`Strategy::InverseBroyden`]: the inverse estimate is updated in
//!   Sherman-Morrison form and steps need no linear solve.
//!
//! # Globalization
//!
//! [`Globalization::PowellDogleg`] confines steps to a trust region.
//! After the next evaluation, the applied step is judged by the ratio of
//! actual to predicted reduction in `‖f‖²`: a poor step shrinks the
//! radius and is retried from the point it left, a very successful step
//! that pressed against the boundary grows the radius for the next one.
//! A trial that already meets the tolerance is accepted regardless.
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per residual evaluation:
//!
//! - [`Event::Evaluated`]: a usable residual and its mean norm
//! - [`Event::RetriedWithDamping`]: the trial was rejected and the solver
//!   retreats toward the last accepted point
//! - [`Event::StepRejected`]: the trust region rejected the assessed step
//!   and shrank its radius
//!
//! Observers may return [`Action::StopEarly`], which surfaces as
//! [`Error::Stopped`].

mod bounds;
mod config;
mod dogleg;
mod error;
mod event;
mod jacobian;
mod linear;
mod solution;
mod state;


pub use bounds::Bounds;
pub use config::{Config, Globalization, Strategy};
pub use error::Error;
pub use event::{Action, Event};
pub use solution::Solution;

use ingot_core::{Evaluation, Observer, ResidualSystem};
use nalgebra::{Const, DimMin, SVector};

use jacobian::Estimate;
use state::{Assessment, State};

/// A Newton-type solver for one independent system of `N` unknowns.
///
/// A solver is built once per system instance, one per material point,
/// and reused across that instance's successive solves. Solving takes
/// `&mut self`, so a solver can never serve two solves at once; parallel
/// callers give each system its own solver.
#[derive(Debug, Clone)]
pub struct Solver<const N: usize> {
    config: Config<N>,
}

impl<const N: usize> Solver<N>
where
    Const<N>: DimMin<Const<N>, Output = Const<N>>,
{
    /// Creates a solver from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration is rejected.
    pub fn new(config: Config<N>) -> Result<Self, Error<N>> {
        config
            .validate()
            .map_err(|reason| Error::InvalidConfig { reason })?;
        Ok(Self { config })
    }

    /// Returns the solver's configuration.
    #[must_use]
    pub fn config(&self) -> &Config<N> {
        &self.config
    }

    /// Runs the iteration from `x0` until the mean residual norm meets
    /// the tolerance, reporting each evaluation to the observer.
    ///
    /// All per-solve state is rebuilt on entry, so one solver serves any
    /// number of successive solves.
    ///
    /// # Errors
    ///
    /// Returns an error if the first evaluation is rejected, a Jacobian
    /// turns singular, the evaluation budget runs out, the system omits
    /// a Jacobian the exact strategy requires, or an observer stops the
    /// solve.
    pub fn solve<S, Obs>(
        &mut self,
        system: &mut S,
        x0: impl Into<SVector<f64, N>>,
        mut observer: Obs,
    ) -> Result<Solution<N>, Error<N>>
    where
        S: ResidualSystem<N>,
        Obs: Observer<Event<N>, Action>,
    {
        let config = &self.config;
        let mut estimate = Estimate::seed(&config.strategy);
        let mut state = State::new(x0.into(), config.globalization.initial_radius());

        while state.iterations < config.iter_max {
            state.iterations += 1;
            let iteration = state.iterations;

            let (residual, jacobian) = match system.evaluate(&state.x) {
                Evaluation::Valid { residual, jacobian } => (residual, jacobian),
                Evaluation::Rejected => {
                    damp(&mut state, iteration, &mut observer)?;
                    continue;
                }
            };

            // A residual that is not finite is as unusable as a rejection.
            let error = residual.norm() / N as f64;
            if !error.is_finite() {
                damp(&mut state, iteration, &mut observer)?;
                continue;
            }

            state.error = error;
            let event = Event::Evaluated {
                iteration,
                x: state.x,
                error,
            };
            if let Some(action) = observer.observe(&event) {
                match action {
                    Action::StopEarly => return Err(Error::Stopped { iteration }),
                }
            }

            if error < config.epsilon {
                return Ok(Solution {
                    x: state.x,
                    iterations: state.steps,
                    error,
                });
            }

            if let Some(assessment) = state.assessment.take() {
                let actual = assessment.f.norm_squared() - residual.norm_squared();
                let rho = dogleg::gain_ratio(actual, assessment.predicted);
                if rho < dogleg::SHRINK_THRESHOLD {
                    state.radius *= dogleg::SHRINK_FACTOR;
                    let event = Event::StepRejected {
                        iteration,
                        rho,
                        radius: state.radius,
                    };
                    if let Some(action) = observer.observe(&event) {
                        match action {
                            Action::StopEarly => return Err(Error::Stopped { iteration }),
                        }
                    }
                    // Retry from the point the step departed, with the
                    // smaller radius. The rejected trial contributes no
                    // secant pair.
                    state.x = assessment.x;
                    take_dogleg_step(config, &mut state, &estimate, &assessment.f, iteration)?;
                    continue;
                }
                if rho > dogleg::GROW_THRESHOLD && assessment.at_boundary {
                    state.radius *= dogleg::GROW_FACTOR;
                }
            }

            match config.strategy {
                Strategy::Exact => {
                    let fresh = jacobian.ok_or(Error::MissingJacobian { iteration })?;
                    estimate.refresh(fresh);
                }
                Strategy::Broyden { .. } | Strategy::InverseBroyden { .. } => {
                    if let Some((dx, df)) = state.secant_pair(&residual) {
                        estimate.update(&dx, &df);
                    }
                }
            }

            state.accept(residual);

            match config.globalization {
                Globalization::None => {
                    let mut step = estimate
                        .step(&residual)
                        .ok_or(Error::SingularJacobian { iteration })?;
                    config.bounds.clamp_step(&mut step);
                    state.apply_step(&step);
                    config.bounds.clamp_x(&mut state.x);
                }
                Globalization::PowellDogleg { .. } => {
                    take_dogleg_step(config, &mut state, &estimate, &residual, iteration)?;
                }
            }
        }

        Err(Error::MaxIters {
            iterations: state.iterations,
            error: state.error,
            x: state.x,
        })
    }

    /// Runs the iteration without observation.
    ///
    /// # Errors
    ///
    /// Same as [`Solver::solve`], minus [`Error::Stopped`].
    pub fn solve_unobserved<S>(
        &mut self,
        system: &mut S,
        x0: impl Into<SVector<f64, N>>,
    ) -> Result<Solution<N>, Error<N>>
    where
        S: ResidualSystem<N>,
    {
        self.solve(system, x0, ())
    }
}

/// Retreats to the midpoint toward the last accepted point after an
/// unusable evaluation, or fails the solve when none exists yet.
fn damp<const N: usize, Obs>(
    state: &mut State<N>,
    iteration: usize,
    observer: &mut Obs,
) -> Result<(), Error<N>>
where
    Obs: Observer<Event<N>, Action>,
{
    if !state.damp_toward_accepted() {
        return Err(Error::FirstEvaluationFailed);
    }
    let event = Event::RetriedWithDamping {
        iteration,
        x: state.x,
    };
    if let Some(action) = observer.observe(&event) {
        match action {
            Action::StopEarly => return Err(Error::Stopped { iteration }),
        }
    }
    Ok(())
}

/// Selects, clamps, and applies one dogleg step from the accepted point
/// `(state.x, residual)`, leaving its assessment pending for the next
/// evaluation.
fn take_dogleg_step<const N: usize>(
    config: &Config<N>,
    state: &mut State<N>,
    estimate: &Estimate<N>,
    residual: &SVector<f64, N>,
    iteration: usize,
) -> Result<(), Error<N>>
where
    Const<N>: DimMin<Const<N>, Output = Const<N>>,
{
    let jacobian = estimate.explicit_jacobian().ok_or(Error::InvalidConfig {
        reason: "powell dogleg requires an explicit jacobian strategy",
    })?;
    let selected = dogleg::step(jacobian, residual, state.radius)
        .ok_or(Error::SingularJacobian { iteration })?;

    let mut step = selected.step;
    config.bounds.clamp_step(&mut step);
    state.assessment = Some(Assessment {
        x: state.x,
        f: *residual,
        predicted: dogleg::predicted_reduction(jacobian, residual, &step),
        at_boundary: selected.at_boundary,
    });
    state.apply_step(&step);
    config.bounds.clamp_x(&mut state.x);
    Ok(())
}
