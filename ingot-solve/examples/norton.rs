//! Implicit integration of a Norton-type viscoplastic material point.
//!
//! One uniaxial material point is driven through a history of imposed
//! strain increments. Each increment is integrated implicitly: the two
//! unknowns per time step are the elastic strain increment and the
//! viscoplastic strain increment, coupled through the strain partition
//! and the Norton creep law `ṗ = A·|σ|^n`.
//!
//! The material law refuses trial states whose stress leaves its
//! calibrated range, and the solver surfaces that as a recoverable
//! failure. The caller reacts the way an integrator does in practice:
//! it splits the increment in half and integrates the halves.
//!
//! Run with: `cargo run --example norton`

use ingot_core::{Evaluation, ResidualSystem};
use ingot_solve::newton::{Bounds, Config, Error, Solver, Strategy};
use nalgebra::{SVector, matrix, vector};

/// Material constants for a Norton-type creep law (MPa, s).
struct Norton {
    /// Young's modulus.
    youngs: f64,
    /// Creep coefficient `A`.
    coefficient: f64,
    /// Creep exponent `n`.
    exponent: f64,
    /// Stress magnitude beyond which the law is not calibrated.
    stress_cap: f64,
}

/// One material point advancing through imposed strain increments.
///
/// The unknowns solved per step are `x = [Δε_el, Δp]`.
struct MaterialPoint<'a> {
    material: &'a Norton,
    /// Converged elastic strain.
    elastic: f64,
    /// Converged cumulated viscoplastic strain.
    plastic: f64,
    /// Imposed total strain increment for the step in progress.
    strain_increment: f64,
    /// Time increment for the step in progress.
    dt: f64,
}

impl ResidualSystem<2> for MaterialPoint<'_> {
    fn evaluate(&mut self, x: &SVector<f64, 2>) -> Evaluation<2> {
        let m = self.material;
        let stress = m.youngs * (self.elastic + x[0]);
        if stress.abs() > m.stress_cap {
            return Evaluation::rejected();
        }

        let direction = if stress < 0.0 { -1.0 } else { 1.0 };
        let rate = m.coefficient * stress.abs().powf(m.exponent);
        let residual = vector![
            x[0] + x[1] * direction - self.strain_increment,
            x[1] - self.dt * rate
        ];

        let flow_slope =
            self.dt * m.coefficient * m.exponent * stress.abs().powf(m.exponent - 1.0);
        let jacobian = matrix![
            1.0, direction;
            -flow_slope * direction * m.youngs, 1.0
        ];
        Evaluation::valid_with_jacobian(residual, jacobian)
    }
}

impl MaterialPoint<'_> {
    fn stress(&self) -> f64 {
        self.material.youngs * self.elastic
    }

    /// Integrates one imposed strain increment, splitting it in half on a
    /// recoverable failure. Returns the iterations spent, summed over
    /// sub-increments.
    fn integrate(
        &mut self,
        solver: &mut Solver<2>,
        strain_increment: f64,
        dt: f64,
        depth: usize,
    ) -> Result<usize, Error<2>> {
        self.strain_increment = strain_increment;
        self.dt = dt;

        // Elastic predictor: the whole increment goes in elastically.
        match solver.solve_unobserved(self, [strain_increment, 0.0]) {
            Ok(solution) => {
                self.elastic += solution.x[0];
                self.plastic += solution.x[1];
                Ok(solution.iterations)
            }
            Err(Error::FirstEvaluationFailed | Error::MaxIters { .. }) if depth < 6 => {
                println!("    Δε = {strain_increment:+.4e} is too aggressive, splitting it");
                let half = 0.5 * strain_increment;
                let first = self.integrate(solver, half, 0.5 * dt, depth + 1)?;
                let second = self.integrate(solver, half, 0.5 * dt, depth + 1)?;
                Ok(first + second)
            }
            Err(err) => Err(err),
        }
    }
}

fn main() {
    let material = Norton {
        youngs: 200e3,
        coefficient: 1e-12,
        exponent: 4.0,
        stress_cap: 3e3,
    };
    let mut point = MaterialPoint {
        material: &material,
        elastic: 0.0,
        plastic: 0.0,
        strain_increment: 0.0,
        dt: 0.0,
    };

    // The viscoplastic increment can never be negative, and the elastic
    // increment is kept within strain sanity limits.
    let config = Config {
        epsilon: 1e-9,
        iter_max: 30,
        strategy: Strategy::Exact,
        bounds: Bounds {
            lower: vector![-0.05, 0.0],
            upper: vector![0.05, f64::INFINITY],
            ..Bounds::default()
        },
        ..Config::default()
    };
    let mut solver = Solver::new(config).expect("the demo configuration is valid");

    println!("Norton material point, E = {} MPa, n = {}", material.youngs, material.exponent);
    println!();
    println!("{:>4}  {:>11}  {:>10}  {:>12}  {:>12}  {:>5}", "step", "Δε", "σ (MPa)", "ε_el", "p", "iters");

    let mut total_strain = 0.0;
    for (step, strain_increment) in std::iter::repeat_n(2e-3, 5).enumerate() {
        match point.integrate(&mut solver, strain_increment, 1.0, 0) {
            Ok(iterations) => {
                total_strain += strain_increment;
                println!(
                    "{:>4}  {:>11.4e}  {:>10.2}  {:>12.5e}  {:>12.5e}  {:>5}",
                    step + 1,
                    strain_increment,
                    point.stress(),
                    point.elastic,
                    point.plastic,
                    iterations
                );
            }
            Err(err) => {
                println!("step {} failed: {err}", step + 1);
                return;
            }
        }
    }

    println!();
    println!("One aggressive increment, recovered by substepping:");
    let aggressive = 2e-2;
    match point.integrate(&mut solver, aggressive, 1.0, 0) {
        Ok(iterations) => {
            total_strain += aggressive;
            println!(
                "    done: σ = {:.2} MPa, ε = {:.4e}, p = {:.5e}, {} iterations in total",
                point.stress(),
                total_strain,
                point.plastic,
                iterations
            );
        }
        Err(err) => println!("    failed: {err}"),
    }
}
