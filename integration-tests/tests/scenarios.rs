use approx::assert_relative_eq;
use ingot_core::Evaluation;
use ingot_solve::newton::{Config, Error, Solution, Solver, Strategy};
use integration_tests::test_systems::linear;
use nalgebra::{matrix, vector, SVector};

#[test]
fn resolves_a_scalar_linear_system_in_one_step() {
    let mut system = linear::scalar_gain();
    let mut solver = Solver::new(Config::default()).expect("default config is valid");

    let solution = solver
        .solve_unobserved(&mut system, [0.0])
        .expect("a linear system converges in one exact step");

    assert_eq!(
        solution,
        Solution {
            x: vector![2.0],
            iterations: 1,
            error: 0.0,
        }
    );
    assert_eq!(system.evaluations, 2);
}

#[test]
fn resolves_a_coupled_linear_pair_in_one_step() {
    let mut system = linear::coupled_pair();
    let mut solver = Solver::new(Config::default()).expect("default config is valid");

    let solution = solver
        .solve_unobserved(&mut system, [0.0, 0.0])
        .expect("a linear pair converges in one exact step");

    assert_eq!(
        solution,
        Solution {
            x: vector![2.0, 1.0],
            iterations: 1,
            error: 0.0,
        }
    );
    assert_eq!(system.evaluations, 2);
}

#[test]
fn broyden_reaches_the_root_without_jacobians() {
    let mut system = linear::coupled_pair().without_jacobian();
    let config = Config {
        strategy: Strategy::broyden(),
        ..Config::default()
    };
    let mut solver = Solver::new(config).expect("the config is valid");

    let solution = solver
        .solve_unobserved(&mut system, [0.0, 0.0])
        .expect("secant updates recover the linear map");

    assert_relative_eq!(solution.x, vector![2.0, 1.0], epsilon = 1e-9);
    assert_eq!(solution.iterations, 4);
    assert_eq!(system.evaluations, 5);
}

#[test]
fn a_system_that_rejects_every_trial_fails_fast() {
    let mut evaluations = 0;
    let mut system = |_: &SVector<f64, 2>| {
        evaluations += 1;
        Evaluation::rejected()
    };
    let mut solver = Solver::new(Config::default()).expect("default config is valid");

    let result = solver.solve_unobserved(&mut system, [1.0, 1.0]);

    assert_eq!(result, Err(Error::FirstEvaluationFailed));
    assert_eq!(evaluations, 1);
}

#[test]
fn a_singular_jacobian_is_reported_on_its_iteration() {
    let mut system =
        |_: &SVector<f64, 1>| Evaluation::valid_with_jacobian(vector![1.0], matrix![0.0]);
    let mut solver = Solver::new(Config::default()).expect("default config is valid");

    let result = solver.solve_unobserved(&mut system, [0.0]);

    assert_eq!(result, Err(Error::SingularJacobian { iteration: 1 }));
}

#[test]
fn an_exhausted_budget_reports_the_final_iterate() {
    // The residual flips sign on every evaluation, so each unit-slope
    // step undoes the previous one and the error never moves.
    let mut polarity = 1.0;
    let mut system = |_: &SVector<f64, 1>| {
        polarity = -polarity;
        Evaluation::valid_with_jacobian(vector![2.0 * polarity], matrix![1.0])
    };
    let config = Config {
        iter_max: 5,
        ..Config::default()
    };
    let mut solver = Solver::new(config).expect("the config is valid");

    let result = solver.solve_unobserved(&mut system, [0.0]);

    assert_eq!(
        result,
        Err(Error::MaxIters {
            iterations: 5,
            error: 2.0,
            x: vector![2.0],
        })
    );
}

#[test]
fn resolves_the_intersection_of_a_circle_and_a_hyperbola() {
    // x² + y² = 4 and x·y = 1, near the branch with x > y > 0.
    let mut system = |x: &SVector<f64, 2>| {
        Evaluation::valid_with_jacobian(
            vector![
                x[0] * x[0] + x[1] * x[1] - 4.0,
                x[0] * x[1] - 1.0
            ],
            matrix![
                2.0 * x[0], 2.0 * x[1];
                x[1], x[0]
            ],
        )
    };
    let config = Config {
        epsilon: 1e-12,
        ..Config::default()
    };
    let mut solver = Solver::new(config).expect("the config is valid");

    let solution = solver
        .solve_unobserved(&mut system, [2.0, 0.5])
        .expect("newton converges from a nearby start");

    let root_x = (2.0 + 3.0_f64.sqrt()).sqrt();
    assert_relative_eq!(solution.x, vector![root_x, 1.0 / root_x], epsilon = 1e-9);
    assert!(solution.iterations <= 6);
}
