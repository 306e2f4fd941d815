//! Nonlinear solvers for the Ingot framework.
//!
//! The [`newton`] module drives small dense residual systems to a root
//! with Newton-type iterations, secant Jacobian strategies, and an
//! optional trust region. Systems implement the contracts defined in
//! `ingot-core`.

pub mod newton;
