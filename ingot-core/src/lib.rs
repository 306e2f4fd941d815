//! Core contracts for the Ingot solver framework.
//!
//! This crate defines the shared abstractions that solvers and the systems
//! they drive agree on:
//!
//! - [`ResidualSystem`]: a system of nonlinear equations expressed through
//!   its residual, evaluated at one trial point at a time.
//! - [`Evaluation`]: the outcome of a single residual evaluation, either
//!   valid or rejected by the system's own domain rules.
//! - [`Observer`]: receives solver events and optionally returns control
//!   actions, letting callers watch or steer an iteration without changing
//!   the solver's API.
//!
//! Solvers themselves live in `ingot-solve`.

mod observe;
mod system;

pub use observe::Observer;
pub use system::{Evaluation, ResidualSystem};
