//! Shared fixtures for the cross-crate solver tests.

pub mod test_systems;
