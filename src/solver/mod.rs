//! qpdual solver main module.
//!
//! This module contains the main types for the dual active-set QP solver.
//! The intended usage pattern is one long-lived [`DualQPSolver`] per
//! control loop: pose the problem through the data setters, call
//! [`solve`](DualQPSolver::solve) once per tick, and read the result from
//! the returned [`DualQPSolution`].

// internal module structure
mod active_set;
mod factorize;
mod problem;
mod settings;
mod solution;
#[allow(clippy::module_inception)]
mod solver;
mod workspace;

#[cfg(feature = "serde")]
mod json;

pub use problem::*;
pub use settings::*;
pub use solution::*;
pub use solver::*;

#[cfg(feature = "serde")]
pub use json::*;

pub(crate) use workspace::*;
