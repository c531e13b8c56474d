//! qpdual algebra module.
//!
//! This module implements the dense vector and matrix operations required
//! by the solver.   Problems posed to an active-set solver in a control
//! loop are small and dense, so everything here is implemented with
//! straightforward native loops over column-major storage.

mod error_types;
mod floats;
mod matrix;
mod vecmath;

pub use error_types::*;
pub use floats::*;
pub use matrix::*;
pub use vecmath::*;
