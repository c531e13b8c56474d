//! __qpdual__ is a dense active-set solver for strictly convex quadratic
//! programs, implementing the dual method of Goldfarb and Idnani.  It solves
//! the following problem:
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}x^T G x + g_0^T x + c\\\\\[2ex\]
//!  \text{subject to} & A_E x = b_E \\\\\[1ex\]
//!         & A_I x \le b_I \\\\\[1ex\]
//!         & lb \le x \le ub
//!  \end{array}
//! $$
//!
//! with decision variables $x \in \mathbb{R}^n$ and a symmetric positive
//! definite cost matrix $G$.   Variable bounds are lowered internally into
//! additional inequality rows, so the solver works with a single unified
//! inequality block.
//!
//! The solver is designed for the inner loop of a whole-body robot
//! controller: one long-lived [`DualQPSolver`](crate::solver::DualQPSolver)
//! instance is posed and solved once per control tick.  All workspace
//! buffers are pre-sized at construction and reshaped in place, so no
//! allocation occurs inside the iteration loop.
//!
//! Uses the algorithm found in the paper "A numerically stable dual method
//! for solving strictly convex quadratic programs" by D. Goldfarb and
//! A. Idnani, Mathematical Programming 27 (1983).
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod solver;
