#![allow(non_snake_case)]

use super::active_set::{add_constraint, delete_constraint, EPSILON};
use super::factorize::factorize;
use super::*;
use crate::algebra::*;
use std::time::Instant;
use thiserror::Error;

/// Error type returned by [`DualQPSolver::solve`].
///
/// These are hard failures indicating a badly posed problem; expected
/// numeric outcomes (infeasibility, recoverable degeneracy, the iteration
/// cap) are reported through [`SolverStatus`] instead.
#[derive(Error, Debug)]
pub enum SolverError {
    /// The cost matrix is not positive definite
    #[error("cost matrix is not positive definite")]
    IllPosedProblem,
    /// Problem data dimensions are inconsistent
    #[error(transparent)]
    BadProblemData(#[from] DataError),
}

/// state machine of the dual iteration engine
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum QuadProgStep {
    ComputeConstraintViolations,
    FindMostViolatedConstraint,
    ComputeStepLength,
}

/// Dense dual active-set QP solver (Goldfarb-Idnani method).
///
/// Solves problems of the form
/// ```text
/// min 0.5 x'Gx + g0'x + c
/// s.t. CE x  = ce0
///      CI x <= ci0
///      lb <= x <= ub
/// ```
/// with `G` symmetric positive definite.   The same algorithm as in the
/// QuadProg++ and uQuadProg++ solvers; should work where some simpler
/// active-set solvers do not.
///
/// The solver is synchronous and not reentrant: one `solve` call runs to
/// completion, and a shared instance must be called strictly
/// sequentially (which `&mut self` already enforces).
pub struct DualQPSolver<T = f64>
where
    T: FloatT,
{
    pub(crate) data: ProblemData<T>,
    pub(crate) settings: SolverSettings<T>,
    ws: SolverWorkspace<T>,
}

impl<T> Default for DualQPSolver<T>
where
    T: FloatT,
{
    fn default() -> Self {
        Self::new(SolverSettings::default())
    }
}

impl<T> DualQPSolver<T>
where
    T: FloatT,
{
    /// Create a solver with workspace pre-sized to
    /// `settings.initial_capacity` variables.
    pub fn new(settings: SolverSettings<T>) -> Self {
        let capacity = settings.initial_capacity;
        Self {
            data: ProblemData::new(),
            settings,
            ws: SolverWorkspace::new(capacity),
        }
    }

    /// Create a solver from already-populated problem data.
    pub fn with_data(data: ProblemData<T>, settings: SolverSettings<T>) -> Self {
        let capacity = settings.initial_capacity.max(data.num_variables());
        Self {
            data,
            settings,
            ws: SolverWorkspace::new(capacity),
        }
    }

    /// Set the cost terms `0.5 x'Gx + g0'x + c`.
    pub fn set_quadratic_cost(&mut self, G: &Matrix<T>, g0: &[T], c: T) -> Result<(), DataError> {
        self.data.set_quadratic_cost(G, g0, c)
    }

    /// Set equality constraints `Ax = b`.
    pub fn set_linear_equality_constraints(
        &mut self,
        A: &Matrix<T>,
        b: &[T],
    ) -> Result<(), DataError> {
        self.data.set_linear_equality_constraints(A, b)
    }

    /// Set inequality constraints `Ax <= b`.
    pub fn set_linear_inequality_constraints(
        &mut self,
        A: &Matrix<T>,
        b: &[T],
    ) -> Result<(), DataError> {
        self.data.set_linear_inequality_constraints(A, b)
    }

    /// Set elementwise lower bounds `x >= lb`.
    pub fn set_lower_bounds(&mut self, lb: &[T]) -> Result<(), DataError> {
        self.data.set_lower_bounds(lb)
    }

    /// Set elementwise upper bounds `x <= ub`.
    pub fn set_upper_bounds(&mut self, ub: &[T]) -> Result<(), DataError> {
        self.data.set_upper_bounds(ub)
    }

    /// Drop all problem data.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn set_max_iterations(&mut self, max_iter: u32) {
        self.settings.max_iter = max_iter;
    }

    pub fn set_convergence_threshold(&mut self, threshold: T) {
        self.settings.convergence_threshold = threshold;
    }

    pub fn settings(&self) -> &SolverSettings<T> {
        &self.settings
    }

    /// Evaluate the objective at an arbitrary point, independent of any
    /// solve state.
    pub fn objective_cost(&self, x: &[T]) -> T {
        self.data.objective_cost(x)
    }

    /// Run one full solve on the posed problem.
    ///
    /// Returns `Err` only for setup contract violations (inconsistent
    /// dimensions, non-positive-definite cost); all numeric outcomes are
    /// reported through the solution's `status` field.
    pub fn solve(&mut self) -> Result<DualQPSolution<T>, SolverError> {
        let start = Instant::now();

        self.data.validate()?;

        self.ws.reshape(&self.data);

        let (status, iterations) = self.run_engine()?;
        let mut solution = DualQPSolution::pack(&self.data, &self.ws, status, iterations);
        solution.solve_time = start.elapsed().as_secs_f64();

        if self.settings.verbose {
            println!(
                "qpdual v{}: status = {}, iterations = {}, obj_val = {:?}, solve time = {:.3e}s",
                crate::VERSION,
                solution.status,
                solution.iterations,
                solution.obj_val,
                solution.solve_time,
            );
        }

        Ok(solution)
    }

    // ---------------------------------
    // dual iteration engine
    // ---------------------------------

    fn run_engine(&mut self) -> Result<(SolverStatus, u32), SolverError> {
        let ws = &mut self.ws;
        let data = &self.data;
        let eps: T = EPSILON.as_T();

        // preprocessing: factorize G, seed J = U^-1 and the unconstrained
        // minimizer.  c1*c2 estimates cond(G) and scales the convergence
        // test.
        let (c1, c2) = factorize(&data.G, &data.g0, ws)
            .map_err(|_| SolverError::IllPosedProblem)?;

        // bootstrap: add every equality constraint to the active set
        // unconditionally, stepping exactly onto it
        for eq in 0..ws.m_eq {
            // at most n independent normals fit in R; any further equality
            // row is necessarily dependent on the active set
            if ws.n_active == ws.n {
                return Ok((SolverStatus::Degenerate, 0));
            }

            ws.np.copy_from(data.CE.col_slice(eq));
            compute_d(ws);
            update_primal_step_direction(ws);
            update_infeasibility_multiplier(ws);

            // minimum step in primal space s.t. the constraint holds exactly
            let mut step = T::zero();
            if ws.z.dot(&ws.z).abs() > eps {
                step = (-ws.np.dot(&ws.x) - data.ce0[eq]) / ws.z.dot(&ws.np);
            }

            ws.x.axpy(step, &ws.z);

            // u = [u + step*r; step]
            let k = ws.n_active;
            ws.lagrange[k] = step;
            for i in 0..k {
                ws.lagrange[i] += step * ws.r[i];
            }

            ws.active[k] = EQUALITY_SLOT;
            if !add_constraint(ws) {
                // equality constraints are linearly dependent
                return Ok((SolverStatus::Degenerate, 0));
            }
        }

        let mut current_step = QuadProgStep::ComputeConstraintViolations;
        let mut iterations: u32 = 0;
        let mut most_violated: usize = 0;
        let mut partial_target: usize = 0;
        // assigned on every pass through ComputeStepLength, the only arm
        // that falls through to the dispatch below
        let mut step_length;
        let mut full_step_length;

        loop {
            match current_step {
                QuadProgStep::ComputeConstraintViolations => {
                    if iterations == self.settings.max_iter {
                        return Ok((SolverStatus::IterationLimitExceeded, iterations));
                    }
                    iterations += 1;

                    if compute_constraint_violations(
                        ws,
                        c1,
                        c2,
                        self.settings.convergence_threshold,
                    ) {
                        // numerically there are no infeasibilities anymore
                        return Ok((SolverStatus::Optimal, iterations));
                    }
                    current_step = QuadProgStep::FindMostViolatedConstraint;
                    continue;
                }

                QuadProgStep::FindMostViolatedConstraint => {
                    // choose the most violated row among the inactive,
                    // non-excluded ones; ties break to the lowest index
                    let mut biggest_violation = T::zero();
                    most_violated = 0;
                    for row in 0..ws.m_in {
                        if ws.s[row] < biggest_violation && !ws.is_active[row] && !ws.excluded[row]
                        {
                            biggest_violation = ws.s[row];
                            most_violated = row;
                        }
                    }
                    if biggest_violation >= T::zero() {
                        // no violations left; the current iterate is optimal
                        return Ok((SolverStatus::Optimal, iterations));
                    }

                    ws.np.copy_from(ws.CI_total.col_slice(most_violated));
                    // u = [u 0]'
                    ws.lagrange[ws.n_active] = T::zero();
                    // add the violated constraint to the ledger (pending)
                    ws.active[ws.n_active] = most_violated;

                    current_step = QuadProgStep::ComputeStepLength;
                    continue;
                }

                QuadProgStep::ComputeStepLength => {
                    compute_d(ws);
                    update_primal_step_direction(ws);
                    update_infeasibility_multiplier(ws);

                    // partial step: the maximum step in dual space before
                    // some active multiplier hits zero
                    let mut partial_step_length = T::infinity();
                    for slot in ws.m_eq..ws.n_active {
                        if ws.r[slot] < T::zero() {
                            let candidate = -ws.lagrange[slot] / ws.r[slot];
                            if candidate < partial_step_length {
                                partial_step_length = candidate;
                                partial_target = ws.active[slot];
                            }
                        }
                    }

                    // full step: the minimum step in primal space making
                    // the violated constraint feasible
                    full_step_length = T::infinity();
                    if ws.z.dot(&ws.z).abs() > eps {
                        full_step_length = -ws.s[most_violated] / ws.z.dot(&ws.np);
                        if full_step_length < T::zero() {
                            // numerical inconsistency patch (Takano Akio)
                            full_step_length = T::infinity();
                        }
                    }

                    step_length = T::min(partial_step_length, full_step_length);
                }
            }

            // dispatch on the step just computed
            if !step_length.is_finite() {
                // no step in primal or dual space restores feasibility
                return Ok((SolverStatus::Infeasible, iterations));
            }

            if !full_step_length.is_finite() {
                // step in dual space only: drop the blocking constraint
                // and recompute, without adding the violated one yet
                take_dual_step(ws, step_length);
                ws.is_active[partial_target] = false;
                delete_constraint(ws, partial_target);
                current_step = QuadProgStep::ComputeStepLength;
                continue;
            }

            // step in both primal and dual space
            ws.x.axpy(step_length, &ws.z);
            take_dual_step(ws, step_length);

            if (step_length - full_step_length).abs() < eps {
                // a full step was taken: the violated constraint is now
                // satisfied exactly and joins the active set
                if add_constraint(ws) {
                    ws.is_active[most_violated] = true;
                    current_step = QuadProgStep::ComputeConstraintViolations;
                } else {
                    // degenerate: undo the half-finished add and roll back
                    // to the saved iterate, excluding this row for the
                    // remainder of the pass
                    ws.excluded[most_violated] = true;
                    delete_constraint(ws, most_violated);
                    rollback(ws);
                    current_step = QuadProgStep::FindMostViolatedConstraint;
                }
            } else {
                // a genuine partial step: drop the blocking constraint and
                // refresh the violated row's residual
                ws.is_active[partial_target] = false;
                delete_constraint(ws, partial_target);

                ws.s[most_violated] = ws.CI_total.col_slice(most_violated).dot(&ws.x)
                    + ws.ci0_total[most_violated];
                current_step = QuadProgStep::ComputeStepLength;
            }
        }
    }
}

/// d = J' * np
fn compute_d<T: FloatT>(ws: &mut SolverWorkspace<T>) {
    ws.J.gemv(&mut ws.d, MatrixShape::T, &ws.np, T::one(), T::zero());
}

/// z = J_{:,k..n} * d_{k..n}: the step direction in primal space
fn update_primal_step_direction<T: FloatT>(ws: &mut SolverWorkspace<T>) {
    for i in 0..ws.n {
        let mut sum = T::zero();
        for j in ws.n_active..ws.n {
            sum += ws.J[(i, j)] * ws.d[j];
        }
        ws.z[i] = sum;
    }
}

/// r = -R^-1 * d over the active block, by back-substitution: the negated
/// step direction in dual space.  Since `r` itself is negated, the
/// coupling sum enters with the same sign as `d`.
fn update_infeasibility_multiplier<T: FloatT>(ws: &mut SolverWorkspace<T>) {
    for i in (0..ws.n_active).rev() {
        let mut sum = T::zero();
        for j in (i + 1)..ws.n_active {
            sum += ws.R[(i, j)] * ws.r[j];
        }
        ws.r[i] = -(ws.d[i] + sum) / ws.R[(i, i)];
    }
}

/// u = u + t*[r; 1]
fn take_dual_step<T: FloatT>(ws: &mut SolverWorkspace<T>, step_length: T) {
    for i in 0..ws.n_active {
        ws.lagrange[i] += step_length * ws.r[i];
    }
    ws.lagrange[ws.n_active] += step_length;
}

/// Evaluate `s_i = CI_i'x + ci0_i` for every unified inequality row and
/// check the optimality condition: the sum of violations is negligible
/// relative to the problem scale.   On continuation, re-derives the
/// per-row active flags, clears the exclusion set and snapshots
/// `(x, u, active)` for a possible degenerate rollback.
fn compute_constraint_violations<T: FloatT>(
    ws: &mut SolverWorkspace<T>,
    c1: T,
    c2: T,
    threshold: T,
) -> bool {
    let mut total_violation = T::zero();
    for row in 0..ws.m_in {
        ws.excluded[row] = false;
        ws.is_active[row] = false;
        let value = ws.CI_total.col_slice(row).dot(&ws.x) + ws.ci0_total[row];
        ws.s[row] = value;
        total_violation += T::min(T::zero(), value);
    }
    for slot in ws.m_eq..ws.n_active {
        ws.is_active[ws.active[slot]] = true;
    }

    let m_in: T = ws.m_in.as_T();
    if total_violation.abs() < m_in * threshold * c1 * c2 * (100.0).as_T() {
        return true;
    }

    // save u, x and the active set for rollback
    let k = ws.n_active;
    ws.prev_lagrange[..k].copy_from(&ws.lagrange[..k]);
    ws.prev_active[..k].copy_from_slice(&ws.active[..k]);
    ws.prev_x.copy_from(&ws.x);
    false
}

/// Restore the snapshot taken at the top of the outer pass.
fn rollback<T: FloatT>(ws: &mut SolverWorkspace<T>) {
    let k = ws.n_active;
    ws.lagrange[..k].copy_from(&ws.prev_lagrange[..k]);
    ws.active[..k].copy_from_slice(&ws.prev_active[..k]);
    ws.x.copy_from(&ws.prev_x);

    for flag in ws.is_active.iter_mut() {
        *flag = false;
    }
    for slot in ws.m_eq..k {
        ws.is_active[ws.active[slot]] = true;
    }
}
