use super::{ProblemData, SolverWorkspace, EQUALITY_SLOT};
use crate::algebra::*;

/// Status of the solver at termination
#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
pub enum SolverStatus {
    /// Solver terminated with an optimal solution.
    Optimal,
    /// No step restores primal feasibility.  The solution vector is
    /// filled with NaN.
    Infeasible,
    /// The equality constraints are linearly dependent.  The solution
    /// vector is filled with NaN.
    Degenerate,
    /// Iteration limit reached.  The solution carries the best iterate
    /// found so far, which may be non-optimal and/or infeasible.
    IterationLimitExceeded,
}

impl SolverStatus {
    /// true when a usable solution vector was produced
    pub fn has_solution(&self) -> bool {
        matches!(
            *self,
            SolverStatus::Optimal | SolverStatus::IterationLimitExceeded
        )
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Result of one solve.
///
/// Lagrange multipliers are reported per block, in the caller's
/// constraint ordering, with inactive entries exactly zero.  Callers
/// must branch on `status`, not on NaN inspection of `x`.
#[derive(Debug, Clone)]
pub struct DualQPSolution<T> {
    /// primal solution
    pub x: Vec<T>,
    /// multipliers of the equality constraints
    pub lagrange_eq: Vec<T>,
    /// multipliers of the explicit inequality constraints
    pub lagrange_ineq: Vec<T>,
    /// multipliers of the lower bound rows
    pub lagrange_lb: Vec<T>,
    /// multipliers of the upper bound rows
    pub lagrange_ub: Vec<T>,
    /// objective value at `x` (NaN unless `status.has_solution()`)
    pub obj_val: T,
    /// number of outer iterations taken
    pub iterations: u32,
    /// solve time in seconds
    pub solve_time: f64,
    /// final solver status
    pub status: SolverStatus,
}

impl<T> DualQPSolution<T>
where
    T: FloatT,
{
    /// Read the terminal solver state out of the workspace.
    pub(crate) fn pack(
        data: &ProblemData<T>,
        ws: &SolverWorkspace<T>,
        status: SolverStatus,
        iterations: u32,
    ) -> Self {
        let n = data.num_variables();
        let m_in = data.num_inequality_constraints();
        let m_lb = data.num_lower_bounds();

        let mut sol = Self {
            x: vec![T::nan(); n],
            lagrange_eq: vec![T::zero(); data.num_equality_constraints()],
            lagrange_ineq: vec![T::zero(); m_in],
            lagrange_lb: vec![T::zero(); m_lb],
            lagrange_ub: vec![T::zero(); data.num_upper_bounds()],
            obj_val: T::nan(),
            iterations,
            solve_time: 0f64,
            status,
        };

        if !status.has_solution() {
            return sol;
        }

        sol.x.copy_from(&ws.x);
        sol.obj_val = data.objective_cost(&sol.x);

        // segment the active-set multipliers out into their owning blocks.
        // Equality rows were added to the ledger in caller order at
        // bootstrap, so slot index and equality index coincide.
        for slot in 0..ws.n_active {
            let lambda = ws.lagrange[slot];
            if slot < ws.m_eq {
                debug_assert!(ws.active[slot] == EQUALITY_SLOT);
                sol.lagrange_eq[slot] = lambda;
                continue;
            }
            let row = ws.active[slot];
            if row < m_in {
                sol.lagrange_ineq[row] = lambda;
            } else if row < m_in + m_lb {
                sol.lagrange_lb[row - m_in] = lambda;
            } else {
                sol.lagrange_ub[row - m_in - m_lb] = lambda;
            }
        }

        sol
    }
}
