#![allow(non_snake_case)]

use super::ProblemData;
use crate::algebra::*;

/// slot marker for equality constraints in the active-set ledger.
/// Equality rows are added once at bootstrap and never removed, so their
/// ledger slots are never searched by index.
pub(crate) const EQUALITY_SLOT: usize = usize::MAX;

/// Pre-sized scratch state for one solve.
///
/// Owned by the solver instance and reshaped in place at the start of
/// every `solve` call.  Buffers only ever grow, so a solver that has seen
/// its maximum problem dimension once never allocates again; in
/// particular no allocation happens inside the iteration loop.
pub(crate) struct SolverWorkspace<T> {
    /// problem dimension
    pub n: usize,
    /// number of equality constraints
    pub m_eq: usize,
    /// unified inequality count (explicit + lowered bounds)
    pub m_in: usize,

    /// upper triangular factor of the active subspace.  Only the leading
    /// `n_active x n_active` block is valid; columns beyond it are stale.
    pub R: Matrix<T>,
    /// inverse-transform matrix.  `J*J' = G^-1` before any constraint is
    /// active; the trailing `n - n_active` columns span the null space of
    /// the active constraint normals.
    pub J: Matrix<T>,
    /// Cholesky scratch for the cost matrix
    pub G_chol: Matrix<T>,

    /// unified inequality normals, one per column (n x m_in)
    pub CI_total: Matrix<T>,
    /// unified inequality offsets (m_in)
    pub ci0_total: Vec<T>,

    /// current primal iterate
    pub x: Vec<T>,
    /// transformed residual `J' * np` of the candidate constraint normal
    pub d: Vec<T>,
    /// step direction in primal space (`z` in the paper)
    pub z: Vec<T>,
    /// negated step direction in dual space (`r` in the paper)
    pub r: Vec<T>,
    /// normal of the constraint being added
    pub np: Vec<T>,
    /// per-row inequality violations `s_i = CI_i'x + ci0_i`
    pub s: Vec<T>,
    /// multipliers of the active constraints, plus one pending slot
    pub lagrange: Vec<T>,

    /// snapshot of (x, lagrange, active set) for degenerate rollback
    pub prev_x: Vec<T>,
    pub prev_lagrange: Vec<T>,
    pub prev_active: Vec<usize>,

    /// active-set ledger: fixed-capacity slots plus the `n_active` count.
    /// The first `m_eq` slots hold [`EQUALITY_SLOT`]; the rest hold
    /// unified inequality row indices.
    pub active: Vec<usize>,
    pub n_active: usize,

    /// per unified inequality row: currently in the active set
    pub is_active: Vec<bool>,
    /// per unified inequality row: excluded from re-selection this pass
    /// after a degenerate add attempt
    pub excluded: Vec<bool>,

    /// running bound on the magnitude of `R`, for degeneracy detection
    pub r_norm: T,
}

// Vec::resize never releases capacity, so none of these allocate once the
// buffer has seen its maximum problem dimension.
fn resize_and_zero<T: FloatT>(v: &mut Vec<T>, len: usize) {
    v.resize(len, T::zero());
    v.set(T::zero());
}

fn resize_and_fill<V: Copy>(v: &mut Vec<V>, len: usize, value: V) {
    v.clear();
    v.resize(len, value);
}

impl<T> SolverWorkspace<T>
where
    T: FloatT,
{
    pub fn new(capacity: usize) -> Self {
        let n = capacity;
        Self {
            n: 0,
            m_eq: 0,
            m_in: 0,
            R: Matrix::zeros((n, n)),
            J: Matrix::zeros((n, n)),
            G_chol: Matrix::zeros((n, n)),
            CI_total: Matrix::zeros((n, 2 * n)),
            ci0_total: vec![T::zero(); 2 * n],
            x: vec![T::zero(); n],
            d: vec![T::zero(); n],
            z: vec![T::zero(); n],
            r: vec![T::zero(); 3 * n],
            np: vec![T::zero(); n],
            s: vec![T::zero(); 2 * n],
            lagrange: vec![T::zero(); 3 * n],
            prev_x: vec![T::zero(); n],
            prev_lagrange: vec![T::zero(); 3 * n],
            prev_active: vec![0; 3 * n],
            active: vec![0; 3 * n],
            n_active: 0,
            is_active: vec![false; 2 * n],
            excluded: vec![false; 2 * n],
            r_norm: T::one(),
        }
    }

    /// Reshape every buffer to the posed problem and zero the contents.
    /// Also compiles the unified inequality block from the problem store.
    pub fn reshape(&mut self, data: &ProblemData<T>) {
        let n = data.num_variables();
        let m_eq = data.num_equality_constraints();
        let m_in = data.num_unified_inequalities();
        let m_all = m_eq + m_in;

        self.n = n;
        self.m_eq = m_eq;
        self.m_in = m_in;

        self.R.reshape((n, n));
        self.J.reshape((n, n));
        self.G_chol.reshape((n, n));
        self.CI_total.reshape((n, m_in));

        resize_and_zero(&mut self.ci0_total, m_in);
        resize_and_zero(&mut self.x, n);
        resize_and_zero(&mut self.d, n);
        resize_and_zero(&mut self.z, n);
        resize_and_zero(&mut self.np, n);
        resize_and_zero(&mut self.s, m_in);
        resize_and_zero(&mut self.prev_x, n);

        // one extra slot beyond the ledger for the pending constraint
        resize_and_zero(&mut self.r, m_all + 1);
        resize_and_zero(&mut self.lagrange, m_all + 1);
        resize_and_zero(&mut self.prev_lagrange, m_all + 1);
        resize_and_fill(&mut self.active, m_all + 1, 0);
        resize_and_fill(&mut self.prev_active, m_all + 1, 0);
        resize_and_fill(&mut self.is_active, m_in, false);
        resize_and_fill(&mut self.excluded, m_in, false);

        self.n_active = 0;
        self.r_norm = T::one();

        data.compile_inequalities(&mut self.CI_total, &mut self.ci0_total);
    }
}
