#![allow(non_snake_case)]

use crate::algebra::*;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error type returned by the problem data setters.
///
/// All of these are caller programming errors and are raised at setup
/// time, before any solve work is done.   Data is never silently
/// truncated or padded to fit.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DataError {
    /// Two data dimensions that must agree do not
    #[error("dimension mismatch: {left_name} = {left} but {right_name} = {right}")]
    DimensionMismatch {
        left_name: &'static str,
        left: usize,
        right_name: &'static str,
        right: usize,
    },
    /// The quadratic cost matrix is not square
    #[error("cost matrix must be square, got {rows}x{cols}")]
    CostMatrixNotSquare { rows: usize, cols: usize },
    /// A constraint was posed before any quadratic cost
    #[error("no quadratic cost function has been set")]
    MissingCost,
}

/// Problem data store for one QP.
///
/// The problem held in the store is of the form
/// ```text
/// min 0.5 x'Gx + g0'x + c
/// s.t. CE'x + ce0  = 0
///      CI'x + ci0 >= 0
/// ```
/// i.e. constraint matrices are kept transposed and sign-flipped relative
/// to the caller's `Ax {=,<=} b` convention, since the dual algorithm
/// works on columns of constraint normals.   Callers only ever see the
/// standard convention through the setters.
///
/// Variable bounds are stored as plain vectors and lowered into unit
/// inequality rows when the unified inequality block is compiled at the
/// start of each solve.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct ProblemData<T = f64> {
    /// number of decision variables
    pub(crate) n: usize,
    /// quadratic cost matrix (n x n)
    pub(crate) G: Matrix<T>,
    /// linear cost vector (n)
    pub(crate) g0: Vec<T>,
    /// constant cost offset
    pub(crate) c: T,
    /// equality constraint normals, one per column (n x m_eq)
    pub(crate) CE: Matrix<T>,
    /// equality constraint offsets (m_eq)
    pub(crate) ce0: Vec<T>,
    /// explicit inequality constraint normals, one per column (n x m_in)
    pub(crate) CI: Matrix<T>,
    /// explicit inequality constraint offsets (m_in)
    pub(crate) ci0: Vec<T>,
    /// per-variable lower bounds, if set
    pub(crate) lb: Option<Vec<T>>,
    /// per-variable upper bounds, if set
    pub(crate) ub: Option<Vec<T>>,
}

impl<T> Default for ProblemData<T>
where
    T: FloatT,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProblemData<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self {
            n: 0,
            G: Matrix::zeros((0, 0)),
            g0: Vec::new(),
            c: T::zero(),
            CE: Matrix::zeros((0, 0)),
            ce0: Vec::new(),
            CI: Matrix::zeros((0, 0)),
            ci0: Vec::new(),
            lb: None,
            ub: None,
        }
    }

    /// Set the cost terms `0.5 x'Gx + g0'x + c`.
    ///
    /// `G` must be square and symmetric positive definite, and fixes the
    /// problem dimension `n` that all subsequent constraint data is
    /// validated against.
    pub fn set_quadratic_cost(&mut self, G: &Matrix<T>, g0: &[T], c: T) -> Result<(), DataError> {
        if !G.is_square() {
            return Err(DataError::CostMatrixNotSquare {
                rows: G.nrows(),
                cols: G.ncols(),
            });
        }
        if G.nrows() != g0.len() {
            return Err(DataError::DimensionMismatch {
                left_name: "G rows",
                left: G.nrows(),
                right_name: "g0 length",
                right: g0.len(),
            });
        }

        self.n = G.ncols();
        self.G = G.clone();
        self.g0 = g0.to_vec();
        self.c = c;
        Ok(())
    }

    /// Set equality constraints `Ax = b`, with `A` of size `m_eq x n`.
    pub fn set_linear_equality_constraints(
        &mut self,
        A: &Matrix<T>,
        b: &[T],
    ) -> Result<(), DataError> {
        self.check_constraint_dims(A, b)?;

        let m_eq = A.nrows();
        self.CE.reshape((self.n, m_eq));
        for row in 0..m_eq {
            for col in 0..self.n {
                self.CE[(col, row)] = -A[(row, col)];
            }
        }
        self.ce0.clear();
        self.ce0.extend_from_slice(b);
        Ok(())
    }

    /// Set inequality constraints `Ax <= b`, with `A` of size `m_in x n`.
    pub fn set_linear_inequality_constraints(
        &mut self,
        A: &Matrix<T>,
        b: &[T],
    ) -> Result<(), DataError> {
        self.check_constraint_dims(A, b)?;

        let m_in = A.nrows();
        self.CI.reshape((self.n, m_in));
        for row in 0..m_in {
            for col in 0..self.n {
                self.CI[(col, row)] = -A[(row, col)];
            }
        }
        self.ci0.clear();
        self.ci0.extend_from_slice(b);
        Ok(())
    }

    /// Set elementwise lower bounds `x >= lb`.
    pub fn set_lower_bounds(&mut self, lb: &[T]) -> Result<(), DataError> {
        self.check_bound_dims(lb, "lb length")?;
        self.lb = Some(lb.to_vec());
        Ok(())
    }

    /// Set elementwise upper bounds `x <= ub`.
    pub fn set_upper_bounds(&mut self, ub: &[T]) -> Result<(), DataError> {
        self.check_bound_dims(ub, "ub length")?;
        self.ub = Some(ub.to_vec());
        Ok(())
    }

    /// Drop all problem data, returning the store to its initial state.
    pub fn clear(&mut self) {
        self.n = 0;
        self.G.reshape((0, 0));
        self.g0.clear();
        self.c = T::zero();
        self.CE.reshape((0, 0));
        self.ce0.clear();
        self.CI.reshape((0, 0));
        self.ci0.clear();
        self.lb = None;
        self.ub = None;
    }

    /// Evaluate `0.5 x'Gx + g0'x + c` for an arbitrary `x`, independent
    /// of any solve state.
    pub fn objective_cost(&self, x: &[T]) -> T {
        assert_eq!(x.len(), self.n);
        let half: T = (0.5).as_T();
        half * self.G.quad_form(x) + self.g0.dot(x) + self.c
    }

    pub fn num_variables(&self) -> usize {
        self.n
    }

    pub fn num_equality_constraints(&self) -> usize {
        self.ce0.len()
    }

    pub fn num_inequality_constraints(&self) -> usize {
        self.ci0.len()
    }

    pub fn num_lower_bounds(&self) -> usize {
        self.lb.as_ref().map_or(0, Vec::len)
    }

    pub fn num_upper_bounds(&self) -> usize {
        self.ub.as_ref().map_or(0, Vec::len)
    }

    /// total unified inequality count after bound lowering
    pub(crate) fn num_unified_inequalities(&self) -> usize {
        self.num_inequality_constraints() + self.num_lower_bounds() + self.num_upper_bounds()
    }

    /// Compile explicit inequalities and bound rows into one unified
    /// block of constraint normals/offsets.   `CI_total` and `ci0_total`
    /// are workspace buffers already reshaped to `n x m_total` and
    /// `m_total`.
    ///
    /// Unified row ordering is: explicit inequalities, then lower bound
    /// rows (`+x_i >= lb_i`), then upper bound rows (`-x_i >= -ub_i`).
    pub(crate) fn compile_inequalities(&self, CI_total: &mut Matrix<T>, ci0_total: &mut [T]) {
        let (n, m_in) = (self.n, self.num_inequality_constraints());
        debug_assert_eq!(CI_total.size(), (n, self.num_unified_inequalities()));

        for col in 0..m_in {
            CI_total
                .col_slice_mut(col)
                .copy_from(self.CI.col_slice(col));
            ci0_total[col] = self.ci0[col];
        }

        let mut col = m_in;
        if let Some(lb) = &self.lb {
            for (i, &lbi) in lb.iter().enumerate() {
                CI_total[(i, col)] = T::one();
                ci0_total[col] = -lbi;
                col += 1;
            }
        }
        if let Some(ub) = &self.ub {
            for (i, &ubi) in ub.iter().enumerate() {
                CI_total[(i, col)] = -T::one();
                ci0_total[col] = ubi;
                col += 1;
            }
        }
    }

    /// Re-check internal consistency before a solve.   Catches the case
    /// where the cost was replaced with a different dimension after the
    /// constraints were posed.
    pub(crate) fn validate(&self) -> Result<(), DataError> {
        if self.n == 0 {
            return Err(DataError::MissingCost);
        }
        let checks = [
            ("equality rows", self.CE.ncols() > 0, self.CE.nrows()),
            ("inequality rows", self.CI.ncols() > 0, self.CI.nrows()),
            ("lb length", self.lb.is_some(), self.num_lower_bounds()),
            ("ub length", self.ub.is_some(), self.num_upper_bounds()),
        ];
        for (name, present, dim) in checks {
            if present && dim != self.n {
                return Err(DataError::DimensionMismatch {
                    left_name: "problem size",
                    left: self.n,
                    right_name: name,
                    right: dim,
                });
            }
        }
        Ok(())
    }

    fn check_constraint_dims(&self, A: &Matrix<T>, b: &[T]) -> Result<(), DataError> {
        if self.n == 0 {
            return Err(DataError::MissingCost);
        }
        if A.ncols() != self.n {
            return Err(DataError::DimensionMismatch {
                left_name: "constraint matrix columns",
                left: A.ncols(),
                right_name: "problem size",
                right: self.n,
            });
        }
        if A.nrows() != b.len() {
            return Err(DataError::DimensionMismatch {
                left_name: "constraint matrix rows",
                left: A.nrows(),
                right_name: "offset vector length",
                right: b.len(),
            });
        }
        Ok(())
    }

    fn check_bound_dims(&self, bound: &[T], name: &'static str) -> Result<(), DataError> {
        if self.n == 0 {
            return Err(DataError::MissingCost);
        }
        if bound.len() != self.n {
            return Err(DataError::DimensionMismatch {
                left_name: name,
                left: bound.len(),
                right_name: "problem size",
                right: self.n,
            });
        }
        Ok(())
    }
}
