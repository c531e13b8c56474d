#![allow(non_snake_case)]

use super::SolverWorkspace;
use crate::algebra::*;

/// Factorize the cost matrix and seed the dual iteration.
///
/// Computes the upper Cholesky factor `U` of `G` (`G = U'U`), sets
/// `J = U^-1` so that `J*J' = G^-1`, and places the unconstrained
/// minimizer `x0 = -J*J'*g0` in the workspace.  This point is feasible in
/// the dual space (and generally infeasible w.r.t. the constraints).
///
/// Returns `(c1, c2) = (trace(G), trace(J))`, whose product is used by
/// the engine as a scale estimate for the convergence test.
pub(crate) fn factorize<T>(
    G: &Matrix<T>,
    g0: &[T],
    ws: &mut SolverWorkspace<T>,
) -> Result<(T, T), DenseFactorizationError>
where
    T: FloatT,
{
    let n = ws.n;
    let c1 = G.trace();

    ws.G_chol.copy_from_slice(G.data());
    cholesky_upper(&mut ws.G_chol)?;

    // J starts as the inverse of the factor: copy the upper triangle
    // (the strict lower triangle of the scratch still holds entries of G)
    // and invert in place.
    ws.J.data_mut().set(T::zero());
    for j in 0..n {
        for i in 0..=j {
            ws.J[(i, j)] = ws.G_chol[(i, j)];
        }
    }
    triangular_invert(&mut ws.J);
    let c2 = ws.J.trace();

    // x = -G^-1 g0 = -J * (J' * g0)
    ws.J.gemv(&mut ws.d, MatrixShape::T, g0, T::one(), T::zero());
    ws.J.gemv(&mut ws.x, MatrixShape::N, &ws.d, -T::one(), T::zero());

    Ok((c1, c2))
}

/// In-place upper Cholesky factorization `A = U'U`.
///
/// Only the upper triangle is referenced or written; the strict lower
/// triangle is left untouched.  Errs if `A` is not positive definite.
pub(crate) fn cholesky_upper<T>(A: &mut Matrix<T>) -> Result<(), DenseFactorizationError>
where
    T: FloatT,
{
    if !A.is_square() {
        return Err(DenseFactorizationError::IncompatibleDimension);
    }
    let n = A.nrows();
    let mat = A.data_mut();

    for j in 0..n {
        for k in 0..j {
            mat[k + j * n] = (mat[k + j * n]
                - mat[k * n..k * n + k].dot(&mat[j * n..j * n + k]))
                / mat[k + k * n];
        }

        let s = mat[j + j * n] - mat[j * n..j * n + j].dot(&mat[j * n..j * n + j]);
        if s <= T::zero() {
            return Err(DenseFactorizationError::NotPositiveDefinite);
        }
        mat[j + j * n] = s.sqrt();
    }
    Ok(())
}

/// Invert an upper triangular matrix in place.
pub(crate) fn triangular_invert<T>(A: &mut Matrix<T>)
where
    T: FloatT,
{
    assert!(A.is_square());
    let n = A.nrows();
    let mat = A.data_mut();

    for k in 0..n {
        mat[k + k * n] = T::recip(mat[k + k * n]);
        let dkk = mat[k + k * n];
        mat[k * n..k * n + k].scale(-dkk);

        let (left, right) = mat.split_at_mut(n + k * n);

        for j in 0..n - k - 1 {
            let a = right[k + j * n];
            right[j * n..j * n + k].axpy(a, &left[k * n..k * n + k]);
            right[k + j * n] *= left[k + k * n];
        }
    }
}

// ---------------------------------
// unit tests
// ---------------------------------

#[test]
fn test_cholesky_upper() {
    #[rustfmt::skip]
    let S = Matrix::<f64>::from(
        &[[ 8., -2., 4.],
          [-2., 12., 2.],
          [ 4.,  2., 6.]]);

    let mut U = S.clone();
    assert!(cholesky_upper(&mut U).is_ok());

    // check S = U'U over the upper triangle
    for i in 0..3 {
        for j in i..3 {
            let mut uij = 0.0;
            for k in 0..=i {
                uij += U[(k, i)] * U[(k, j)];
            }
            assert!((uij - S[(i, j)]).abs() < 1e-12);
        }
    }
}

#[test]
fn test_cholesky_not_positive_definite() {
    #[rustfmt::skip]
    let mut S = Matrix::<f64>::from(
        &[[1., 2.],
          [2., 1.]]);

    assert!(matches!(
        cholesky_upper(&mut S),
        Err(DenseFactorizationError::NotPositiveDefinite)
    ));
}

#[test]
fn test_triangular_invert() {
    #[rustfmt::skip]
    let U = Matrix::<f64>::from(
        &[[2., 1., 3.],
          [0., 4., 5.],
          [0., 0., 8.]]);

    let mut Uinv = U.clone();
    triangular_invert(&mut Uinv);

    // U * Uinv = I
    for i in 0..3 {
        for j in 0..3 {
            let mut pij = 0.0;
            for k in 0..3 {
                pij += U[(i, k)] * Uinv[(k, j)];
            }
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((pij - expected).abs() < 1e-12);
        }
    }
}
