use super::SolverWorkspace;
use crate::algebra::*;

/// degeneracy / rotation threshold used throughout the active-set updates
pub(crate) const EPSILON: f64 = 1.0e-7;

/// Add the constraint whose transformed residual is currently in `ws.d`
/// to the active set.
///
/// Applies a sequence of Givens rotations zeroing all but the leading
/// `n_active + 1` entries of `d`, rotating the paired columns of `J` in
/// step, then copies the reduced `d` into the next column of `R`.
///
/// Returns `false` if the new constraint is linearly dependent on the
/// current active set (`|d[k]| < eps * R_norm`).  The ledger slot count
/// is still incremented in that case, exactly so that a subsequent
/// `delete_constraint` of the same index undoes the half-finished add.
pub(crate) fn add_constraint<T>(ws: &mut SolverWorkspace<T>) -> bool
where
    T: FloatT,
{
    let n = ws.n;
    let eps: T = EPSILON.as_T();

    // We have to find the Givens rotation which will reduce the element
    // d(j) to zero.  If it is already zero we leave it untouched and move
    // up a row.
    for j in ((ws.n_active + 1)..n).rev() {
        // The rotation is done with the matrix (cc ss; ss -cc).  If cc is
        // one, element (j) of d is already zero compared with element
        // (j - 1) and there is nothing to do.  If cc is zero we only swap
        // columns (j) and (j - 1) of J.  Otherwise apply the rotation to
        // both column pairs and update d(j - 1) to the hypotenuse h.
        let mut cc = ws.d[j - 1];
        let mut ss = ws.d[j];
        let h = distance(cc, ss);
        if h.abs() < eps {
            continue;
        }
        ws.d[j] = T::zero();
        ss /= h;
        cc /= h;
        if cc < T::zero() {
            cc = -cc;
            ss = -ss;
            ws.d[j - 1] = -h;
        } else {
            ws.d[j - 1] = h;
        }

        let xny = ss / (T::one() + cc);
        for k in 0..n {
            let t1 = ws.J[(k, j - 1)];
            let t2 = ws.J[(k, j)];
            ws.J[(k, j - 1)] = t1 * cc + t2 * ss;
            ws.J[(k, j)] = xny * (t1 + ws.J[(k, j - 1)]) - t2;
        }
    }

    ws.n_active += 1;

    // the reduced d becomes column n_active - 1 of R
    for i in 0..ws.n_active {
        ws.R[(i, ws.n_active - 1)] = ws.d[i];
    }

    if ws.d[ws.n_active - 1].abs() < eps * ws.r_norm {
        // the new constraint normal lies in the span of the active set
        return false;
    }

    ws.r_norm = T::max(ws.r_norm, ws.d[ws.n_active - 1].abs());
    true
}

/// Remove inequality constraint `target` (a unified inequality row index)
/// from the active set.
///
/// The ledger slot is located by value (restricted to slots at or above
/// `m_eq`, since equality rows are never removed), all entries and
/// multipliers above it are shifted left, and Givens rotations restore
/// `R` to upper triangular form with matching rotations applied to `J`.
pub(crate) fn delete_constraint<T>(ws: &mut SolverWorkspace<T>, target: usize)
where
    T: FloatT,
{
    let n = ws.n;
    let eps: T = EPSILON.as_T();

    // locate the ledger slot holding the target constraint
    let mut qq = ws.n_active;
    for i in ws.m_eq..ws.n_active {
        if ws.active[i] == target {
            qq = i;
            break;
        }
    }
    debug_assert!(qq < ws.n_active, "constraint {} is not active", target);

    // shift the ledger, the multipliers (including the pending slot at
    // n_active) and the columns of R down over the vacated slot
    for i in qq..ws.n_active - 1 {
        ws.active[i] = ws.active[i + 1];
        ws.lagrange[i] = ws.lagrange[i + 1];
        for j in 0..n {
            ws.R[(j, i)] = ws.R[(j, i + 1)];
        }
    }
    ws.active[ws.n_active - 1] = ws.active[ws.n_active];
    ws.lagrange[ws.n_active - 1] = ws.lagrange[ws.n_active];
    ws.active[ws.n_active] = 0;
    ws.lagrange[ws.n_active] = T::zero();
    for j in 0..ws.n_active {
        ws.R[(j, ws.n_active - 1)] = T::zero();
    }

    ws.n_active -= 1;

    if ws.n_active == 0 {
        return;
    }

    // restore R to upper triangular form
    for j in qq..ws.n_active {
        let mut cc = ws.R[(j, j)];
        let mut ss = ws.R[(j + 1, j)];
        let h = distance(cc, ss);

        if h.abs() < eps {
            continue;
        }

        cc /= h;
        ss /= h;
        ws.R[(j + 1, j)] = T::zero();

        if cc < T::zero() {
            ws.R[(j, j)] = -h;
            cc = -cc;
            ss = -ss;
        } else {
            ws.R[(j, j)] = h;
        }

        let xny = ss / (T::one() + cc);
        for k in (j + 1)..ws.n_active {
            let t1 = ws.R[(j, k)];
            let t2 = ws.R[(j + 1, k)];
            ws.R[(j, k)] = t1 * cc + t2 * ss;
            ws.R[(j + 1, k)] = xny * (t1 + ws.R[(j, k)]) - t2;
        }

        for k in 0..n {
            let t1 = ws.J[(k, j)];
            let t2 = ws.J[(k, j + 1)];
            ws.J[(k, j)] = t1 * cc + t2 * ss;
            ws.J[(k, j + 1)] = xny * (ws.J[(k, j)] + t1) - t2;
        }
    }
}

/// Stable hypotenuse `sqrt(a^2 + b^2)`, with the scaling branch selected
/// on magnitude to avoid overflow/underflow.
pub(crate) fn distance<T>(a: T, b: T) -> T
where
    T: FloatT,
{
    let a1 = a.abs();
    let b1 = b.abs();
    if a1 > b1 {
        let t = b1 / a1;
        a1 * T::sqrt(T::one() + t * t)
    } else if b1 > a1 {
        let t = a1 / b1;
        b1 * T::sqrt(T::one() + t * t)
    } else {
        a1 * T::sqrt((2.0).as_T())
    }
}

// ---------------------------------
// unit tests
// ---------------------------------

#[test]
fn test_distance() {
    assert_eq!(distance(3.0, 4.0), 5.0);
    assert_eq!(distance(-3.0, 4.0), 5.0);
    assert_eq!(distance(0.0, 0.0), 0.0);

    // no overflow for large arguments
    let h: f64 = distance(1e300, 1e300);
    assert!(h.is_finite() && h > 1e300);
}
