#![allow(non_snake_case)]
use qpdual::algebra::*;
use qpdual::solver::*;

fn assert_slice_eq(a: &[f64], b: &[f64], tol: f64) {
    assert_eq!(a.len(), b.len());
    assert!(
        a.norm_inf_diff(b) <= tol,
        "slices differ: {:?} vs {:?}",
        a,
        b
    );
}

fn basic_qp_solver() -> DualQPSolver<f64> {
    let G = Matrix::from(&[[4., 1.], [1., 2.]]);
    let g0 = [1., 1.];

    let mut solver = DualQPSolver::default();
    solver.set_quadratic_cost(&G, &g0, 0.0).unwrap();
    solver
}

#[test]
fn test_unconstrained() {
    let mut solver = basic_qp_solver();
    let solution = solver.solve().unwrap();

    // x = -G^-1 g0
    assert_eq!(solution.status, SolverStatus::Optimal);
    assert_slice_eq(&solution.x, &[-1. / 7., -3. / 7.], 1e-10);
    assert!((solution.obj_val - (-2. / 7.)).abs() < 1e-10);
}

#[test]
fn test_equality_constrained() {
    let mut solver = basic_qp_solver();
    solver
        .set_linear_equality_constraints(&Matrix::from(&[[1., 1.]]), &[1.])
        .unwrap();

    let solution = solver.solve().unwrap();

    assert_eq!(solution.status, SolverStatus::Optimal);
    assert_slice_eq(&solution.x, &[0.25, 0.75], 1e-10);
    assert!((solution.obj_val - 1.875).abs() < 1e-10);

    // stationarity: Gx + g0 + A_eq' v = 0
    let v = solution.lagrange_eq[0];
    let grad = [
        4. * solution.x[0] + solution.x[1] + 1. + v,
        solution.x[0] + 2. * solution.x[1] + 1. + v,
    ];
    assert_slice_eq(&grad, &[0., 0.], 1e-10);
}

#[test]
fn test_inequality_active() {
    // x1 - x2 <= -1 cuts off the unconstrained minimizer
    let mut solver = basic_qp_solver();
    solver
        .set_linear_inequality_constraints(&Matrix::from(&[[1., -1.]]), &[-1.])
        .unwrap();

    let solution = solver.solve().unwrap();

    assert_eq!(solution.status, SolverStatus::Optimal);
    assert_slice_eq(&solution.x, &[-0.625, 0.375], 1e-10);
    assert!(solution.lagrange_ineq[0] > 0.0);
    assert!((solution.lagrange_ineq[0] - 1.125).abs() < 1e-10);
}

#[test]
fn test_inequality_inactive() {
    // a slack constraint must not move the solution and must report a
    // zero multiplier
    let mut solver = basic_qp_solver();
    solver
        .set_linear_inequality_constraints(&Matrix::from(&[[1., 0.]]), &[10.])
        .unwrap();

    let solution = solver.solve().unwrap();

    assert_eq!(solution.status, SolverStatus::Optimal);
    assert_slice_eq(&solution.x, &[-1. / 7., -3. / 7.], 1e-10);
    assert_eq!(solution.lagrange_ineq[0], 0.0);
}

#[test]
fn test_coupled_active_constraints() {
    // three constraints with mutually non-orthogonal normals all bind at
    // the optimum, so the dual back-substitution has to carry the
    // off-diagonal coupling of the triangular factor through two active
    // rows.  Constructed from the KKT conditions: with x = (1, 1, 1) and
    // u = (1, 1, 1),
    //   g0 = -x - A'u = (-2, -3, -4),  b = Ax = (3, 2, 1)
    let G = Matrix::identity(3);
    let g0 = [-2., -3., -4.];
    let A = Matrix::from(&[[1., 1., 1.], [0., 1., 1.], [0., 0., 1.]]);
    let b = [3., 2., 1.];

    let mut solver = DualQPSolver::<f64>::default();
    solver.set_quadratic_cost(&G, &g0, 0.0).unwrap();
    solver.set_linear_inequality_constraints(&A, &b).unwrap();

    let solution = solver.solve().unwrap();

    assert_eq!(solution.status, SolverStatus::Optimal);
    assert_slice_eq(&solution.x, &[1., 1., 1.], 1e-10);
    assert_slice_eq(&solution.lagrange_ineq, &[1., 1., 1.], 1e-10);
}

#[test]
fn test_upper_bounds_active() {
    let G = Matrix::identity(2);
    let g0 = [-2., -2.];

    let mut solver = DualQPSolver::default();
    solver.set_quadratic_cost(&G, &g0, 0.0).unwrap();
    solver.set_lower_bounds(&[0., 0.]).unwrap();
    solver.set_upper_bounds(&[1., 1.]).unwrap();

    let solution = solver.solve().unwrap();

    assert_eq!(solution.status, SolverStatus::Optimal);
    assert_slice_eq(&solution.x, &[1., 1.], 1e-10);
    assert_slice_eq(&solution.lagrange_ub, &[1., 1.], 1e-10);
    assert_slice_eq(&solution.lagrange_lb, &[0., 0.], 1e-10);
}

#[test]
fn test_lower_bounds_active() {
    let G = Matrix::identity(2);
    let g0 = [1., -1.];

    let mut solver = DualQPSolver::default();
    solver.set_quadratic_cost(&G, &g0, 0.0).unwrap();
    solver.set_lower_bounds(&[0., 0.]).unwrap();

    let solution = solver.solve().unwrap();

    assert_eq!(solution.status, SolverStatus::Optimal);
    assert_slice_eq(&solution.x, &[0., 1.], 1e-10);
    assert_slice_eq(&solution.lagrange_lb, &[1., 0.], 1e-10);
}

#[test]
fn test_mixed_constraints_kkt() {
    // equality plus bounds plus an explicit inequality; verify the KKT
    // conditions rather than a precomputed point
    let G = Matrix::from(&[[3., 0.5, 0.], [0.5, 2., 0.3], [0., 0.3, 1.]]);
    let g0 = [-1., 2., -3.];
    let A_eq = Matrix::from(&[[1., 1., 1.]]);
    let b_eq = [1.];
    let A_in = Matrix::from(&[[1., -1., 0.]]);
    let b_in = [0.2];
    let lb = [-1., -1., -1.];
    let ub = [1., 1., 1.];

    let mut solver = DualQPSolver::<f64>::default();
    solver.set_quadratic_cost(&G, &g0, 0.0).unwrap();
    solver.set_linear_equality_constraints(&A_eq, &b_eq).unwrap();
    solver
        .set_linear_inequality_constraints(&A_in, &b_in)
        .unwrap();
    solver.set_lower_bounds(&lb).unwrap();
    solver.set_upper_bounds(&ub).unwrap();

    let solution = solver.solve().unwrap();
    assert_eq!(solution.status, SolverStatus::Optimal);
    let x = &solution.x;

    // primal feasibility
    assert!((x[0] + x[1] + x[2] - 1.).abs() < 1e-9);
    assert!(x[0] - x[1] <= 0.2 + 1e-9);
    for i in 0..3 {
        assert!(x[i] >= lb[i] - 1e-9 && x[i] <= ub[i] + 1e-9);
    }

    // dual feasibility
    assert!(solution.lagrange_ineq.iter().all(|&u| u >= 0.0));
    assert!(solution.lagrange_lb.iter().all(|&u| u >= 0.0));
    assert!(solution.lagrange_ub.iter().all(|&u| u >= 0.0));

    // stationarity: Gx + g0 + A_eq'v + A_in'u - u_lb + u_ub = 0
    let mut grad = vec![0.0; 3];
    G.gemv(&mut grad, MatrixShape::N, x, 1.0, 0.0);
    for i in 0..3 {
        grad[i] += g0[i];
        grad[i] += A_eq[(0, i)] * solution.lagrange_eq[0];
        grad[i] += A_in[(0, i)] * solution.lagrange_ineq[0];
        grad[i] -= solution.lagrange_lb[i];
        grad[i] += solution.lagrange_ub[i];
    }
    assert!(grad.norm_inf() < 1e-9);
}

#[test]
fn test_solve_is_deterministic() {
    let mut solver = basic_qp_solver();
    solver
        .set_linear_inequality_constraints(&Matrix::from(&[[1., -1.]]), &[-1.])
        .unwrap();

    let first = solver.solve().unwrap();
    let second = solver.solve().unwrap();

    assert_eq!(first.status, second.status);
    assert_eq!(first.x, second.x);
    assert_eq!(first.iterations, second.iterations);
}

#[test]
fn test_solver_reuse_across_sizes() {
    // re-posing a differently sized problem on the same solver instance
    // must reshape the workspace cleanly
    let mut solver = basic_qp_solver();
    let solution = solver.solve().unwrap();
    assert_eq!(solution.status, SolverStatus::Optimal);

    solver.clear();
    solver
        .set_quadratic_cost(&Matrix::identity(3), &[-1., -2., -3.], 0.0)
        .unwrap();
    solver.set_upper_bounds(&[0.5, 0.5, 0.5]).unwrap();

    let solution = solver.solve().unwrap();
    assert_eq!(solution.status, SolverStatus::Optimal);
    assert_slice_eq(&solution.x, &[0.5, 0.5, 0.5], 1e-10);
}

#[test]
fn test_objective_offset() {
    let mut solver = basic_qp_solver();
    let base = solver.solve().unwrap();

    let G = Matrix::from(&[[4., 1.], [1., 2.]]);
    solver.set_quadratic_cost(&G, &[1., 1.], 5.0).unwrap();
    let shifted = solver.solve().unwrap();

    assert_slice_eq(&shifted.x, &base.x, 1e-12);
    assert!((shifted.obj_val - base.obj_val - 5.0).abs() < 1e-12);
}

#[test]
fn test_f32_solve() {
    let G = Matrix::<f32>::from(&[[4., 1.], [1., 2.]]);
    let g0 = [1f32, 1.];

    let mut solver = DualQPSolver::<f32>::default();
    solver.set_quadratic_cost(&G, &g0, 0.0).unwrap();
    solver.set_lower_bounds(&[0., 0.]).unwrap();

    let solution = solver.solve().unwrap();
    assert_eq!(solution.status, SolverStatus::Optimal);
    assert!(solution.x.norm_inf_diff(&[0f32, 0.]) < 1e-5);
}
