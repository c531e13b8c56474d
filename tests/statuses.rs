#![allow(non_snake_case)]
use qpdual::algebra::*;
use qpdual::solver::*;

#[test]
fn test_degenerate_equalities() {
    // linearly dependent equality rows cannot all be added to the
    // active set
    let mut solver = DualQPSolver::<f64>::default();
    solver
        .set_quadratic_cost(&Matrix::identity(2), &[0., 0.], 0.0)
        .unwrap();
    solver
        .set_linear_equality_constraints(&Matrix::from(&[[1., 0.], [1., 0.]]), &[1., 2.])
        .unwrap();

    let solution = solver.solve().unwrap();

    assert_eq!(solution.status, SolverStatus::Degenerate);
    assert!(!solution.status.has_solution());
    assert!(solution.x.iter().all(|v| v.is_nan()));
    assert!(solution.obj_val.is_nan());
    assert!(solution.lagrange_eq.iter().all(|&v| v == 0.0));
}

#[test]
fn test_redundant_equalities_exceed_dimension() {
    // more equality rows than variables, all mutually consistent; the
    // surplus row is dependent by construction and must report as
    // degenerate rather than fault
    let mut solver = DualQPSolver::<f64>::default();
    solver
        .set_quadratic_cost(&Matrix::identity(1), &[0.], 0.0)
        .unwrap();
    solver
        .set_linear_equality_constraints(&Matrix::from(&[[1.], [1.]]), &[1., 1.])
        .unwrap();

    let solution = solver.solve().unwrap();

    assert_eq!(solution.status, SolverStatus::Degenerate);
    assert!(solution.x.iter().all(|v| v.is_nan()));
}

#[test]
fn test_infeasible_inequalities() {
    // x1 <= 0 and x1 >= 1 cannot both hold
    let mut solver = DualQPSolver::<f64>::default();
    solver
        .set_quadratic_cost(&Matrix::identity(2), &[0., 0.], 0.0)
        .unwrap();
    solver
        .set_linear_inequality_constraints(&Matrix::from(&[[1., 0.], [-1., 0.]]), &[0., -1.])
        .unwrap();

    let solution = solver.solve().unwrap();

    assert_eq!(solution.status, SolverStatus::Infeasible);
    assert!(!solution.status.has_solution());
    assert!(solution.x.iter().all(|v| v.is_nan()));
}

#[test]
fn test_infeasible_bounds() {
    // crossed box: lb above ub
    let mut solver = DualQPSolver::<f64>::default();
    solver
        .set_quadratic_cost(&Matrix::identity(2), &[0., 0.], 0.0)
        .unwrap();
    solver.set_lower_bounds(&[1., 0.]).unwrap();
    solver.set_upper_bounds(&[0., 1.]).unwrap();

    let solution = solver.solve().unwrap();

    assert_eq!(solution.status, SolverStatus::Infeasible);
}

#[test]
fn test_iteration_limit() {
    // a solve that needs at least two outer passes, capped at one
    let mut solver = DualQPSolver::<f64>::default();
    solver
        .set_quadratic_cost(&Matrix::from(&[[4., 1.], [1., 2.]]), &[1., 1.], 0.0)
        .unwrap();
    solver
        .set_linear_inequality_constraints(&Matrix::from(&[[1., -1.]]), &[-1.])
        .unwrap();
    solver.set_max_iterations(1);

    let solution = solver.solve().unwrap();

    assert_eq!(solution.status, SolverStatus::IterationLimitExceeded);
    assert_eq!(solution.iterations, 1);
    // the best iterate so far is still reported
    assert!(solution.status.has_solution());
    assert!(solution.x.iter().all(|v| v.is_finite()));
}

#[test]
fn test_not_positive_definite_cost() {
    let mut solver = DualQPSolver::<f64>::default();
    solver
        .set_quadratic_cost(&Matrix::from(&[[1., 0.], [0., -1.]]), &[0., 0.], 0.0)
        .unwrap();

    let result = solver.solve();
    assert!(matches!(result, Err(SolverError::IllPosedProblem)));
}

#[test]
fn test_status_display() {
    assert_eq!(format!("{}", SolverStatus::Optimal), "Optimal");
    assert_eq!(format!("{}", SolverStatus::Degenerate), "Degenerate");
    assert!(!SolverStatus::Infeasible.has_solution());
    assert!(SolverStatus::IterationLimitExceeded.has_solution());
}
