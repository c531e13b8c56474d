#![allow(non_snake_case)]
use qpdual::algebra::*;
use qpdual::solver::*;

fn sized_solver(n: usize) -> DualQPSolver<f64> {
    let mut solver = DualQPSolver::default();
    solver
        .set_quadratic_cost(&Matrix::identity(n), &vec![0.0; n], 0.0)
        .unwrap();
    solver
}

#[test]
fn test_cost_matrix_not_square() {
    let mut solver = DualQPSolver::default();
    let G = Matrix::zeros((2, 3));
    let result = solver.set_quadratic_cost(&G, &[0., 0.], 0.0);
    assert_eq!(result, Err(DataError::CostMatrixNotSquare { rows: 2, cols: 3 }));
}

#[test]
fn test_cost_vector_mismatch() {
    let mut solver = DualQPSolver::default();
    let result = solver.set_quadratic_cost(&Matrix::identity(2), &[0., 0., 0.], 0.0);
    assert!(matches!(result, Err(DataError::DimensionMismatch { .. })));
}

#[test]
fn test_constraints_before_cost() {
    let mut solver = DualQPSolver::<f64>::default();

    let A = Matrix::from(&[[1., 1.]]);
    assert_eq!(
        solver.set_linear_equality_constraints(&A, &[1.]),
        Err(DataError::MissingCost)
    );
    assert_eq!(
        solver.set_linear_inequality_constraints(&A, &[1.]),
        Err(DataError::MissingCost)
    );
    assert_eq!(solver.set_lower_bounds(&[0., 0.]), Err(DataError::MissingCost));
    assert_eq!(solver.set_upper_bounds(&[0., 0.]), Err(DataError::MissingCost));
}

#[test]
fn test_constraint_column_mismatch() {
    let mut solver = sized_solver(2);
    let A = Matrix::from(&[[1., 1., 1.]]);
    let result = solver.set_linear_equality_constraints(&A, &[1.]);
    assert!(matches!(result, Err(DataError::DimensionMismatch { .. })));
}

#[test]
fn test_constraint_offset_mismatch() {
    let mut solver = sized_solver(2);
    let A = Matrix::from(&[[1., 1.]]);
    let result = solver.set_linear_inequality_constraints(&A, &[1., 2.]);
    assert!(matches!(result, Err(DataError::DimensionMismatch { .. })));
}

#[test]
fn test_bound_length_mismatch() {
    let mut solver = sized_solver(3);
    assert!(matches!(
        solver.set_lower_bounds(&[0., 0.]),
        Err(DataError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        solver.set_upper_bounds(&[0., 0., 0., 0.]),
        Err(DataError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_solve_without_cost() {
    let mut solver = DualQPSolver::<f64>::default();
    let result = solver.solve();
    assert!(matches!(
        result,
        Err(SolverError::BadProblemData(DataError::MissingCost))
    ));
}

#[test]
fn test_stale_constraints_after_cost_redefinition() {
    // constraints posed for n = 2 become invalid when the cost is
    // replaced with n = 3
    let mut solver = sized_solver(2);
    solver
        .set_linear_equality_constraints(&Matrix::from(&[[1., 1.]]), &[1.])
        .unwrap();

    solver
        .set_quadratic_cost(&Matrix::identity(3), &[0., 0., 0.], 0.0)
        .unwrap();

    let result = solver.solve();
    assert!(matches!(
        result,
        Err(SolverError::BadProblemData(DataError::DimensionMismatch { .. }))
    ));
}

#[test]
fn test_clear_resets_everything() {
    let mut solver = sized_solver(2);
    solver
        .set_linear_inequality_constraints(&Matrix::from(&[[1., 0.]]), &[1.])
        .unwrap();
    solver.clear();

    // posing a constraint now fails again, as on a fresh solver
    assert_eq!(
        solver.set_lower_bounds(&[0., 0.]),
        Err(DataError::MissingCost)
    );
}
