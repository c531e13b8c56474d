#![allow(non_snake_case)]
use qpdual::algebra::*;
use qpdual::solver::*;

fn main() {
    // box-constrained QP: the unconstrained minimizer (2, 2) clamps to
    // the upper bounds

    let G = Matrix::identity(2);
    let g0 = vec![-2., -2.];

    let mut solver = DualQPSolver::default();

    solver.set_quadratic_cost(&G, &g0, 0.0).unwrap();
    solver.set_lower_bounds(&[0., 0.]).unwrap();
    solver.set_upper_bounds(&[1., 1.]).unwrap();

    let solution = solver.solve().unwrap();

    println!("Status                 = {:?}", solution.status);
    println!("Solution               = {:?}", solution.x);
    println!("Upper bound multiplier = {:?}", solution.lagrange_ub);
}
