#![allow(non_snake_case)]
use qpdual::algebra::*;
use qpdual::solver::*;

fn main() {
    // QP Example
    //
    // min 0.5 x'Gx + g0'x
    // s.t. x1 + x2  = 1
    //      x1 - x2 <= 0.5

    let G = Matrix::from(&[[4., 1.], [1., 2.]]);
    let g0 = vec![1., 1.];

    let A_eq = Matrix::from(&[[1., 1.]]);
    let b_eq = vec![1.];

    let A_in = Matrix::from(&[[1., -1.]]);
    let b_in = vec![0.5];

    let settings = SolverSettingsBuilder::default()
        .verbose(true)
        .build()
        .unwrap();

    let mut solver = DualQPSolver::new(settings);

    solver.set_quadratic_cost(&G, &g0, 0.0).unwrap();
    solver.set_linear_equality_constraints(&A_eq, &b_eq).unwrap();
    solver
        .set_linear_inequality_constraints(&A_in, &b_in)
        .unwrap();

    let solution = solver.solve().unwrap();

    println!("Status   = {:?}", solution.status);
    println!("Solution = {:?}", solution.x);
    println!("Cost     = {:?}", solution.obj_val);
}
