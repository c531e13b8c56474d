#![allow(non_snake_case)]
use qpdual::algebra::*;
use qpdual::solver::*;
use std::io::{Seek, SeekFrom};

fn main() {
    // dump a posed problem to a JSON file and recover it

    let G = Matrix::from(&[[4., 1.], [1., 2.]]);
    let g0 = vec![1., 1.];

    let mut solver = DualQPSolver::default();
    solver.set_quadratic_cost(&G, &g0, 0.0).unwrap();
    solver.set_lower_bounds(&[0., 0.]).unwrap();

    let mut file = tempfile::tempfile().unwrap();
    solver.write_to_file(&mut file).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let mut recovered = DualQPSolver::<f64>::read_from_file(&mut file).unwrap();
    let solution = recovered.solve().unwrap();

    println!("Status   = {:?}", solution.status);
    println!("Solution = {:?}", solution.x);
}
