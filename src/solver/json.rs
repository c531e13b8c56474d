use super::{DualQPSolver, ProblemData, SolverSettings};
use crate::algebra::FloatT;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

// The posed problem and the settings, exactly as held by the solver.
// Dumping a problem that misbehaved in a control loop and reloading it
// offline reproduces the solve bit-for-bit.

#[derive(Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
struct JsonProblemData<T: FloatT> {
    pub data: ProblemData<T>,
    pub settings: SolverSettings<T>,
}

/// Read and write posed problems to JSON files.
pub trait SolverJSONReadWrite: Sized {
    /// Write the posed problem and settings to a file.
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error>;
    /// Recover a solver from a problem file.
    fn read_from_file(file: &mut File) -> Result<Self, io::Error>;
}

impl<T> SolverJSONReadWrite for DualQPSolver<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let json_data = JsonProblemData {
            data: self.data.clone(),
            settings: self.settings.clone(),
        };
        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let json_data: JsonProblemData<T> = serde_json::from_str(&buffer)?;

        Ok(Self::with_data(json_data.data, json_data.settings))
    }
}

#[test]
fn test_json_io() {
    use crate::algebra::Matrix;
    use std::io::{Seek, SeekFrom};

    let mut solver = DualQPSolver::<f64>::default();
    solver
        .set_quadratic_cost(&Matrix::from(&[[2.0]]), &[1.0], 0.0)
        .unwrap();
    solver
        .set_linear_inequality_constraints(&Matrix::from(&[[-1.0]]), &[-2.0])
        .unwrap();

    let mut file = tempfile::tempfile().unwrap();
    solver.write_to_file(&mut file).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let mut solver2 = DualQPSolver::<f64>::read_from_file(&mut file).unwrap();

    let sol1 = solver.solve().unwrap();
    let sol2 = solver2.solve().unwrap();

    assert_eq!(sol1.status, sol2.status);
    assert_eq!(sol1.x, sol2.x);
}
