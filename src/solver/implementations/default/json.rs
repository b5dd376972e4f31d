#![allow(non_snake_case)]
use crate::{
    algebra::*,
    solver::{DefaultSettings, DefaultSolver},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

/// Reading and writing of problems in JSON format
pub trait SolverJSONReadWrite: Sized {
    type SE;

    /// Write the problem data and settings to `file`
    fn save_to_file(&self, file: &mut File) -> Result<(), io::Error>;

    /// Read a problem from `file` and construct a solver for it.  If
    /// `settings` is given it replaces the settings stored in the file.
    fn load_from_file(file: &mut File, settings: Option<Self::SE>) -> Result<Self, io::Error>;
}

// Only the data provided by the user, with no internal types.

#[derive(Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
struct JsonProblemData<T: FloatT> {
    pub Q: Matrix<T>,
    pub p: Vec<T>,
    pub G: Matrix<T>,
    pub h: Vec<T>,
    pub A: Matrix<T>,
    pub b: Vec<T>,
    pub settings: DefaultSettings<T>,
}

impl<T> SolverJSONReadWrite for DefaultSolver<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    type SE = DefaultSettings<T>;

    fn save_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        // Q is written in the symmetrized form used by the solver
        let json_data = JsonProblemData {
            Q: self.data.Q.clone(),
            p: self.data.p.clone(),
            G: self.data.G.clone(),
            h: self.data.h.clone(),
            A: self.data.A.clone(),
            b: self.data.b.clone(),
            settings: self.settings.clone(),
        };

        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    fn load_from_file(
        file: &mut File,
        settings: Option<DefaultSettings<T>>,
    ) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let json_data: JsonProblemData<T> = serde_json::from_str(&buffer)?;

        let settings = settings.unwrap_or(json_data.settings);
        let JsonProblemData { Q, p, G, h, A, b, .. } = json_data;

        Self::new(&Q, &p, &G, &h, &A, &b, settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[test]
fn test_json_io() {
    use crate::solver::{ActiveSetSolver, DefaultSettingsBuilder};
    use std::io::{Seek, SeekFrom};

    let Q = Matrix::from(&[
        [2., 1.], //
        [1., 2.], //
    ]);
    let p = [-2., -5.];
    let G = Matrix::from(&[
        [-1., 2.], //
        [1., 2.],  //
    ]);
    let h = [2., 6.];
    let A = Matrix::zeros((0, 2));

    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .build()
        .unwrap();

    let mut solver = DefaultSolver::<f64>::new(&Q, &p, &G, &h, &A, &[], settings).unwrap();
    solver.solve();

    // write the problem to a file
    let mut file = tempfile::tempfile().unwrap();
    solver.save_to_file(&mut file).unwrap();

    // read the problem from the file
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut solver2 = DefaultSolver::<f64>::load_from_file(&mut file, None).unwrap();
    assert_eq!(solver.settings, solver2.settings);
    solver2.solve();
    assert_eq!(solver.solution.x, solver2.solution.x);

    // replacement settings take precedence
    file.seek(SeekFrom::Start(0)).unwrap();
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .max_iter(1)
        .build()
        .unwrap();
    let solver3 = DefaultSolver::<f64>::load_from_file(&mut file, Some(settings)).unwrap();
    assert_eq!(solver3.settings.max_iter, Some(1));
}
