#![allow(non_snake_case)]

use crate::algebra::{
    hvcat_dim_check, BlockConcatenate, FloatT, Matrix, MatrixConcatenationError, ShapedMatrix,
};

impl<T> BlockConcatenate for Matrix<T>
where
    T: FloatT,
{
    fn hcat(A: &Self, B: &Self) -> Self {
        //first check for compatible row dimensions
        assert_eq!(A.m, B.m);

        //dimensions for C = [A B];
        let m = A.m; //rows
        let n = A.n + B.n; //cols s
        let mut data = A.data.clone();
        data.extend(&B.data);
        Self { m, n, data }
    }

    fn vcat(A: &Self, B: &Self) -> Self {
        //first check for compatible column dimensions
        assert_eq!(A.n, B.n);

        //dimensions for C = [A; B];
        let m = A.m + B.m; //rows C
        let n = A.n; //cols C
        let mut data = Vec::with_capacity(m * n);

        for col in 0..A.ncols() {
            data.extend(A.col_slice(col));
            data.extend(B.col_slice(col));
        }
        Self { m, n, data }
    }

    fn hvcat(mats: &[&[&Self]]) -> Result<Self, MatrixConcatenationError> {
        // check for consistent block dimensions
        hvcat_dim_check(mats)?;

        // dimensions are consistent, so count total rows
        // and columns by counting along the border
        let nrows = mats.iter().map(|blockrow| blockrow[0].nrows()).sum();
        let ncols = mats[0].iter().map(|topblock| topblock.ncols()).sum();

        let mut data = Vec::with_capacity(nrows * ncols);

        // every matrix in a block-column has the same number of
        // columns, so walk them column by column
        for blockcol in 0..mats[0].len() {
            for col in 0..mats[0][blockcol].ncols() {
                for blockrow in mats {
                    data.extend(blockrow[blockcol].col_slice(col));
                }
            }
        }
        Ok(Self::new((nrows, ncols), data))
    }
}

#[test]
fn test_dense_concatenate() {
    let A = Matrix::from(&[
        [1., 3.], //
        [2., 4.], //
    ]);
    let B = Matrix::from(&[
        [5., 7.], //
        [6., 8.], //
    ]);

    let C = Matrix::hcat(&A, &B);

    let Ctest = Matrix::from(&[
        [1., 3., 5., 7.], //
        [2., 4., 6., 8.], //
    ]);

    assert_eq!(C, Ctest);

    let C = Matrix::vcat(&A, &B);

    let Ctest = Matrix::from(&[
        [1., 3.], //
        [2., 4.], //
        [5., 7.], //
        [6., 8.], //
    ]);

    assert_eq!(C, Ctest);
}

#[test]
fn test_dense_hvcat() {
    let Q = Matrix::from(&[
        [2., 1.], //
        [1., 3.], //
    ]);
    let C = Matrix::from(&[[1., 1.]]);
    let Ct = C.transpose();
    let Z = Matrix::zeros((1, 1));

    let K = Matrix::hvcat(&[&[&Q, &Ct], &[&C, &Z]]).unwrap();

    let Ktest = Matrix::from(&[
        [2., 1., 1.], //
        [1., 3., 1.], //
        [1., 1., 0.], //
    ]);
    assert_eq!(K, Ktest);

    // zero-row blocks are allowed
    let E = Matrix::<f64>::zeros((0, 2));
    let F = Matrix::<f64>::zeros((0, 1));
    let K = Matrix::hvcat(&[&[&Q, &Ct], &[&E, &F]]).unwrap();
    assert_eq!(K, Matrix::hcat(&Q, &Ct));

    // mismatched block rows fail
    assert!(Matrix::hvcat(&[&[&Q, &C]]).is_err());
}
