use crate::defaults::LINDEP_THRESHOLD;
use crate::error::LocalizationError;
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::prelude::*;

pub fn to_dmatrix(a: ArrayView2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Inverse square root S^(-1/2) of a symmetric positive definite matrix, computed from its
/// eigen-decomposition S = U s U^T as U s^(-1/2) U^T.
pub fn inv_sqrt(s: ArrayView2<f64>, name: &'static str) -> Result<Array2<f64>, LocalizationError> {
    let eig = SymmetricEigen::new(to_dmatrix(s));
    if eig.eigenvalues.iter().any(|&val| val < LINDEP_THRESHOLD) {
        return Err(LocalizationError::SingularMatrix { matrix: name });
    }
    let inv_sqrt_vals = eig.eigenvalues.map(|val| val.sqrt().recip());
    let x = &eig.eigenvectors * DMatrix::from_diagonal(&inv_sqrt_vals) * eig.eigenvectors.transpose();
    Ok(from_dmatrix(&x))
}

/// Symmetric (Löwdin) orthonormalization of the column vectors `c` with respect to the metric `s`:
///
/// C' = C (C^T S C)^(-1/2)
///
/// Afterwards C'^T S C' = 1 and C' spans the same space as C.
pub fn lowdin(c: ArrayView2<f64>, s: ArrayView2<f64>) -> Result<Array2<f64>, LocalizationError> {
    if c.ncols() == 0 {
        return Ok(c.to_owned());
    }
    let metric: Array2<f64> = c.t().dot(&s.dot(&c));
    let x: Array2<f64> = inv_sqrt(metric.view(), "metric of the vectors to orthogonalize")?;
    Ok(c.dot(&x))
}

/// Solves S X = B for a symmetric positive definite S by a Cholesky factorization.
pub fn cholesky_solve(
    s: ArrayView2<f64>,
    b: ArrayView2<f64>,
    name: &'static str,
) -> Result<Array2<f64>, LocalizationError> {
    if s.nrows() != b.nrows() {
        return Err(LocalizationError::DimensionMismatch {
            quantity: "right-hand side of the Cholesky solve",
            expected: s.nrows(),
            found: b.nrows(),
        });
    }
    let chol = to_dmatrix(s)
        .cholesky()
        .ok_or(LocalizationError::SingularMatrix { matrix: name })?;
    Ok(from_dmatrix(&chol.solve(&to_dmatrix(b))))
}
