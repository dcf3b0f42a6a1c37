use crate::error::LocalizationError;
use crate::jacobi::check_labels;
use crate::linalg::{cholesky_solve, lowdin};
use ndarray::prelude::*;

/// Minimal reference basis that defines the intrinsic atomic orbitals. All integrals are
/// provided by the electronic structure code.
#[derive(Clone, Debug, PartialEq)]
pub struct MinimalBasis {
    /// Overlap matrix of the minimal basis functions, S22.
    pub overlap: Array2<f64>,
    /// Overlap between the computational basis (rows) and the minimal basis (columns), S12.
    pub cross_overlap: Array2<f64>,
    /// Atom index of every minimal basis function.
    pub labels: Vec<usize>,
}

impl MinimalBasis {
    pub fn new(
        overlap: Array2<f64>,
        cross_overlap: Array2<f64>,
        labels: Vec<usize>,
    ) -> Result<Self, LocalizationError> {
        let n_minao: usize = labels.len();
        if overlap.dim() != (n_minao, n_minao) {
            return Err(LocalizationError::DimensionMismatch {
                quantity: "overlap matrix of the minimal basis",
                expected: n_minao,
                found: overlap.nrows(),
            });
        }
        if cross_overlap.ncols() != n_minao {
            return Err(LocalizationError::DimensionMismatch {
                quantity: "columns of the cross overlap matrix",
                expected: n_minao,
                found: cross_overlap.ncols(),
            });
        }
        Ok(Self {
            overlap,
            cross_overlap,
            labels,
        })
    }

    pub fn n_functions(&self) -> usize {
        self.labels.len()
    }

    /// Checks the basis against a molecule with `n_orbs` atomic orbitals and `n_atoms` atoms.
    pub fn check(&self, n_orbs: usize, n_atoms: usize) -> Result<(), LocalizationError> {
        if self.cross_overlap.nrows() != n_orbs {
            return Err(LocalizationError::DimensionMismatch {
                quantity: "rows of the cross overlap matrix",
                expected: n_orbs,
                found: self.cross_overlap.nrows(),
            });
        }
        check_labels(&self.labels, n_atoms)
    }
}

/// Intrinsic atomic orbitals (G. Knizia, J. Chem. Theory Comput. 9, 4834 (2013)) of the
/// occupied orbitals `occupied` in the computational basis with overlap `overlap` (S1):
///
/// P12 = S1^-1 S12
/// C~  = lowdin(S1^-1 S12 S2^-1 S21 C)
/// A   = P12 + 2 (C C^T S1)(C~ C~^T S1) P12 - (C C^T S1) P12 - (C~ C~^T S1) P12
///
/// The returned IAOs are not orthogonal, see [orthogonal_iaos].
pub fn intrinsic_atomic_orbitals(
    overlap: ArrayView2<f64>,
    minao: &MinimalBasis,
    occupied: ArrayView2<f64>,
) -> Result<Array2<f64>, LocalizationError> {
    let n_orbs: usize = overlap.nrows();
    if occupied.nrows() != n_orbs {
        return Err(LocalizationError::DimensionMismatch {
            quantity: "rows of the occupied orbital coefficients",
            expected: n_orbs,
            found: occupied.nrows(),
        });
    }
    if minao.cross_overlap.nrows() != n_orbs {
        return Err(LocalizationError::DimensionMismatch {
            quantity: "rows of the cross overlap matrix",
            expected: n_orbs,
            found: minao.cross_overlap.nrows(),
        });
    }
    let s1: ArrayView2<f64> = overlap;
    let s12: ArrayView2<f64> = minao.cross_overlap.view();
    let s21: ArrayView2<f64> = s12.t();

    let p12: Array2<f64> = cholesky_solve(s1, s12, "overlap matrix")?;
    // depolarized occupied orbitals
    let c_tilde: Array2<f64> = cholesky_solve(
        minao.overlap.view(),
        s21.dot(&occupied).view(),
        "overlap matrix of the minimal basis",
    )?;
    let c_tilde: Array2<f64> = cholesky_solve(s1, s12.dot(&c_tilde).view(), "overlap matrix")?;
    let c_tilde: Array2<f64> = lowdin(c_tilde.view(), s1)?;

    let ccs1: Array2<f64> = occupied.dot(&occupied.t()).dot(&s1);
    let ccs2: Array2<f64> = c_tilde.dot(&c_tilde.t()).dot(&s1);

    let ccs1_p12: Array2<f64> = ccs1.dot(&p12);
    let ccs2_p12: Array2<f64> = ccs2.dot(&p12);
    Ok(&p12 + &(2.0 * ccs1.dot(&ccs2_p12)) - &ccs1_p12 - &ccs2_p12)
}

/// Löwdin orthogonalized intrinsic atomic orbitals.
pub fn orthogonal_iaos(
    overlap: ArrayView2<f64>,
    minao: &MinimalBasis,
    occupied: ArrayView2<f64>,
) -> Result<Array2<f64>, LocalizationError> {
    let iaos: Array2<f64> = intrinsic_atomic_orbitals(overlap, minao, occupied)?;
    lowdin(iaos.view(), overlap)
}
