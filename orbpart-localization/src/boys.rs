use crate::error::LocalizationError;
use crate::jacobi::{Exponent, JacobiSweeps};
use ndarray::prelude::*;

/// Foster–Boys localization. Maximizes Σ_i |<i|r|i>|², which is equivalent to minimizing the
/// spatial spread of the orbitals. `dipole` holds the three Cartesian components of the
/// position operator in the AO basis, with shape (3, n_orbs, n_orbs).
pub fn boys(
    orbitals: ArrayView2<f64>,
    dipole: ArrayView3<f64>,
    sweeps: &JacobiSweeps,
) -> Result<Array2<f64>, LocalizationError> {
    let n_orbs: usize = orbitals.nrows();
    if dipole.dim() != (3, n_orbs, n_orbs) {
        return Err(LocalizationError::DimensionMismatch {
            quantity: "AO dimension of the dipole integrals",
            expected: n_orbs,
            found: dipole.dim().1,
        });
    }
    // <i|r|j> for each Cartesian direction
    let operators: Vec<Array2<f64>> = dipole
        .outer_iter()
        .map(|r| orbitals.t().dot(&r.dot(&orbitals)))
        .collect();

    sweeps.run("Foster-Boys", Exponent::Two, orbitals.to_owned(), operators)
}
