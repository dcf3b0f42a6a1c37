use super::{occupied_indices, Molecule, Reference};
use crate::error::DecompError;
use log::debug;
use ndarray::prelude::*;

/// Checks that the wavefunction fits to the molecule before any work is done.
pub fn check_wavefunction(
    mol: &Molecule,
    overlap: ArrayView2<f64>,
    coefficients: &[Array2<f64>; 2],
    occupations: Option<&[Array1<f64>; 2]>,
) -> Result<(), DecompError> {
    debug!("{:^80}", "");
    debug!("{:-^80}", " Input check ");

    if overlap.dim() != (mol.n_orbs, mol.n_orbs) {
        return Err(DecompError::DimensionMismatch {
            quantity: "overlap matrix",
            expected: mol.n_orbs,
            found: if overlap.nrows() != mol.n_orbs {
                overlap.nrows()
            } else {
                overlap.ncols()
            },
        });
    }

    for (spin, mo_coeff) in coefficients.iter().enumerate() {
        if mo_coeff.nrows() != mol.n_orbs {
            return Err(DecompError::DimensionMismatch {
                quantity: "AO dimension of the orbital coefficients",
                expected: mol.n_orbs,
                found: mo_coeff.nrows(),
            });
        }
        if let Some(occupations) = occupations {
            if occupations[spin].len() != mo_coeff.ncols() {
                return Err(DecompError::DimensionMismatch {
                    quantity: "number of orbital occupations",
                    expected: mo_coeff.ncols(),
                    found: occupations[spin].len(),
                });
            }
        }
        if let Some(&idx) = mol.occupied(spin).iter().find(|&&idx| idx >= mo_coeff.ncols()) {
            return Err(DecompError::DimensionMismatch {
                quantity: "number of molecular orbitals referenced by the occupied indices",
                expected: mo_coeff.ncols(),
                found: idx + 1,
            });
        }
    }
    debug!("The dimensions of the wavefunction are consistent.");
    debug!("{:-^80}", "");
    Ok(())
}

/// For a closed shell the occupied beta orbitals must mirror the alpha orbitals, otherwise
/// the copy of the alpha results would not describe the beta electrons.
pub fn check_closed_shell(mol: &Molecule, reference: Reference) -> Result<(), DecompError> {
    if mol.is_closed_shell(reference) && mol.alpha != mol.beta {
        return Err(DecompError::DimensionMismatch {
            quantity: "number of occupied beta orbitals of the closed shell",
            expected: mol.alpha.len(),
            found: mol.beta.len(),
        });
    }
    Ok(())
}

/// The occupied indices stored in the molecule must be exactly the orbitals with a non-zero
/// occupation. Their order is free.
pub fn check_occupations(mol: &Molecule, occupations: &[Array1<f64>; 2]) -> Result<(), DecompError> {
    for (spin, occ) in occupations.iter().enumerate() {
        let occupied: Vec<usize> = occupied_indices(occ.view());
        let mut expected: Vec<usize> = mol.occupied(spin).to_vec();
        if occupied.len() != expected.len() {
            return Err(DecompError::DimensionMismatch {
                quantity: "number of occupied orbitals",
                expected: expected.len(),
                found: occupied.len(),
            });
        }
        expected.sort_unstable();
        if occupied != expected {
            return Err(DecompError::DimensionMismatch {
                quantity: "occupied orbitals with a non-zero occupation",
                expected: expected.len(),
                found: occupied.iter().filter(|&&idx| expected.contains(&idx)).count(),
            });
        }
    }
    Ok(())
}
