use crate::error::LocalizationError;
use crate::jacobi::{check_labels, functions_on_atom, Exponent, JacobiSweeps};
use ndarray::prelude::*;

/// Pipek–Mezey localization with Mulliken charges. The functional Σ_A Σ_i (Q^A_ii)² is
/// maximized with the atomic charge matrices
///       1   ⎲
/// Q^A = -   ⎳   C_µi (SC)_µj + (SC)_µi C_µj
///  ij   2  µ∈A
pub fn pipek_mezey(
    orbitals: ArrayView2<f64>,
    overlap: ArrayView2<f64>,
    ao_labels: &[usize],
    n_atoms: usize,
    sweeps: &JacobiSweeps,
) -> Result<Array2<f64>, LocalizationError> {
    let n_orbs: usize = orbitals.nrows();
    if overlap.dim() != (n_orbs, n_orbs) {
        return Err(LocalizationError::DimensionMismatch {
            quantity: "overlap matrix",
            expected: n_orbs,
            found: overlap.nrows(),
        });
    }
    if ao_labels.len() != n_orbs {
        return Err(LocalizationError::DimensionMismatch {
            quantity: "number of AO labels",
            expected: n_orbs,
            found: ao_labels.len(),
        });
    }
    check_labels(ao_labels, n_atoms)?;

    let sc: Array2<f64> = overlap.dot(&orbitals);
    let operators: Vec<Array2<f64>> = (0..n_atoms)
        .map(|atom| mulliken_charge_matrix(orbitals, sc.view(), ao_labels, atom))
        .collect();

    sweeps.run("Pipek-Mezey", Exponent::Two, orbitals.to_owned(), operators)
}

fn mulliken_charge_matrix(
    c: ArrayView2<f64>,
    sc: ArrayView2<f64>,
    ao_labels: &[usize],
    atom: usize,
) -> Array2<f64> {
    let mu: Vec<usize> = functions_on_atom(ao_labels, atom);
    let q: Array2<f64> = c.select(Axis(0), &mu).t().dot(&sc.select(Axis(0), &mu));
    0.5 * (&q + &q.t())
}
