use crate::error::LocalizationError;
use crate::jacobi::{check_labels, functions_on_atom, Exponent, JacobiSweeps};
use ndarray::prelude::*;

/// Intrinsic bond orbitals (G. Knizia, J. Chem. Theory Comput. 9, 4834 (2013)).
///
/// The occupied orbitals are expanded in the orthonormal IAOs `iaos`, C_IAO = A^T S C, and the
/// functional Σ_A Σ_i (Q^A_ii)^p with the IAO charges Q^A_ij = Σ_{ρ∈A} C_ρi C_ρj is maximized.
/// The localized orbitals are returned in the AO basis. `labels` assigns every IAO to an atom.
pub fn intrinsic_bond_orbitals(
    occupied: ArrayView2<f64>,
    overlap: ArrayView2<f64>,
    iaos: ArrayView2<f64>,
    labels: &[usize],
    n_atoms: usize,
    exponent: Exponent,
    sweeps: &JacobiSweeps,
) -> Result<Array2<f64>, LocalizationError> {
    if iaos.ncols() != labels.len() {
        return Err(LocalizationError::DimensionMismatch {
            quantity: "number of intrinsic atomic orbitals",
            expected: labels.len(),
            found: iaos.ncols(),
        });
    }
    check_labels(labels, n_atoms)?;

    let c_iao: Array2<f64> = iaos.t().dot(&overlap.dot(&occupied));
    let operators: Vec<Array2<f64>> = (0..n_atoms)
        .map(|atom| {
            let c_a: Array2<f64> = c_iao.select(Axis(0), &functions_on_atom(labels, atom));
            c_a.t().dot(&c_a)
        })
        .collect();

    let c_iao: Array2<f64> = sweeps.run("IBO", exponent, c_iao, operators)?;
    Ok(iaos.dot(&c_iao))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iao::{orthogonal_iaos, MinimalBasis};
    use approx::assert_abs_diff_eq;

    pub const EPSILON: f64 = 1e-10;

    /// Three atoms with one orthonormal function each that also form the minimal basis.
    fn system() -> (Array2<f64>, MinimalBasis, Array2<f64>) {
        let s: Array2<f64> = Array2::eye(3);
        let minao = MinimalBasis::new(s.clone(), s.clone(), vec![0, 1, 2]).unwrap();
        // two delocalized orbitals over atoms 0 and 1, atom 2 is empty
        let a: f64 = 0.5_f64.sqrt();
        let c = array![[a, a], [a, -a], [0.0, 0.0]];
        (s, minao, c)
    }

    #[test]
    fn ibo_localize_on_atoms() {
        let (s, minao, c) = system();
        let iaos = orthogonal_iaos(s.view(), &minao, c.view()).unwrap();
        for exponent in [Exponent::Two, Exponent::Four] {
            let loc = intrinsic_bond_orbitals(
                c.view(),
                s.view(),
                iaos.view(),
                &minao.labels,
                3,
                exponent,
                &JacobiSweeps::default(),
            )
            .unwrap();
            assert!(loc.t().dot(&loc).abs_diff_eq(&Array2::<f64>::eye(2), EPSILON));
            assert!(loc.dot(&loc.t()).abs_diff_eq(&c.dot(&c.t()), EPSILON));
            for col in loc.columns() {
                let max: f64 = col.iter().map(|x| x * x).fold(0.0, f64::max);
                assert_abs_diff_eq!(max, 1.0, epsilon = EPSILON);
            }
        }
    }

    #[test]
    fn iao_labels_must_match() {
        let (s, minao, c) = system();
        let iaos = orthogonal_iaos(s.view(), &minao, c.view()).unwrap();
        let result = intrinsic_bond_orbitals(
            c.view(),
            s.view(),
            iaos.view(),
            &[0, 1],
            3,
            Exponent::Two,
            &JacobiSweeps::default(),
        );
        assert!(result.is_err());
    }
}
