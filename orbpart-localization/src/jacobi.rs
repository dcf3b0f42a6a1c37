use crate::defaults::{LOC_CONV, MAX_SWEEPS};
use crate::error::LocalizationError;
use crate::logging::*;
use derive_builder::Builder;
use ndarray::prelude::*;
use std::fmt;

/// Power p of the centre charges in the functional Σ_A Σ_i (Q^A_ii)^p.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Exponent {
    Two,
    Four,
}

impl Exponent {
    pub fn power(&self) -> i32 {
        match self {
            Exponent::Two => 2,
            Exponent::Four => 4,
        }
    }
}

impl TryFrom<u8> for Exponent {
    type Error = u8;

    fn try_from(p: u8) -> Result<Self, Self::Error> {
        match p {
            2 => Ok(Exponent::Two),
            4 => Ok(Exponent::Four),
            other => Err(other),
        }
    }
}

impl fmt::Display for Exponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.power())
    }
}

/// Jacobi sweep optimizer for localization functionals. A single sweep visits every pair of
/// orbitals (i, j) once and applies the 2x2 rotation
///
/// |i'> =  cos(φ) |i> + sin(φ) |j>
/// |j'> = -sin(φ) |i> + cos(φ) |j>
///
/// that maximizes the pair contribution of the functional. The operators Q^A are rotated
/// along with the orbitals, so their diagonals always refer to the current orbitals.
#[derive(Builder, Clone, Debug)]
pub struct JacobiSweeps {
    /// Convergence threshold for the norm of the gradient.
    #[builder(default = "LOC_CONV")]
    pub conv_tol: f64,
    /// Maximal number of sweeps.
    #[builder(default = "MAX_SWEEPS")]
    pub max_sweeps: usize,
}

impl Default for JacobiSweeps {
    fn default() -> Self {
        Self {
            conv_tol: LOC_CONV,
            max_sweeps: MAX_SWEEPS,
        }
    }
}

impl JacobiSweeps {
    /// Rotates the columns of `orbitals` until the functional Σ_A Σ_i (Q^A_ii)^p is stationary.
    /// `operators` are the matrices Q^A in the basis of the columns of `orbitals`.
    pub fn run(
        &self,
        method: &'static str,
        exponent: Exponent,
        orbitals: Array2<f64>,
        operators: Vec<Array2<f64>>,
    ) -> Result<Array2<f64>, LocalizationError> {
        let n_orbs: usize = orbitals.ncols();
        for q in operators.iter() {
            if q.dim() != (n_orbs, n_orbs) {
                return Err(LocalizationError::DimensionMismatch {
                    quantity: "operator matrix in the orbital basis",
                    expected: n_orbs,
                    found: q.nrows(),
                });
            }
        }
        let mut orbitals: Array2<f64> = orbitals;
        let mut operators: Vec<Array2<f64>> = operators;

        print_sweeps_init(method, n_orbs, self.conv_tol, self.max_sweeps);

        let mut gradient: f64 = f64::INFINITY;
        for sweep in 0..self.max_sweeps {
            let mut grad_sq: f64 = 0.0;
            // a rotation away from a minimum along the pair coordinate means that the
            // previous point was not a maximum, even if the gradient vanished there
            let mut saddle: bool = false;

            for i in 0..n_orbs {
                for j in 0..i {
                    let (a_ij, b_ij): (f64, f64) = pair_terms(&operators, exponent, i, j);
                    grad_sq += b_ij * b_ij;
                    // the functional does not depend on the rotation angle of this pair
                    if a_ij.hypot(b_ij) < self.conv_tol {
                        continue;
                    }
                    if a_ij > self.conv_tol {
                        saddle = true;
                    }
                    let phi: f64 = 0.25 * b_ij.atan2(-a_ij);
                    let (sin, cos): (f64, f64) = phi.sin_cos();
                    rotate_columns(&mut orbitals, i, j, cos, sin);
                    for q in operators.iter_mut() {
                        rotate_columns(q, i, j, cos, sin);
                        rotate_rows(q, i, j, cos, sin);
                    }
                }
            }
            gradient = grad_sq.sqrt();
            let value: f64 = functional(&operators, exponent);
            print_sweep(sweep, value, gradient);

            if gradient < self.conv_tol && !saddle {
                print_sweeps_end(method, sweep + 1, value);
                return Ok(orbitals);
            }
        }

        Err(LocalizationError::NotConverged {
            method,
            sweeps: self.max_sweeps,
            gradient,
        })
    }
}

/// Value of Σ_A Σ_i (Q^A_ii)^p.
pub fn functional(operators: &[Array2<f64>], exponent: Exponent) -> f64 {
    operators
        .iter()
        .map(|q| q.diag().iter().map(|qii| qii.powi(exponent.power())).sum::<f64>())
        .sum()
}

/// Coefficients A_ij and B_ij of the pair functional
/// f(φ) = const + (A_ij cos(4φ) + B_ij sin(4φ)) / 4 (up to a positive factor for p = 4).
/// The maximum is found at 4φ = atan2(B_ij, -A_ij) and B_ij is the gradient at φ = 0.
fn pair_terms(operators: &[Array2<f64>], exponent: Exponent, i: usize, j: usize) -> (f64, f64) {
    operators.iter().fold((0.0, 0.0), |(a, b), q| {
        let qii: f64 = q[[i, i]];
        let qjj: f64 = q[[j, j]];
        let qij: f64 = q[[i, j]];
        match exponent {
            Exponent::Two => (
                a + 4.0 * qij.powi(2) - (qii - qjj).powi(2),
                b + 4.0 * qij * (qii - qjj),
            ),
            Exponent::Four => (
                a - qii.powi(4) - qjj.powi(4)
                    + 6.0 * (qii.powi(2) + qjj.powi(2)) * qij.powi(2)
                    + qii.powi(3) * qjj
                    + qii * qjj.powi(3),
                b + 4.0 * qij * (qii.powi(3) - qjj.powi(3)),
            ),
        }
    })
}

fn rotate_columns(m: &mut Array2<f64>, i: usize, j: usize, cos: f64, sin: f64) {
    let col_i: Array1<f64> = m.column(i).to_owned();
    let col_j: Array1<f64> = m.column(j).to_owned();
    m.column_mut(i).assign(&(cos * &col_i + sin * &col_j));
    m.column_mut(j).assign(&(cos * &col_j - sin * &col_i));
}

fn rotate_rows(m: &mut Array2<f64>, i: usize, j: usize, cos: f64, sin: f64) {
    let row_i: Array1<f64> = m.row(i).to_owned();
    let row_j: Array1<f64> = m.row(j).to_owned();
    m.row_mut(i).assign(&(cos * &row_i + sin * &row_j));
    m.row_mut(j).assign(&(cos * &row_j - sin * &row_i));
}

/// Indices of the basis functions that are centred on `atom`.
pub(crate) fn functions_on_atom(labels: &[usize], atom: usize) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|&(_, &label)| label == atom)
        .map(|(mu, _)| mu)
        .collect()
}

/// Checks that every label refers to one of `n_atoms` atoms.
pub(crate) fn check_labels(labels: &[usize], n_atoms: usize) -> Result<(), LocalizationError> {
    match labels.iter().find(|&&atom| atom >= n_atoms) {
        Some(&atom) => Err(LocalizationError::DimensionMismatch {
            quantity: "number of atoms referenced by the basis function labels",
            expected: n_atoms,
            found: atom + 1,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    pub const EPSILON: f64 = 1e-10;

    /// Charge matrices of two orthonormal functions on two atoms for the orbitals in `c`.
    fn charges(c: &Array2<f64>) -> Vec<Array2<f64>> {
        (0..2)
            .map(|atom| {
                let row = c.slice(s![atom..atom + 1, ..]);
                row.t().dot(&row)
            })
            .collect()
    }

    fn delocalized() -> Array2<f64> {
        let a: f64 = 0.5_f64.sqrt();
        array![[a, a], [a, -a]]
    }

    #[test]
    fn saddle_point_is_left() {
        let c = delocalized();
        let sweeps = JacobiSweeps::default();
        for exponent in [Exponent::Two, Exponent::Four] {
            let loc = sweeps.run("test", exponent, c.clone(), charges(&c)).unwrap();
            // every localized orbital sits on a single function
            let weights = loc.mapv(|x| x * x);
            for col in weights.columns() {
                let max: f64 = col.iter().cloned().fold(0.0, f64::max);
                assert_abs_diff_eq!(max, 1.0, epsilon = EPSILON);
            }
        }
    }

    #[test]
    fn rotations_are_orthogonal() {
        let c = array![[0.8, 0.6, 0.0], [0.6, -0.8, 0.0], [0.0, 0.0, 1.0]];
        let q: Vec<Array2<f64>> = vec![
            array![[1.0, 0.2, 0.1], [0.2, 0.0, 0.3], [0.1, 0.3, 0.5]],
            array![[0.0, -0.2, 0.4], [-0.2, 1.0, 0.0], [0.4, 0.0, 0.5]],
        ];
        let loc = JacobiSweeps::default()
            .run("test", Exponent::Two, c.clone(), q.clone())
            .unwrap();
        assert!(loc.t().dot(&loc).abs_diff_eq(&Array2::<f64>::eye(3), EPSILON));
        assert!(loc.dot(&loc.t()).abs_diff_eq(&c.dot(&c.t()), EPSILON));
    }

    #[test]
    fn functional_increases() {
        let c = delocalized();
        let before = functional(&charges(&c), Exponent::Two);
        let loc = JacobiSweeps::default()
            .run("test", Exponent::Two, c.clone(), charges(&c))
            .unwrap();
        let after = functional(&charges(&loc), Exponent::Two);
        assert!(after > before);
        assert_abs_diff_eq!(after, 2.0, epsilon = EPSILON);
    }

    #[test]
    fn too_few_sweeps() {
        let c = delocalized();
        let sweeps = JacobiSweepsBuilder::default().max_sweeps(1).build().unwrap();
        let result = sweeps.run("test", Exponent::Two, c.clone(), charges(&c));
        match result {
            Err(LocalizationError::NotConverged { sweeps, .. }) => assert_eq!(sweeps, 1),
            other => panic!("expected a convergence failure, got {:?}", other),
        }
    }

    #[test]
    fn single_orbital_is_converged() {
        let c = array![[1.0], [0.0]];
        let loc = JacobiSweeps::default()
            .run("test", Exponent::Two, c.clone(), charges(&c))
            .unwrap();
        assert_eq!(loc, c);
    }

    #[test]
    fn exponents() {
        assert_eq!(Exponent::try_from(2), Ok(Exponent::Two));
        assert_eq!(Exponent::try_from(4), Ok(Exponent::Four));
        assert_eq!(Exponent::try_from(3), Err(3));
    }

    #[test]
    fn labels_out_of_range() {
        assert!(check_labels(&[0, 1, 1], 2).is_ok());
        assert!(check_labels(&[0, 2], 2).is_err());
        assert_eq!(functions_on_atom(&[0, 1, 0, 1], 1), vec![1, 3]);
    }
}
