use crate::error::DecompError;
use ndarray::prelude::*;
use ndarray::Zip;
use rayon::prelude::*;

/// One-particle density matrix of a single orbital, P = n c c^T.
pub fn orbital_density(orbital: ArrayView1<f64>, occupation: f64) -> Array2<f64> {
    let c: ArrayView2<f64> = orbital.insert_axis(Axis(1));
    occupation * c.dot(&c.t())
}

/// Mulliken-type populations of the density `p` on the atoms:
///       ⎲    ⎲  P   S
/// q  =  ⎳    ⎳   µν  νµ
///  A    µ∈A  ν
pub fn atomic_populations(
    p: ArrayView2<f64>,
    s: ArrayView2<f64>,
    labels: &[usize],
    n_atoms: usize,
) -> Result<Array1<f64>, DecompError> {
    if labels.len() != p.nrows() {
        return Err(DecompError::DimensionMismatch {
            quantity: "number of basis function labels",
            expected: p.nrows(),
            found: labels.len(),
        });
    }
    if s.dim() != p.dim() {
        return Err(DecompError::DimensionMismatch {
            quantity: "overlap matrix of the population analysis",
            expected: p.nrows(),
            found: s.nrows(),
        });
    }
    let q_ao: Array1<f64> = Zip::from(p.rows())
        .and(s.columns())
        .map_collect(|p_mu, s_mu| p_mu.dot(&s_mu));

    let mut q: Array1<f64> = Array1::zeros(n_atoms);
    for (q_mu, &atom) in q_ao.iter().zip(labels.iter()) {
        match q.get_mut(atom) {
            Some(q_a) => *q_a += q_mu,
            None => {
                return Err(DecompError::DimensionMismatch {
                    quantity: "number of atoms referenced by the basis function labels",
                    expected: n_atoms,
                    found: atom + 1,
                })
            }
        }
    }
    Ok(q)
}

/// Population weights of every orbital (column of `orbitals`) on the atoms. In the parallel
/// mode the orbitals are distributed over a worker pool that only lives for this call; the
/// weights are returned in the order of the orbitals in both modes. The pool is never larger
/// than the pool of the caller, so the global pool of the binary bounds the parallelism.
pub fn compute_weights(
    orbitals: ArrayView2<f64>,
    occupations: ArrayView1<f64>,
    overlap: ArrayView2<f64>,
    labels: &[usize],
    n_atoms: usize,
    parallel: bool,
) -> Result<Vec<Array1<f64>>, DecompError> {
    let n_tasks: usize = orbitals.ncols();
    if occupations.len() != n_tasks {
        return Err(DecompError::DimensionMismatch {
            quantity: "number of orbital occupations",
            expected: n_tasks,
            found: occupations.len(),
        });
    }
    let weights_of = |idx: usize| -> Result<Array1<f64>, DecompError> {
        let p: Array2<f64> = orbital_density(orbitals.column(idx), occupations[idx]);
        atomic_populations(p.view(), overlap, labels, n_atoms)
    };

    if !parallel || n_tasks == 0 {
        return (0..n_tasks).map(weights_of).collect();
    }
    let n_threads: usize = n_tasks.min(rayon::current_num_threads());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build()
        .map_err(|err| DecompError::ThreadPool(err.to_string()))?;
    pool.install(|| (0..n_tasks).into_par_iter().map(weights_of).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    pub const EPSILON: f64 = 1e-14;

    fn overlap() -> Array2<f64> {
        array![[1.0, 0.2, 0.0], [0.2, 1.0, 0.1], [0.0, 0.1, 1.0]]
    }

    #[test]
    fn density_of_one_orbital() {
        let c = array![1.0, 2.0];
        let p = orbital_density(c.view(), 0.5);
        assert!(p.abs_diff_eq(&array![[0.5, 1.0], [1.0, 2.0]], EPSILON));
    }

    #[test]
    fn populations_sum_over_the_atoms() {
        let s = overlap();
        let c = array![0.6, 0.5, 0.3];
        let p = orbital_density(c.view(), 1.0);
        let q = atomic_populations(p.view(), s.view(), &[0, 0, 1], 2).unwrap();
        let q_ao = s.dot(&p).diag().to_owned();
        assert!(q.abs_diff_eq(&array![q_ao[0] + q_ao[1], q_ao[2]], EPSILON));
        // total population is the norm of the orbital in the overlap metric
        let norm: f64 = c.dot(&s.dot(&c));
        assert_abs_diff_eq!(q.sum(), norm, epsilon = EPSILON);
    }

    #[test]
    fn inconsistent_labels() {
        let s = overlap();
        let p: Array2<f64> = Array2::eye(3);
        assert!(atomic_populations(p.view(), s.view(), &[0, 1], 2).is_err());
        assert!(atomic_populations(p.view(), s.view(), &[0, 1, 2], 2).is_err());
        assert!(atomic_populations(p.view(), Array2::eye(2).view(), &[0, 1, 1], 2).is_err());
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let s = overlap();
        let c = array![[0.6, 0.1, 0.0, 0.3], [0.5, 0.9, 0.1, 0.3], [0.3, 0.0, 1.0, 0.4]];
        let occ = array![1.0, 1.0, 0.5, 2.0];
        let sequential =
            compute_weights(c.view(), occ.view(), s.view(), &[0, 1, 2], 3, false).unwrap();
        let parallel = compute_weights(c.view(), occ.view(), s.view(), &[0, 1, 2], 3, true).unwrap();
        assert_eq!(sequential.len(), 4);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn no_orbitals() {
        let s = overlap();
        let c: Array2<f64> = Array2::zeros((3, 0));
        let occ: Array1<f64> = Array1::zeros(0);
        let weights = compute_weights(c.view(), occ.view(), s.view(), &[0, 1, 2], 3, true).unwrap();
        assert!(weights.is_empty());
    }
}
