#![allow(dead_code)]

use ndarray::prelude::*;
use orbpart::Molecule;
use orbpart_localization::lowdin;

pub const EPSILON: f64 = 1e-8;

/// Overlap matrix of a linear chain with one s function per atom and nearest-neighbour
/// overlap `s`.
pub fn chain_overlap(n_atoms: usize, s: f64) -> Array2<f64> {
    Array2::from_shape_fn((n_atoms, n_atoms), |(i, j)| {
        if i == j {
            1.0
        } else if i.abs_diff(j) == 1 {
            s
        } else {
            0.0
        }
    })
}

/// Orthonormal orbitals (C^T S C = 1) that span the same occupied space as the columns of
/// `occupied`, followed by the orthonormal complement spanned by the columns of `virtuals`.
pub fn orthonormal_orbitals(
    occupied: ArrayView2<f64>,
    virtuals: ArrayView2<f64>,
    overlap: ArrayView2<f64>,
) -> Array2<f64> {
    let occ: Array2<f64> = lowdin(occupied, overlap).unwrap();
    let projector: Array2<f64> = Array2::eye(overlap.nrows()) - occ.dot(&occ.t()).dot(&overlap);
    let virt: Array2<f64> = lowdin(projector.dot(&virtuals).view(), overlap).unwrap();
    ndarray::concatenate(Axis(1), &[occ.view(), virt.view()]).unwrap()
}

/// H4 chain with two doubly occupied orbitals that are delocalized over the whole chain.
pub fn h4_chain(spin: usize) -> (Molecule, [Array2<f64>; 2], [Array1<f64>; 2], Array2<f64>) {
    let s: Array2<f64> = chain_overlap(4, 0.2);
    let occupied = array![[1.0, 1.0], [1.0, 1.0], [1.0, -1.0], [1.0, -1.0]];
    let virtuals = array![[1.0, 1.0], [-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0]];
    let c: Array2<f64> = orthonormal_orbitals(occupied.view(), virtuals.view(), s.view());

    let (alpha, beta, occ_b): (Vec<usize>, Vec<usize>, Array1<f64>) = if spin == 0 {
        (vec![0, 1], vec![0, 1], array![1.0, 1.0, 0.0, 0.0])
    } else {
        (vec![0, 1, 2], vec![0], array![1.0, 0.0, 0.0, 0.0])
    };
    let occ_a: Array1<f64> = if spin == 0 {
        array![1.0, 1.0, 0.0, 0.0]
    } else {
        array![1.0, 1.0, 1.0, 0.0]
    };
    let mol = Molecule::new(
        vec![String::from("H"); 4],
        vec![0, 1, 2, 3],
        spin,
        alpha,
        beta,
    )
    .unwrap();
    (mol, [c.clone(), c], [occ_a, occ_b], s)
}

/// Two atoms with one orthonormal function each. The first orbital is a core-like orbital
/// on atom 0 with weights (0.95, 0.05), the second one a bond with weights (0.5, 0.5).
pub fn diatomic() -> (Molecule, [Array2<f64>; 2], [Array1<f64>; 2], Array2<f64>) {
    let c = array![
        [0.95_f64.sqrt(), 0.5_f64.sqrt()],
        [0.05_f64.sqrt(), -0.5_f64.sqrt()]
    ];
    let mol = Molecule::new(
        vec![String::from("Li"), String::from("H")],
        vec![0, 1],
        0,
        vec![0, 1],
        vec![0, 1],
    )
    .unwrap();
    let occ = array![1.0, 1.0];
    (mol, [c.clone(), c], [occ.clone(), occ], Array2::eye(2))
}
