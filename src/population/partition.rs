use crate::utils::argsort_abs_descending;
use ndarray::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bond-wise partitioning of the orbitals of both spin channels.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BondPartition {
    /// Population centres of every occupied orbital. Equal indices denote a core orbital
    /// or a lone pair, otherwise the pair is ascending.
    pub centres: [Vec<[usize; 2]>; 2],
    /// Distinct centres in lexicographic order.
    pub unique: [Vec<[usize; 2]>; 2],
    /// Orbitals (positions in the occupied set) that share the corresponding unique centre.
    pub groups: [Vec<Vec<usize>>; 2],
}

/// Population centres of a single orbital. The orbital belongs to its dominant atom alone if
/// the magnitude of the largest weight exceeds `threshold`, otherwise to the bond between
/// the two atoms with the largest weights.
pub fn population_centres(weights: ArrayView1<f64>, threshold: f64) -> [usize; 2] {
    let idx: Vec<usize> = argsort_abs_descending(weights);
    match idx.as_slice() {
        [] => [0, 0],
        [first] => [*first, *first],
        [first, second, ..] => {
            if weights[*first].abs() > threshold {
                [*first, *first]
            } else {
                [(*first).min(*second), (*first).max(*second)]
            }
        }
    }
}

/// Groups orbitals with equal centres. Returns the distinct centres in lexicographic order
/// together with the ascending indices of the orbitals of each group.
pub fn group_centres(centres: &[[usize; 2]]) -> (Vec<[usize; 2]>, Vec<Vec<usize>>) {
    let mut groups: BTreeMap<[usize; 2], Vec<usize>> = BTreeMap::new();
    for (orb, centre) in centres.iter().enumerate() {
        groups.entry(*centre).or_default().push(orb);
    }
    groups.into_iter().unzip()
}

/// Bond partition of the population weights of both spin channels.
pub fn bond_partition(
    weights: &[Vec<Array1<f64>>; 2],
    threshold: f64,
    closed_shell: bool,
) -> BondPartition {
    let mut centres: [Vec<[usize; 2]>; 2] = [Vec::new(), Vec::new()];
    for spin in 0..2 {
        centres[spin] = weights[spin]
            .iter()
            .map(|w| population_centres(w.view(), threshold))
            .collect();
        if closed_shell {
            centres[1] = centres[0].clone();
            break;
        }
    }
    let (unique_a, groups_a) = group_centres(&centres[0]);
    let (unique_b, groups_b) = group_centres(&centres[1]);
    BondPartition {
        centres,
        unique: [unique_a, unique_b],
        groups: [groups_a, groups_b],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_and_bond_orbitals() {
        assert_eq!(population_centres(array![0.95, 0.05].view(), 0.9), [0, 0]);
        assert_eq!(population_centres(array![0.5, 0.5].view(), 0.9), [0, 1]);
        assert_eq!(population_centres(array![0.1, 0.4, 0.5].view(), 0.9), [1, 2]);
        assert_eq!(population_centres(array![0.02, 0.98, 0.0].view(), 0.9), [1, 1]);
    }

    #[test]
    fn largest_weight_by_magnitude() {
        assert_eq!(population_centres(array![0.2, -0.95, 0.1].view(), 0.9), [1, 1]);
        assert_eq!(population_centres(array![0.2, -0.5, 0.6].view(), 0.9), [1, 2]);
    }

    #[test]
    fn threshold_is_strict() {
        let w = array![0.9, 0.1];
        assert_eq!(population_centres(w.view(), 0.9), [0, 1]);
        assert_eq!(population_centres(w.view(), 0.9 - 1e-12), [0, 0]);
        assert_eq!(population_centres(w.view(), 0.9 + 1e-12), [0, 1]);
    }

    #[test]
    fn single_atom() {
        assert_eq!(population_centres(array![0.5].view(), 0.9), [0, 0]);
    }

    #[test]
    fn grouping() {
        let centres = [[1, 2], [0, 0], [1, 2], [0, 1], [0, 0]];
        let (unique, groups) = group_centres(&centres);
        assert_eq!(unique, vec![[0, 0], [0, 1], [1, 2]]);
        assert_eq!(groups, vec![vec![1, 4], vec![3], vec![0, 2]]);
        let (unique, groups) = group_centres(&[]);
        assert!(unique.is_empty() && groups.is_empty());
    }

    #[test]
    fn closed_shell_copies_alpha() {
        let alpha = vec![array![0.95, 0.05], array![0.5, 0.5]];
        let weights = [alpha.clone(), Vec::new()];
        let partition = bond_partition(&weights, 0.9, true);
        assert_eq!(partition.centres[0], vec![[0, 0], [0, 1]]);
        assert_eq!(partition.centres[0], partition.centres[1]);
        assert_eq!(partition.unique[0], partition.unique[1]);
        assert_eq!(partition.groups[1], vec![vec![0], vec![1]]);
    }
}
