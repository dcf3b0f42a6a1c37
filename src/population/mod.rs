mod logging;
pub mod partition;
pub mod weights;

use crate::defaults::{PARALLEL, PARTITION_POLICY, POPULATION_SCHEME, REFERENCE};
use crate::error::DecompError;
use crate::initialization::{
    check_closed_shell, check_occupations, check_wavefunction, Molecule, Reference,
};
use crate::population::logging::*;
use derive_builder::Builder;
use enum_as_inner::EnumAsInner;
use log::debug;
use ndarray::prelude::*;
use orbpart_localization::orthogonal_iaos;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use partition::{bond_partition, group_centres, population_centres, BondPartition};
pub use weights::{atomic_populations, compute_weights, orbital_density};

/// Basis in which the orbital populations are evaluated.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum PopulationScheme {
    /// Raw orbital coefficients together with the AO overlap matrix.
    Mulliken,
    /// Orbitals expanded in orthogonalized intrinsic atomic orbitals.
    Iao,
}

/// Form of the result of the population analysis.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum PartitionPolicy {
    Atoms,
    Eda,
    Bonds,
}

impl FromStr for PopulationScheme {
    type Err = DecompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mulliken" => Ok(PopulationScheme::Mulliken),
            "iao" => Ok(PopulationScheme::Iao),
            other => Err(DecompError::InvalidOption {
                option: "population_scheme",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PopulationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopulationScheme::Mulliken => write!(f, "mulliken"),
            PopulationScheme::Iao => write!(f, "iao"),
        }
    }
}

impl TryFrom<String> for PopulationScheme {
    type Error = DecompError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PopulationScheme> for String {
    fn from(scheme: PopulationScheme) -> Self {
        scheme.to_string()
    }
}

impl FromStr for PartitionPolicy {
    type Err = DecompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atoms" => Ok(PartitionPolicy::Atoms),
            "eda" => Ok(PartitionPolicy::Eda),
            "bonds" => Ok(PartitionPolicy::Bonds),
            other => Err(DecompError::InvalidOption {
                option: "partition_policy",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PartitionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionPolicy::Atoms => write!(f, "atoms"),
            PartitionPolicy::Eda => write!(f, "eda"),
            PartitionPolicy::Bonds => write!(f, "bonds"),
        }
    }
}

impl TryFrom<String> for PartitionPolicy {
    type Error = DecompError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PartitionPolicy> for String {
    fn from(policy: PartitionPolicy) -> Self {
        policy.to_string()
    }
}

/// Options of the population analysis.
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct AssignOptions {
    #[builder(default = "REFERENCE")]
    pub reference: Reference,
    #[builder(default = "POPULATION_SCHEME")]
    pub scheme: PopulationScheme,
    #[builder(default = "PARTITION_POLICY")]
    pub policy: PartitionPolicy,
    /// Distribute the orbitals of a spin channel over a worker pool.
    #[builder(default = "PARALLEL")]
    pub parallel: bool,
    /// Weight above which an orbital is assigned to a single atom. Required for bonds.
    #[builder(default = "None", setter(strip_option))]
    pub threshold: Option<f64>,
    /// Verbosity, a table of all weights is printed above zero.
    #[builder(default = "0")]
    pub verbose: i8,
}

impl AssignOptions {
    /// The threshold of the bond partitioning.
    pub fn bond_threshold(&self) -> Result<f64, DecompError> {
        self.threshold.ok_or_else(|| DecompError::MissingParameter {
            parameter: "threshold",
            required_by: format!("the partition policy '{}'", PartitionPolicy::Bonds),
        })
    }
}

/// Result of the population analysis of the occupied orbitals of both spin channels.
#[derive(Serialize, Clone, Debug, PartialEq, EnumAsInner)]
pub enum Partition {
    /// Population weight vector (one entry per atom) of every occupied orbital.
    Weights([Vec<Array1<f64>>; 2]),
    /// Population centres of every occupied orbital and the orbitals grouped by centre.
    Bonds(BondPartition),
}

/// Assigns the electrons of every occupied orbital to the atoms. The orbitals are taken from
/// the columns of `coefficients` listed in the occupied index sets of the molecule, in that
/// order. For a closed shell only the alpha channel is evaluated and copied to beta.
pub fn assign(
    mol: &Molecule,
    overlap: ArrayView2<f64>,
    coefficients: &[Array2<f64>; 2],
    occupations: &[Array1<f64>; 2],
    options: &AssignOptions,
) -> Result<Partition, DecompError> {
    // validate all options before any work is done
    let threshold: Option<f64> = match options.policy {
        PartitionPolicy::Bonds => Some(options.bond_threshold()?),
        PartitionPolicy::Atoms | PartitionPolicy::Eda => None,
    };
    if options.scheme == PopulationScheme::Iao {
        mol.minimal_basis("the IAO population scheme")?;
    }
    check_wavefunction(mol, overlap, coefficients, Some(occupations))?;
    check_occupations(mol, occupations)?;
    check_closed_shell(mol, options.reference)?;
    let closed_shell: bool = mol.is_closed_shell(options.reference);

    debug!(
        "population analysis: scheme {}, policy {}, parallel {}",
        options.scheme, options.policy, options.parallel
    );

    let mut weights: [Vec<Array1<f64>>; 2] = [Vec::new(), Vec::new()];
    for spin in 0..2 {
        let occupied: &[usize] = mol.occupied(spin);
        let orbitals: Array2<f64> = coefficients[spin].select(Axis(1), occupied);
        let occ: Array1<f64> = occupations[spin].select(Axis(0), occupied);

        weights[spin] = match options.scheme {
            PopulationScheme::Mulliken => compute_weights(
                orbitals.view(),
                occ.view(),
                overlap,
                &mol.ao_labels,
                mol.n_atoms,
                options.parallel,
            )?,
            PopulationScheme::Iao => {
                let minao = mol.minimal_basis("the IAO population scheme")?;
                // C_IAO = A^T S C
                let projected: Array2<f64> = if occupied.is_empty() {
                    Array2::zeros((minao.n_functions(), 0))
                } else {
                    let iaos: Array2<f64> = orthogonal_iaos(overlap, minao, orbitals.view())?;
                    iaos.t().dot(&overlap.dot(&orbitals))
                };
                let identity: Array2<f64> = Array2::eye(minao.n_functions());
                compute_weights(
                    projected.view(),
                    occ.view(),
                    identity.view(),
                    &minao.labels,
                    mol.n_atoms,
                    options.parallel,
                )?
            }
        };

        if closed_shell {
            weights[1] = weights[0].clone();
            break;
        }
    }

    if options.verbose > 0 {
        print_population_weights(&mol.symbols, [&mol.alpha, &mol.beta], &weights);
    }

    match threshold {
        Some(threshold) => {
            let partition: BondPartition = bond_partition(&weights, threshold, closed_shell);
            if options.verbose > 0 {
                print_bond_centres(&partition);
            }
            Ok(Partition::Bonds(partition))
        }
        None => Ok(Partition::Weights(weights)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub const EPSILON: f64 = 1e-12;

    /// Two atoms with one orthonormal function each. The alpha orbitals are occupied, the
    /// beta channel only holds the first orbital.
    fn system(spin: usize) -> (Molecule, Array2<f64>, [Array2<f64>; 2], [Array1<f64>; 2]) {
        let beta: Vec<usize> = if spin == 0 { vec![0, 1] } else { vec![0] };
        let mol = Molecule::new(
            vec![String::from("C"), String::from("O")],
            vec![0, 1],
            spin,
            vec![0, 1],
            beta.clone(),
        )
        .unwrap();
        let c = array![
            [0.95_f64.sqrt(), 0.5_f64.sqrt()],
            [0.05_f64.sqrt(), -0.5_f64.sqrt()]
        ];
        let occ_b: Array1<f64> = if spin == 0 {
            array![1.0, 1.0]
        } else {
            array![1.0, 0.0]
        };
        (mol, Array2::eye(2), [c.clone(), c], [array![1.0, 1.0], occ_b])
    }

    #[test]
    fn atom_weights() {
        let (mol, s, c, occ) = system(0);
        let options = AssignOptionsBuilder::default().build().unwrap();
        let partition = assign(&mol, s.view(), &c, &occ, &options).unwrap();
        let weights = partition.into_weights().unwrap();
        assert!(weights[0][0].abs_diff_eq(&array![0.95, 0.05], EPSILON));
        assert!(weights[0][1].abs_diff_eq(&array![0.5, 0.5], EPSILON));
        assert_eq!(weights[0], weights[1]);
    }

    #[test]
    fn permuted_occupied_indices() {
        let (_, s, c, occ) = system(0);
        let mol = Molecule::new(
            vec![String::from("C"), String::from("O")],
            vec![0, 1],
            0,
            vec![1, 0],
            vec![1, 0],
        )
        .unwrap();
        for parallel in [false, true] {
            let options = AssignOptionsBuilder::default()
                .parallel(parallel)
                .build()
                .unwrap();
            let weights = assign(&mol, s.view(), &c, &occ, &options)
                .unwrap()
                .into_weights()
                .unwrap();
            assert!(weights[0][0].abs_diff_eq(&array![0.5, 0.5], EPSILON));
            assert!(weights[0][1].abs_diff_eq(&array![0.95, 0.05], EPSILON));
        }
    }

    #[test]
    fn bonds() {
        let (mol, s, c, occ) = system(0);
        let options = AssignOptionsBuilder::default()
            .policy(PartitionPolicy::Bonds)
            .threshold(0.9)
            .verbose(1)
            .build()
            .unwrap();
        let partition = assign(&mol, s.view(), &c, &occ, &options)
            .unwrap()
            .into_bonds()
            .unwrap();
        assert_eq!(partition.centres[0], vec![[0, 0], [0, 1]]);
        assert_eq!(partition.unique[0], vec![[0, 0], [0, 1]]);
        assert_eq!(partition.groups[0], vec![vec![0], vec![1]]);
        assert_eq!(partition.centres[0], partition.centres[1]);
    }

    #[test]
    fn open_shell_channels() {
        let (mol, s, c, occ) = system(1);
        let options = AssignOptionsBuilder::default()
            .policy(PartitionPolicy::Bonds)
            .threshold(0.9)
            .build()
            .unwrap();
        let partition = assign(&mol, s.view(), &c, &occ, &options)
            .unwrap()
            .into_bonds()
            .unwrap();
        assert_eq!(partition.centres[0].len(), 2);
        assert_eq!(partition.centres[1], vec![[0, 0]]);
        assert_eq!(partition.groups[1], vec![vec![0]]);
    }

    #[test]
    fn bonds_require_a_threshold() {
        let (mol, s, c, occ) = system(0);
        let options = AssignOptionsBuilder::default()
            .policy(PartitionPolicy::Bonds)
            .build()
            .unwrap();
        assert!(matches!(
            assign(&mol, s.view(), &c, &occ, &options),
            Err(DecompError::MissingParameter {
                parameter: "threshold",
                ..
            })
        ));
    }

    #[test]
    fn iao_scheme_requires_a_minimal_basis() {
        let (mol, s, c, occ) = system(0);
        let options = AssignOptionsBuilder::default()
            .scheme(PopulationScheme::Iao)
            .build()
            .unwrap();
        assert!(matches!(
            assign(&mol, s.view(), &c, &occ, &options),
            Err(DecompError::MissingParameter { .. })
        ));
    }

    #[test]
    fn option_codes() {
        assert_eq!("iao".parse::<PopulationScheme>(), Ok(PopulationScheme::Iao));
        assert_eq!("eda".parse::<PartitionPolicy>(), Ok(PartitionPolicy::Eda));
        assert_eq!(
            "xyz".parse::<PopulationScheme>(),
            Err(DecompError::InvalidOption {
                option: "population_scheme",
                value: String::from("xyz"),
            })
        );
        assert!("bond".parse::<PartitionPolicy>().is_err());
    }
}
