use crate::defaults::MOLECULE_FILE_NAME;
use crate::initialization::{occupied_indices, Molecule};
use anyhow::{Context, Result};
use log::info;
use ndarray::prelude::*;
use ndarray_npy::read_npy;
use orbpart_localization::MinimalBasis;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Content of the molecule file in the wavefunction directory.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MoleculeInput {
    pub symbols: Vec<String>,
    /// Atom index of every atomic orbital
    pub ao_labels: Vec<usize>,
    /// Number of unpaired electrons, 2S
    #[serde(default)]
    pub spin: usize,
    /// Atom index of every function of the minimal basis, only needed for IAOs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minao_labels: Option<Vec<usize>>,
}

/// Orbitals of both spin channels together with the AO overlap matrix.
#[derive(Clone, Debug)]
pub struct Wavefunction {
    pub coefficients: [Array2<f64>; 2],
    pub occupations: [Array1<f64>; 2],
    pub overlap: Array2<f64>,
}

/// Reads the molecule and the wavefunction that were exported by the electronic structure
/// code into the directory `dir`. The occupied orbitals are those with a non-zero occupation.
pub fn read_wavefunction(dir: &Path) -> Result<(Molecule, Wavefunction)> {
    let mol_path = dir.join(MOLECULE_FILE_NAME);
    let mol_string: String = fs::read_to_string(&mol_path)
        .with_context(|| format!("Unable to read molecule file {}", mol_path.display()))?;
    let input: MoleculeInput = toml::from_str(&mol_string)
        .with_context(|| format!("Invalid molecule file {}", mol_path.display()))?;

    let wavefunction = Wavefunction {
        coefficients: [
            read_matrix(dir, "mo_coeff_a.npy")?,
            read_matrix(dir, "mo_coeff_b.npy")?,
        ],
        occupations: [
            read_vector(dir, "mo_occ_a.npy")?,
            read_vector(dir, "mo_occ_b.npy")?,
        ],
        overlap: read_matrix(dir, "ovlp.npy")?,
    };

    let alpha: Vec<usize> = occupied_indices(wavefunction.occupations[0].view());
    let beta: Vec<usize> = occupied_indices(wavefunction.occupations[1].view());
    let mut mol = Molecule::new(input.symbols, input.ao_labels, input.spin, alpha, beta)?;

    let dipole_path = dir.join("dipole.npy");
    if dipole_path.exists() {
        let dipole: Array3<f64> = read_npy(&dipole_path)
            .with_context(|| format!("Unable to read {}", dipole_path.display()))?;
        mol = mol.with_dipole_integrals(dipole)?;
    }
    if let Some(labels) = input.minao_labels {
        let minao = MinimalBasis::new(
            read_matrix(dir, "minao_ovlp.npy")?,
            read_matrix(dir, "minao_cross_ovlp.npy")?,
            labels,
        )?;
        mol = mol.with_minimal_basis(minao)?;
    }

    info!("{: <25} {}", "number of atoms:", mol.n_atoms);
    info!("{: <25} {}", "number of AOs:", mol.n_orbs);
    info!(
        "{: <25} {} / {}",
        "occupied orbitals:",
        mol.alpha.len(),
        mol.beta.len()
    );
    Ok((mol, wavefunction))
}

fn read_matrix(dir: &Path, name: &str) -> Result<Array2<f64>> {
    let path = dir.join(name);
    read_npy(&path).with_context(|| format!("Unable to read {}", path.display()))
}

fn read_vector(dir: &Path, name: &str) -> Result<Array1<f64>> {
    let path = dir.join(name);
    read_npy(&path).with_context(|| format!("Unable to read {}", path.display()))
}
