use crate::error::DecompError;
use ndarray::prelude::*;
use orbpart_localization::MinimalBasis;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of the reference wavefunction.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum Reference {
    Restricted,
    Unrestricted,
}

impl FromStr for Reference {
    type Err = DecompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restricted" => Ok(Reference::Restricted),
            "unrestricted" => Ok(Reference::Unrestricted),
            other => Err(DecompError::InvalidOption {
                option: "reference",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Restricted => write!(f, "restricted"),
            Reference::Unrestricted => write!(f, "unrestricted"),
        }
    }
}

impl TryFrom<String> for Reference {
    type Error = DecompError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Reference> for String {
    fn from(reference: Reference) -> Self {
        reference.to_string()
    }
}

/// Read-only description of the molecule as seen by the localization and the population
/// analysis. The basis set and all integrals are owned by the electronic structure code, only
/// the mapping of the atomic orbitals onto the atoms is needed here.
#[derive(Clone, Debug)]
pub struct Molecule {
    /// Element symbols of the atoms
    pub symbols: Vec<String>,
    /// Number of atoms
    pub n_atoms: usize,
    /// Atom index of every atomic orbital
    pub ao_labels: Vec<usize>,
    /// Number of atomic orbitals
    pub n_orbs: usize,
    /// Number of unpaired electrons, 2S (singlet -> 0, doublet -> 1, triplet -> 2)
    pub spin: usize,
    /// Indices of the occupied alpha orbitals starting from zero
    pub alpha: Vec<usize>,
    /// Indices of the occupied beta orbitals starting from zero
    pub beta: Vec<usize>,
    /// Matrix elements of the position operator <µ|r|ν>, needed for Foster-Boys
    pub dipole: Option<Array3<f64>>,
    /// Minimal basis that defines the intrinsic atomic orbitals
    pub minao: Option<MinimalBasis>,
}

impl Molecule {
    pub fn new(
        symbols: Vec<String>,
        ao_labels: Vec<usize>,
        spin: usize,
        alpha: Vec<usize>,
        beta: Vec<usize>,
    ) -> Result<Self, DecompError> {
        let n_atoms: usize = symbols.len();
        if n_atoms == 0 {
            return Err(DecompError::DimensionMismatch {
                quantity: "number of atoms",
                expected: 1,
                found: 0,
            });
        }
        if let Some(&atom) = ao_labels.iter().find(|&&atom| atom >= n_atoms) {
            return Err(DecompError::DimensionMismatch {
                quantity: "number of atoms referenced by the AO labels",
                expected: n_atoms,
                found: atom + 1,
            });
        }
        let n_orbs: usize = ao_labels.len();
        Ok(Self {
            symbols,
            n_atoms,
            ao_labels,
            n_orbs,
            spin,
            alpha,
            beta,
            dipole: None,
            minao: None,
        })
    }

    /// Attaches the dipole integrals with shape (3, n_orbs, n_orbs).
    pub fn with_dipole_integrals(mut self, dipole: Array3<f64>) -> Result<Self, DecompError> {
        if dipole.dim() != (3, self.n_orbs, self.n_orbs) {
            return Err(DecompError::DimensionMismatch {
                quantity: "AO dimension of the dipole integrals",
                expected: self.n_orbs,
                found: dipole.dim().1,
            });
        }
        self.dipole = Some(dipole);
        Ok(self)
    }

    pub fn with_minimal_basis(mut self, minao: MinimalBasis) -> Result<Self, DecompError> {
        minao.check(self.n_orbs, self.n_atoms)?;
        self.minao = Some(minao);
        Ok(self)
    }

    /// Occupied orbital indices of spin channel `spin` (0 -> alpha, 1 -> beta).
    pub fn occupied(&self, spin: usize) -> &[usize] {
        match spin {
            0 => &self.alpha,
            _ => &self.beta,
        }
    }

    /// The beta channel is a copy of the alpha channel for a restricted singlet reference.
    pub fn is_closed_shell(&self, reference: Reference) -> bool {
        reference == Reference::Restricted && self.spin == 0
    }

    pub fn dipole_integrals(&self) -> Result<ArrayView3<f64>, DecompError> {
        self.dipole
            .as_ref()
            .map(|r| r.view())
            .ok_or_else(|| DecompError::MissingParameter {
                parameter: "dipole integrals",
                required_by: String::from("the Foster-Boys localization"),
            })
    }

    pub fn minimal_basis(&self, required_by: &str) -> Result<&MinimalBasis, DecompError> {
        self.minao
            .as_ref()
            .ok_or_else(|| DecompError::MissingParameter {
                parameter: "minimal basis",
                required_by: required_by.to_string(),
            })
    }
}

/// Indices of the orbitals with a non-zero occupation.
pub fn occupied_indices(occupations: ArrayView1<f64>) -> Vec<usize> {
    occupations
        .iter()
        .enumerate()
        .filter(|&(_, &occ)| occ > 0.0)
        .map(|(idx, _)| idx)
        .collect()
}
