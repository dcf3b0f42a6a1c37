use crate::error::DecompError;
use crate::initialization::{check_closed_shell, check_wavefunction, Molecule, Reference};
use log::info;
use ndarray::prelude::*;
use orbpart_localization::{
    boys, intrinsic_bond_orbitals, orthogonal_iaos, pipek_mezey, Exponent, JacobiSweeps,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Localization scheme for the occupied orbitals. The text codes are `fb`, `pm` and
/// `ibo<p>` where p is the power of the IBO functional (2 or 4).
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum LocalizationVariant {
    FosterBoys,
    PipekMezey,
    IntrinsicBond { exponent: Exponent },
}

impl FromStr for LocalizationVariant {
    type Err = DecompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecompError::InvalidOption {
            option: "localization_variant",
            value: s.to_string(),
        };
        match s {
            "fb" => Ok(LocalizationVariant::FosterBoys),
            "pm" => Ok(LocalizationVariant::PipekMezey),
            _ => {
                let power: u8 = s
                    .strip_prefix("ibo")
                    .and_then(|p| p.parse().ok())
                    .ok_or_else(invalid)?;
                let exponent: Exponent = Exponent::try_from(power).map_err(|_| invalid())?;
                Ok(LocalizationVariant::IntrinsicBond { exponent })
            }
        }
    }
}

impl fmt::Display for LocalizationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalizationVariant::FosterBoys => write!(f, "fb"),
            LocalizationVariant::PipekMezey => write!(f, "pm"),
            LocalizationVariant::IntrinsicBond { exponent } => write!(f, "ibo{}", exponent),
        }
    }
}

impl TryFrom<String> for LocalizationVariant {
    type Error = DecompError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LocalizationVariant> for String {
    fn from(variant: LocalizationVariant) -> Self {
        variant.to_string()
    }
}

/// Localizes the occupied orbitals of both spin channels with the default convergence
/// settings. See [localize_with].
pub fn localize(
    mol: &Molecule,
    coefficients: &[Array2<f64>; 2],
    overlap: ArrayView2<f64>,
    reference: Reference,
    variant: LocalizationVariant,
) -> Result<[Array2<f64>; 2], DecompError> {
    localize_with(
        mol,
        coefficients,
        overlap,
        reference,
        variant,
        &JacobiSweeps::default(),
    )
}

/// Localizes the occupied orbitals of both spin channels. The input coefficients are not
/// touched: the returned matrices are copies in which only the occupied columns are replaced,
/// the virtual orbitals stay canonical. For a closed shell the beta orbitals are a copy of
/// the localized alpha orbitals.
pub fn localize_with(
    mol: &Molecule,
    coefficients: &[Array2<f64>; 2],
    overlap: ArrayView2<f64>,
    reference: Reference,
    variant: LocalizationVariant,
    sweeps: &JacobiSweeps,
) -> Result<[Array2<f64>; 2], DecompError> {
    check_wavefunction(mol, overlap, coefficients, None)?;
    check_closed_shell(mol, reference)?;
    // fail before any work if an integral is missing
    match variant {
        LocalizationVariant::FosterBoys => {
            mol.dipole_integrals()?;
        }
        LocalizationVariant::IntrinsicBond { .. } => {
            mol.minimal_basis("the IBO localization")?;
        }
        LocalizationVariant::PipekMezey => {}
    }

    info!("{:^80}", "");
    info!("{: ^80}", format!("Localization of the occupied orbitals ({})", variant));
    info!("{:-^80}", "");

    let mut localized: [Array2<f64>; 2] = coefficients.clone();
    for spin in 0..2 {
        let occupied: &[usize] = mol.occupied(spin);
        if occupied.is_empty() {
            continue;
        }
        let orbitals: Array2<f64> = coefficients[spin].select(Axis(1), occupied);
        let loc_orbs: Array2<f64> = localize_channel(mol, orbitals.view(), overlap, variant, sweeps)?;
        for (col, &idx) in occupied.iter().enumerate() {
            localized[spin].column_mut(idx).assign(&loc_orbs.column(col));
        }

        if mol.is_closed_shell(reference) {
            let (alpha, beta) = localized.split_at_mut(1);
            for &idx in occupied.iter() {
                beta[0].column_mut(idx).assign(&alpha[0].column(idx));
            }
            break;
        }
    }
    Ok(localized)
}

fn localize_channel(
    mol: &Molecule,
    orbitals: ArrayView2<f64>,
    overlap: ArrayView2<f64>,
    variant: LocalizationVariant,
    sweeps: &JacobiSweeps,
) -> Result<Array2<f64>, DecompError> {
    let loc_orbs: Array2<f64> = match variant {
        LocalizationVariant::FosterBoys => boys(orbitals, mol.dipole_integrals()?, sweeps)?,
        LocalizationVariant::PipekMezey => {
            pipek_mezey(orbitals, overlap, &mol.ao_labels, mol.n_atoms, sweeps)?
        }
        LocalizationVariant::IntrinsicBond { exponent } => {
            let minao = mol.minimal_basis("the IBO localization")?;
            let iaos: Array2<f64> = orthogonal_iaos(overlap, minao, orbitals)?;
            intrinsic_bond_orbitals(
                orbitals,
                overlap,
                iaos.view(),
                &minao.labels,
                mol.n_atoms,
                exponent,
                sweeps,
            )?
        }
    };
    Ok(loc_orbs)
}
