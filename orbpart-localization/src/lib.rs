//! Jacobi-sweep localization of occupied molecular orbitals.
//!
//! The occupied orbitals are rotated pairwise until a localization functional
//! of the form `Σ_A Σ_i (Q^A_ii)^p` is maximal. The three supported schemes only
//! differ in the choice of the operators `Q^A`:
//! - Foster–Boys: the three components of the dipole operator,
//! - Pipek–Mezey: Mulliken atomic charge matrices,
//! - Intrinsic bond orbitals: atomic charges in the basis of intrinsic atomic orbitals.

pub mod boys;
pub mod defaults;
mod error;
pub mod iao;
pub mod ibo;
pub mod jacobi;
pub mod linalg;
mod logging;
pub mod pipek;

pub use boys::boys;
pub use error::LocalizationError;
pub use iao::{intrinsic_atomic_orbitals, orthogonal_iaos, MinimalBasis};
pub use ibo::intrinsic_bond_orbitals;
pub use jacobi::{Exponent, JacobiSweeps, JacobiSweepsBuilder};
pub use linalg::lowdin;
pub use pipek::pipek_mezey;
