//! Localized molecular orbitals and the partitioning of their electrons onto atoms and bonds.
//!
//! The occupied orbitals of a converged mean-field calculation are localized with one of
//! the Jacobi-sweep schemes of [orbpart_localization] and every occupied orbital is assigned
//! to the atoms through its population weights. With the `bonds` policy every orbital is
//! attributed to one atom (core orbitals and lone pairs) or to a pair of atoms (bonds).

pub mod defaults;
pub mod error;
pub mod initialization;
pub mod io;
pub mod localization;
pub mod population;
pub mod utils;

pub use error::DecompError;
pub use initialization::{occupied_indices, Molecule, Reference};
pub use io::Configuration;
pub use localization::{localize, localize_with, LocalizationVariant};
pub use orbpart_localization::{Exponent, JacobiSweeps, JacobiSweepsBuilder, MinimalBasis};
pub use population::{
    assign, AssignOptions, AssignOptionsBuilder, BondPartition, Partition, PartitionPolicy,
    PopulationScheme,
};
