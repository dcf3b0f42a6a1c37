use crate::initialization::Reference;
use crate::population::{PartitionPolicy, PopulationScheme};
pub use orbpart_localization::defaults::{LOC_CONV, MAX_SWEEPS};

// config file
pub const CONFIG_FILE_NAME: &str = "orbpart.toml";
// description of the molecule in the wavefunction directory
pub const MOLECULE_FILE_NAME: &str = "molecule.toml";
// partitioning of the occupied orbitals
pub const PARTITION_FILE_NAME: &str = "partition.json";

// REFERENCE AND ANALYSIS
// spin-restricted reference
pub const REFERENCE: Reference = Reference::Restricted;
// population analysis of the individual orbitals
pub const POPULATION_SCHEME: PopulationScheme = PopulationScheme::Mulliken;
// orbitals are partitioned onto atoms
pub const PARTITION_POLICY: PartitionPolicy = PartitionPolicy::Atoms;
// the orbital populations are computed in a worker pool
pub const PARALLEL: bool = false;

// PARALLELIZATION
// size of the global worker pool, 0 lets rayon use all available cores
pub const NUMBER_OF_CORES: usize = 1;
