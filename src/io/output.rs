use crate::defaults::PARTITION_FILE_NAME;
use crate::population::Partition;
use anyhow::{Context, Result};
use ndarray::prelude::*;
use ndarray_npy::write_npy;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Writes the localized orbitals of both spin channels as `mo_coeff_loc_a.npy` and
/// `mo_coeff_loc_b.npy`.
pub fn write_localized_orbitals(dir: &Path, orbitals: &[Array2<f64>; 2]) -> Result<()> {
    for (name, orbs) in ["mo_coeff_loc_a.npy", "mo_coeff_loc_b.npy"]
        .iter()
        .zip(orbitals.iter())
    {
        let path = dir.join(name);
        write_npy(&path, orbs).with_context(|| format!("Unable to write {}", path.display()))?;
    }
    Ok(())
}

pub fn write_partition(dir: &Path, partition: &Partition) -> Result<()> {
    let path = dir.join(PARTITION_FILE_NAME);
    let file = File::create(&path).with_context(|| format!("Unable to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), partition)
        .with_context(|| format!("Unable to write {}", path.display()))?;
    Ok(())
}
