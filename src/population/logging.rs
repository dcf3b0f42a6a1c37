use crate::population::BondPartition;
use itertools::Itertools;
use log::info;
use ndarray::Array1;

pub fn print_population_weights(
    symbols: &[String],
    occupied: [&[usize]; 2],
    weights: &[Vec<Array1<f64>>; 2],
) {
    info!("{:^80}", "");
    info!("{: ^80}", "Partial population weights");
    info!("{:-^80}", "");
    info!(
        "{: <5} {: >4}  {}",
        "spin",
        "MO",
        symbols.iter().map(|s| format!("{: >7}", s)).join("")
    );
    for (spin, (orbs, w_spin)) in occupied.iter().zip(weights.iter()).enumerate() {
        let label: &str = if spin == 0 { "a" } else { "b" };
        for (mo, w) in orbs.iter().zip(w_spin.iter()) {
            info!(
                "{: <5} {: >4}  {}",
                label,
                mo,
                w.iter().map(|x| format!("{:>7.3}", x)).join("")
            );
        }
    }
    info!("{:-^80}", "");
}

pub fn print_bond_centres(partition: &BondPartition) {
    info!("{:^80}", "");
    info!("{: ^80}", "Population centres");
    info!("{:-^80}", "");
    for (spin, (unique, groups)) in partition
        .unique
        .iter()
        .zip(partition.groups.iter())
        .enumerate()
    {
        let label: &str = if spin == 0 { "a" } else { "b" };
        for (centre, group) in unique.iter().zip(groups.iter()) {
            info!(
                "{: <5} {: >4} {: >4}   orbitals: {}",
                label,
                centre[0],
                centre[1],
                group.iter().join(", ")
            );
        }
    }
    info!("{:-^80}", "");
}
