use anyhow::{Context, Result};
use clap::{crate_name, crate_version, Arg, Command};
use env_logger::Builder;
use log::{info, warn, LevelFilter};
use orbpart::io::{
    read_wavefunction, write_footer, write_header, write_localized_orbitals, write_partition,
};
use orbpart::utils::Timer;
use orbpart::{assign, localize_with, Configuration, Partition};
use std::io::Write;
use std::path::Path;

fn main() -> Result<()> {
    // Input.
    let matches = Command::new(crate_name!())
        .version(crate_version!())
        .about("localization and population partitioning of molecular orbitals")
        .arg(
            Arg::new("wavefunction")
                .help("Directory with the molecule file and the orbitals as .npy files")
                .required(true)
                .index(1),
        )
        .get_matches();
    let dir: &Path = Path::new(
        matches
            .get_one::<String>("wavefunction")
            .context("No wavefunction directory given")?,
    );
    let config: Configuration = Configuration::new()?;

    // Multithreading.
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.parallelization.number_of_cores)
        .build_global()
        .context("Unable to build the global thread pool")?;

    // Logging.
    // The log level is set.
    let log_level: LevelFilter = match config.verbose {
        2 => LevelFilter::Trace,
        1 => LevelFilter::Debug,
        0 => LevelFilter::Info,
        -1 => LevelFilter::Warn,
        -2 => LevelFilter::Error,
        _ => LevelFilter::Info,
    };
    // and the logger is build.
    Builder::new()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .filter(None, log_level)
        .init();

    // The program header is written to the command line.
    write_header();
    if config.parallel && config.population_workers() == 1 {
        warn!("parallel = true, but the global pool only holds one thread (number_of_cores)");
    }
    // and the total wall-time timer is started.
    let timer: Timer = Timer::start();

    let (mol, mut wavefunction) = read_wavefunction(dir)?;

    if let Some(variant) = config.localization_variant {
        let loc_timer: Timer = Timer::start();
        wavefunction.coefficients = localize_with(
            &mol,
            &wavefunction.coefficients,
            wavefunction.overlap.view(),
            config.reference,
            variant,
            &config.jacobi_sweeps()?,
        )?;
        write_localized_orbitals(dir, &wavefunction.coefficients)?;
        info!("{}", loc_timer);
    }

    let partition: Partition = assign(
        &mol,
        wavefunction.overlap.view(),
        &wavefunction.coefficients,
        &wavefunction.occupations,
        &config.assign_options()?,
    )?;
    write_partition(dir, &partition)?;

    write_footer(timer);
    Ok(())
}
