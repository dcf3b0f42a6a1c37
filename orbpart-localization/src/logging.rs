use log::{debug, info};

pub fn print_sweeps_init(method: &str, n_orbitals: usize, conv_tol: f64, max_sweeps: usize) {
    info!("{:^80}", "");
    info!("{: ^80}", format!("{} Localization", method));
    info!("{:-^80}", "");
    info!("{: <25} {}", "occupied orbitals:", n_orbitals);
    info!("{: <25} {:.1e}", "gradient threshold:", conv_tol);
    info!("{: <25} {}", "max. sweeps:", max_sweeps);
    info!("{:^80}", "");
    debug!("{:-^43} ", "");
    debug!("{: <5} {: >18} {: >18}", "Sweep", "Functional", "Gradient norm");
    debug!("{:-^43} ", "");
}

pub fn print_sweep(sweep: usize, functional: f64, gradient: f64) {
    debug!("{: >5} {:>18.10e} {:>18.10e}", sweep + 1, functional, gradient);
}

pub fn print_sweeps_end(method: &str, sweeps: usize, functional: f64) {
    debug!("{:-^43} ", "");
    info!("{} localization converged after {} sweep(s)", method, sweeps);
    info!("{: <25} {:.14}", "localization functional:", functional);
    info!("{:-<80} ", "");
}
