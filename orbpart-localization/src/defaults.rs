// convergence threshold for the norm of the localization gradient
pub const LOC_CONV: f64 = 1.0e-10;
// stop the localization after this number of Jacobi sweeps
pub const MAX_SWEEPS: usize = 1000;
// eigenvalues of an overlap metric below this value are treated as linear dependencies
pub const LINDEP_THRESHOLD: f64 = 1.0e-12;
