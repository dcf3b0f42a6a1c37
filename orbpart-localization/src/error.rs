use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LocalizationError {
    /// The Jacobi sweeps did not reach the requested gradient norm.
    NotConverged {
        method: &'static str,
        sweeps: usize,
        gradient: f64,
    },
    /// A metric that has to be positive definite is singular or indefinite.
    SingularMatrix { matrix: &'static str },
    /// Two inputs disagree in size.
    DimensionMismatch {
        quantity: &'static str,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for LocalizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalizationError::NotConverged {
                method,
                sweeps,
                gradient,
            } => write!(
                f,
                "{} localization did not converge within {} sweeps. The norm of the \
                 gradient in the last sweep was {:.6e}",
                method, sweeps, gradient
            ),
            LocalizationError::SingularMatrix { matrix } => {
                write!(f, "The {} is not positive definite", matrix)
            }
            LocalizationError::DimensionMismatch {
                quantity,
                expected,
                found,
            } => write!(
                f,
                "Dimension mismatch in the {}: expected {}, found {}",
                quantity, expected, found
            ),
        }
    }
}

impl error::Error for LocalizationError {}
