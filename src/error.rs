use orbpart_localization::LocalizationError;
use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DecompError {
    /// The iterative localization did not converge or a metric was singular.
    LocalizationFailure(LocalizationError),
    /// An option that is required by the chosen settings was not given.
    MissingParameter {
        parameter: &'static str,
        required_by: String,
    },
    /// An option has a value that is not recognized.
    InvalidOption { option: &'static str, value: String },
    /// Matrices or vectors of inconsistent size.
    DimensionMismatch {
        quantity: &'static str,
        expected: usize,
        found: usize,
    },
    /// The worker pool for the population analysis could not be created.
    ThreadPool(String),
}

impl fmt::Display for DecompError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompError::LocalizationFailure(err) => write!(f, "Localization failed: {}", err),
            DecompError::MissingParameter {
                parameter,
                required_by,
            } => write!(f, "The parameter '{}' is required by {}", parameter, required_by),
            DecompError::InvalidOption { option, value } => {
                write!(f, "'{}' is not a valid value for the option '{}'", value, option)
            }
            DecompError::DimensionMismatch {
                quantity,
                expected,
                found,
            } => write!(
                f,
                "Dimension mismatch in the {}: expected {}, found {}",
                quantity, expected, found
            ),
            DecompError::ThreadPool(msg) => write!(f, "Could not start the worker pool: {}", msg),
        }
    }
}

impl error::Error for DecompError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DecompError::LocalizationFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LocalizationError> for DecompError {
    fn from(err: LocalizationError) -> Self {
        match err {
            LocalizationError::DimensionMismatch {
                quantity,
                expected,
                found,
            } => DecompError::DimensionMismatch {
                quantity,
                expected,
                found,
            },
            other => DecompError::LocalizationFailure(other),
        }
    }
}
