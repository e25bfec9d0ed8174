use std::error::Error;
use std::fmt;

/// Failures raised by training and evaluation.
///
/// All variants are recoverable by the caller; nothing is partially built
/// when one of them is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum BayesError {
    /// No rows were supplied.
    EmptyDataset,
    /// No row carries a non-empty value for the target column.
    NoClassesFound { target_column: String },
    /// Target column name is empty or no feature columns were given.
    MissingRequiredColumn(String),
    /// Empty manual split, unusable fold count, or unknown mode name.
    InvalidSplitConfiguration(String),
}

impl fmt::Display for BayesError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BayesError::EmptyDataset => write!(f, "Dataset contains no rows"),
            BayesError::NoClassesFound { target_column } => write!(
                f,
                "No classes found for target column '{}'",
                target_column
            ),
            BayesError::MissingRequiredColumn(what) => {
                write!(f, "Missing required column: {}", what)
            }
            BayesError::InvalidSplitConfiguration(reason) => {
                write!(f, "Invalid split configuration: {}", reason)
            }
        }
    }
}

impl Error for BayesError {}
