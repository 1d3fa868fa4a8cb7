//! Error taxonomy for the wizard core.

use thiserror::Error;

/// Errors surfaced by wizard operations.
///
/// Every variant is fatal to the call that produced it. Validation vetoes from
/// the `stepChanging`/`finishing` hooks are not errors and never appear here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepsError {
    #[error("Index out of range: {index} (step count {count})")]
    IndexOutOfRange { index: isize, count: usize },

    #[error("The key \"{key}\" does not exist in the substitute collection!")]
    MissingSubstitution { key: String },

    #[error("{0}")]
    StructuralMismatch(String),

    #[error("The enum key \"{0}\" does not exist.")]
    InvalidEnumKey(String),

    #[error("Invalid enum value \"{0}\".")]
    InvalidEnumValue(String),

    #[error("{0} is not yet implemented!")]
    NotImplemented(&'static str),
}

impl StepsError {
    pub(crate) fn out_of_range(index: impl TryInto<isize>, count: usize) -> Self {
        StepsError::IndexOutOfRange {
            index: index.try_into().unwrap_or(isize::MAX),
            count,
        }
    }
}
