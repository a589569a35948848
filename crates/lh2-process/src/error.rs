//! Error types for transition operations.

use lh2_core::CoreError;
use lh2_fluids::FluidError;
use thiserror::Error;

/// Errors that abort a transition.
///
/// Recoverable conditions (empty trailer, clamped quality, step limit) are not errors;
/// they travel as [`Diagnostic`](crate::Diagnostic)s in the operation result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    #[error("Property lookup failed: {0}")]
    PropertyLookup(#[from] FluidError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ProcessResult<T> = Result<T, ProcessError>;

impl From<CoreError> for ProcessError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, .. }
            | CoreError::InvalidArg { what }
            | CoreError::Invariant { what } => ProcessError::InvalidArg { what },
        }
    }
}
