//! Fluid property errors.

use crate::property::InputPair;
use crate::species::Species;
use lh2_core::CoreError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// The provider could not resolve the requested state.
    #[error("Property lookup failed for {fluid} at {input}: {message}")]
    PropertyLookup {
        fluid: Species,
        input: InputPair,
        message: String,
    },

    /// Non-physical values returned by a backend (NaN, infinite).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A backend answered with a different number of values than were requested.
    #[error("Provider returned {got} values, expected {expected}")]
    OutputCount { expected: usize, got: usize },
}

impl FluidError {
    /// Whether this error came from the provider rejecting a state.
    pub fn is_lookup(&self) -> bool {
        matches!(self, FluidError::PropertyLookup { .. })
    }
}

impl From<CoreError> for FluidError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NonFinite { what, .. } => FluidError::NonPhysical { what },
            CoreError::InvalidArg { what } => FluidError::InvalidArg { what },
            CoreError::Invariant { what } => FluidError::NonPhysical { what },
        }
    }
}
