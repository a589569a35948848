//! Error types for cycle orchestration and configuration.

use crate::config::ValidationError;
use lh2_process::ProcessError;
use thiserror::Error;

/// Errors that abort a cycle run or a scenario load.
#[derive(Error, Debug)]
pub enum CycleError {
    #[error("Transition failed: {0}")]
    Process(#[from] ProcessError),

    #[error("Unknown vessel: {name}")]
    UnknownVessel { name: String },

    #[error("Invalid event: {what}")]
    InvalidEvent { what: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type CycleResult<T> = Result<T, CycleError>;
