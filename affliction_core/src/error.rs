//! Errors raised by the affliction runtime.

use thiserror::Error;

/// Everything that can go wrong outside the boolean apply/remove contract.
#[derive(Debug, Error)]
pub enum AfflictionError {
    #[error("invalid affliction definition: {0}")]
    InvalidDefinition(String),

    #[error("affliction '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("unknown affliction '{0}'")]
    UnknownAffliction(String),

    #[error("entity already has affliction '{0}'")]
    DuplicateAffliction(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AfflictionError>;
