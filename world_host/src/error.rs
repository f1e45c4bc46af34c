//! Errors raised at the host boundary.

use thiserror::Error;

/// Failures when translating external names into host vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("unknown {kind} name: {name}")]
    UnknownName { kind: &'static str, name: String },
}

impl HostError {
    pub fn unknown(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownName {
            kind,
            name: name.into(),
        }
    }
}
