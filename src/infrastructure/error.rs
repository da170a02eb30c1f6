//! Infrastructure-level errors raised by the environment store

use thiserror::Error;

/// Errors from reading or writing the process environment.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("environment variable {name} holds a value that is not valid unicode")]
    NotUnicode { name: String },

    /// The native primitive refused a write. Not recoverable.
    #[error("cannot {action} environment variable {name}: {source}")]
    Mutation {
        action: &'static str,
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    /// Create a mutation error for a failed `set`.
    pub fn set(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Mutation {
            action: "set",
            name: name.into(),
            source,
        }
    }

    /// Create a mutation error for a failed `unset`.
    pub fn unset(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Mutation {
            action: "unset",
            name: name.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
