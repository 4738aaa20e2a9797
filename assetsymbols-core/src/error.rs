//! Error Taxonomy - every failure is terminal for the invocation
//!
//! Nothing here is downgraded to a warning. A partially understood catalog
//! or a colliding symbol aborts the run before any artifact is published.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::ResourceDescriptor;

/// Pipeline stage, used for logging and for attributing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Reading,
    Building,
    Emitting,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Reading => "reading",
            Stage::Building => "building",
            Stage::Emitting => "emitting",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Malformed manifest {}: {reason}", .path.display())]
    MalformedManifest { path: PathBuf, reason: String },

    #[error("Unsupported resource kind '{kind}' at {}", .path.display())]
    UnsupportedKind { path: PathBuf, kind: String },

    #[error("Unrepresentable name: {kind} \"{name}\" has no identifier characters")]
    UnrepresentableName { kind: String, name: String },

    #[error("Duplicate symbol: {source_a} ({identifier_a}) collides with {source_b} ({identifier_b})")]
    DuplicateSymbol {
        identifier_a: String,
        identifier_b: String,
        source_a: ResourceDescriptor,
        source_b: ResourceDescriptor,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    EmitIOError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GenerateError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        GenerateError::MalformedManifest {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn emit_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::EmitIOError {
            path: path.into(),
            source,
        }
    }

    /// The stage in which this error is raised.
    pub fn stage(&self) -> Stage {
        match self {
            GenerateError::MalformedManifest { .. } | GenerateError::UnsupportedKind { .. } => {
                Stage::Reading
            }
            GenerateError::UnrepresentableName { .. } | GenerateError::DuplicateSymbol { .. } => {
                Stage::Building
            }
            GenerateError::EmitIOError { .. } | GenerateError::Serialization(_) => Stage::Emitting,
            GenerateError::InvalidConfig(_) => Stage::Idle,
        }
    }
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
