use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(
        "service `{service}` is defined twice: {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateService {
        service: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("cannot derive a service name from {}: file name is not valid UTF-8", .path.display())]
    InvalidServiceName { path: PathBuf },
}

/// A single structural or semantic problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON-pointer-like location of the offending node (empty for the root).
    pub location: String,
    pub message: String,
}

impl Violation {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "#: {}", self.message)
        } else {
            write!(f, "#{}: {}", self.location, self.message)
        }
    }
}

#[derive(Debug, Error)]
#[error("document is not a valid OpenAPI specification ({} violation(s))", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("the directory for the output file {} does not exist", .path.display())]
    MissingDirectory { path: PathBuf },

    #[error("permission denied when writing to the output file {}", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("failed to render YAML: {0}")]
    RenderYaml(#[from] serde_yaml_ng::Error),

    #[error("failed to render JSON: {0}")]
    RenderJson(#[from] serde_json::Error),

    #[error("unexpected error when writing to the output file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// Stage-tagged failure of a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("write error: {0}")]
    Write(#[from] WriteError),
}

impl MergeError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            MergeError::Load(_) => 2,
            MergeError::Validation(_) => 3,
            MergeError::Write(WriteError::MissingDirectory { .. }) => 4,
            MergeError::Write(WriteError::PermissionDenied { .. }) => 5,
            MergeError::Write(_) => 6,
        }
    }
}
