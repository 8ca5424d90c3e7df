use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid SMILES string: {0}")]
    InvalidSmiles(String),

    #[error("Executable not found or not executable: {path}", path = path.display())]
    ExecutableNotFound { path: PathBuf },

    #[error("Failed to launch '{program}': {source}", program = program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' failed with {status}", program = program.display())]
    EngineFailed { program: PathBuf, status: ExitStatus },

    #[error("Geometry generation failed: {0}")]
    Geometry(String),

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl WorkflowError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code of a failed engine run. `None` for every other variant and for
    /// processes terminated by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::EngineFailed { status, .. } => status.code(),
            _ => None,
        }
    }
}
