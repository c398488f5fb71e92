use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("System dependency missing: {0}")]
    DependencyMissing(String),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    #[error("'{command}' exited with status {code}")]
    ExternalStatus { command: String, code: i32 },

    #[error("{0}")]
    Other(String),
}

impl SandboxError {
    /// Process exit code for this error. Validation and usage failures exit
    /// with 2; a failing external command propagates its own status.
    pub fn exit_code(&self) -> i32 {
        match self {
            SandboxError::ExternalStatus { code, .. } => *code,
            SandboxError::Interrupted => 130,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, SandboxError>;
