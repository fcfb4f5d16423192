use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for clean-my-mac operations.
/// We use `anyhow` at the top level for CLI error handling,
/// but these typed errors allow modules to be precise about failures.
#[derive(Debug, Error)]
pub enum CleanMyMacError {
    /// File system operation failed
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A native tool invocation failed or exited non-zero
    #[error("command '{command}' failed: {message}")]
    Command { command: String, message: String },

    /// Refusing to touch a protected path
    #[error("protected path (will not delete): '{path}'")]
    Protected { path: PathBuf },

    /// Backup of an item failed
    #[error("backup failed for '{path}': {message}")]
    Backup { path: PathBuf, message: String },
}

impl CleanMyMacError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }
}
