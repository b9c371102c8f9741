//! Error types for PTY operations

use std::io;
use thiserror::Error;

/// PTY error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PTY allocation failed
    #[error("Failed to create pty: {0}")]
    PtyCreation(String),

    /// Failed to spawn child process
    #[error("Failed to spawn {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Empty argument vector
    #[error("No command to run")]
    EmptyCommand,

    /// Failed to set or query window size
    #[error("Failed to set window size: {0}")]
    WindowSize(String),

    /// Nix error
    #[error("System error: {0}")]
    Nix(#[from] nix::Error),
}

/// Result type for PTY operations
pub type Result<T> = std::result::Result<T, Error>;
