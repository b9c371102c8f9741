//! Fatal application errors

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to parse command: {0}")]
    Command(#[from] shell_words::ParseError),

    #[error("command is empty")]
    EmptyCommand,

    #[error("failed to set up the terminal: {0}")]
    Pty(#[from] miniterm_pty::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("system error: {0}")]
    Nix(#[from] nix::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
