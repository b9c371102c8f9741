//! miniterm PTY - pseudoterminal plumbing
//!
//! This crate allocates a pseudoterminal pair and runs a child process on
//! its slave side. It provides:
//! - PTY allocation with an initial window size
//! - Child spawning as a session leader with the PTY as controlling terminal
//! - Non-blocking reads and writes on the master side
//! - Window size management (TIOCSWINSZ / TIOCGWINSZ)
//!
//! Reference: https://www.man7.org/linux/man-pages/man3/openpty.3.html

mod child;
mod error;
mod pty;
mod size;

pub use child::{exit_code, Child};
pub use error::{Error, Result};
pub use pty::Pty;
pub use size::WindowSize;
