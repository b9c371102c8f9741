//! Window size for PTY

use std::io;
use std::os::fd::{AsFd, AsRawFd};

use nix::libc;
use nix::pty::Winsize;

use crate::error::{Error, Result};

/// Window size in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    /// Number of columns (characters)
    pub cols: u16,
    /// Number of rows (characters)
    pub rows: u16,
}

impl WindowSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Query the size of the terminal behind `fd`.
    ///
    /// Returns an error when `fd` is not a terminal or reports a zero size.
    pub fn of<F: AsFd>(fd: F) -> Result<Self> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let raw = fd.as_fd().as_raw_fd();
        let result = unsafe { libc::ioctl(raw, libc::TIOCGWINSZ as libc::c_ulong, &mut ws) };
        if result == -1 {
            return Err(Error::WindowSize(io::Error::last_os_error().to_string()));
        }
        if ws.ws_col == 0 || ws.ws_row == 0 {
            return Err(Error::WindowSize("terminal reported an empty size".to_string()));
        }
        Ok(Self::from(ws))
    }

    pub fn to_winsize(self) -> Winsize {
        Winsize {
            ws_row: self.rows,
            ws_col: self.cols,
            ws_xpixel: 0,
            ws_ypixel: 0,
        }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl From<Winsize> for WindowSize {
    fn from(ws: Winsize) -> Self {
        Self {
            cols: ws.ws_col,
            rows: ws.ws_row,
        }
    }
}
