//! PTY (pseudoterminal) management
//!
//! Handles allocation of the master/slave pair. The master stays with the
//! application, the slave becomes the child's stdio and controlling terminal.

use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::libc;
use nix::pty::openpty;

use crate::error::{Error, Result};
use crate::size::WindowSize;

/// The master side of a pseudoterminal
pub struct Pty {
    master: File,
}

impl Pty {
    /// Allocate a new pair sized to `size`.
    ///
    /// Returns the master and the slave descriptor. The slave is meant to be
    /// handed to a child process and dropped by the parent afterwards.
    pub fn open(size: WindowSize) -> Result<(Self, OwnedFd)> {
        let winsize = size.to_winsize();
        let pair = openpty(&winsize, None).map_err(|e| Error::PtyCreation(e.to_string()))?;
        log::debug!("allocated pty {}x{}", size.cols, size.rows);
        Ok((
            Self {
                master: File::from(pair.master),
            },
            pair.slave,
        ))
    }

    pub fn set_nonblocking(&self, nonblocking: bool) -> Result<()> {
        let fd = self.master.as_raw_fd();
        let flags = OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL)?);
        let flags = if nonblocking {
            flags | OFlag::O_NONBLOCK
        } else {
            flags & !OFlag::O_NONBLOCK
        };
        fcntl(fd, FcntlArg::F_SETFL(flags))?;
        Ok(())
    }

    pub fn set_window_size(&self, size: WindowSize) -> Result<()> {
        let ws = size.to_winsize();
        let fd = self.master.as_raw_fd();
        let result = unsafe { libc::ioctl(fd, libc::TIOCSWINSZ as libc::c_ulong, &ws) };
        if result == -1 {
            return Err(Error::WindowSize(io::Error::last_os_error().to_string()));
        }
        Ok(())
    }

    pub fn window_size(&self) -> Result<WindowSize> {
        WindowSize::of(&self.master)
    }

    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.master.read(buf)
    }

    pub fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.master.write_all(buf)
    }
}

impl AsRawFd for Pty {
    fn as_raw_fd(&self) -> RawFd {
        self.master.as_raw_fd()
    }
}

impl AsFd for Pty {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.master.as_fd()
    }
}
