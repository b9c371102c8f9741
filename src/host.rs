//! Host terminal setup for the lifetime of a session

use std::io::{self, Write};
use std::os::fd::{AsFd, BorrowedFd};

use nix::sys::termios::{self, SetArg, SpecialCharacterIndices, Termios};

/// Focus reporting and modifyOtherKeys level 1
const ENABLE_MODES: &[u8] = b"\x1b[?1004h\x1b[>4;1m";
const RESET_MODES: &[u8] = b"\x1b[?1004l\x1b[>4m";

/// Puts a terminal in raw mode, restoring the original settings on drop
pub struct RawMode<'fd> {
    fd: BorrowedFd<'fd>,
    original: Termios,
}

impl<'fd> RawMode<'fd> {
    pub fn enable(fd: BorrowedFd<'fd>) -> nix::Result<Self> {
        let original = termios::tcgetattr(fd)?;

        let mut raw = original.clone();
        termios::cfmakeraw(&mut raw);
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
        termios::tcsetattr(fd, SetArg::TCSANOW, &raw)?;

        Ok(Self { fd, original })
    }
}

impl Drop for RawMode<'_> {
    fn drop(&mut self) {
        if let Err(e) = termios::tcsetattr(self.fd, SetArg::TCSANOW, &self.original) {
            log::warn!("failed to restore terminal settings: {}", e);
        }
    }
}

/// Enables the host reports miniterm listens for, reset on drop
pub struct HostModes<W: Write> {
    out: W,
}

impl<W: Write> HostModes<W> {
    pub fn enable(mut out: W) -> io::Result<Self> {
        out.write_all(ENABLE_MODES)?;
        out.flush()?;
        Ok(Self { out })
    }
}

impl<W: Write> Drop for HostModes<W> {
    fn drop(&mut self) {
        let _ = self.out.write_all(RESET_MODES).and_then(|()| self.out.flush());
    }
}

/// Whether `fd` refers to a terminal.
pub fn is_terminal<F: AsFd>(fd: F) -> bool {
    termios::tcgetattr(fd).is_ok()
}
