//! Child process management for PTY
//!
//! Spawns a program with the PTY slave as its stdio and controlling
//! terminal, and keeps the master side for the application.

use std::ffi::OsStr;
use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use nix::libc;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::error::{Error, Result};
use crate::pty::Pty;
use crate::size::WindowSize;

/// A child process attached to a PTY
pub struct Child {
    pty: Pty,
    process: std::process::Child,
    status: Option<i32>,
}

impl Child {
    /// Spawn `argv[0]` with the remaining arguments on a fresh PTY.
    ///
    /// # Arguments
    /// * `argv` - Program followed by its arguments, `PATH` is searched
    /// * `cwd` - Working directory of the child (inherited if None)
    /// * `env` - Variables set on top of the inherited environment
    /// * `size` - Initial window size
    pub fn spawn<S, K, V>(
        argv: &[S],
        cwd: Option<&Path>,
        env: &[(K, V)],
        size: WindowSize,
    ) -> Result<Self>
    where
        S: AsRef<OsStr>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        let (program, args) = argv.split_first().ok_or(Error::EmptyCommand)?;
        let (pty, slave) = Pty::open(size)?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::from(slave.try_clone()?))
            .stdout(Stdio::from(slave.try_clone()?))
            .stderr(Stdio::from(slave.try_clone()?));
        for (key, value) in env {
            cmd.env(key, value);
        }
        // The child sizes itself from the pty, stale values would win otherwise.
        cmd.env_remove("COLUMNS").env_remove("LINES");
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let raw_master = pty.as_raw_fd();
        let raw_slave = slave.as_raw_fd();
        unsafe {
            cmd.pre_exec(move || {
                // New session so the slave can become the controlling tty.
                if libc::setsid() == -1 {
                    return Err(io::Error::last_os_error());
                }
                if libc::ioctl(0, libc::TIOCSCTTY as libc::c_ulong, 0) == -1 {
                    return Err(io::Error::last_os_error());
                }

                for signo in [
                    libc::SIGCHLD,
                    libc::SIGHUP,
                    libc::SIGINT,
                    libc::SIGQUIT,
                    libc::SIGTERM,
                    libc::SIGWINCH,
                ] {
                    libc::signal(signo, libc::SIG_DFL);
                }

                libc::close(raw_master);
                libc::close(raw_slave);
                Ok(())
            });
        }

        let process = cmd.spawn().map_err(|source| Error::SpawnFailed {
            program: program.as_ref().to_string_lossy().into_owned(),
            source,
        })?;
        log::debug!("spawned child {}", process.id());

        Ok(Self {
            pty,
            process,
            status: None,
        })
    }

    pub fn pid(&self) -> Pid {
        Pid::from_raw(self.process.id() as i32)
    }

    /// Poll for exit without blocking.
    ///
    /// Returns the exit code once the child has been reaped; signals are
    /// reported as `128 + signo` the way shells do.
    pub fn try_wait(&mut self) -> Result<Option<i32>> {
        if self.status.is_none() {
            self.status = self.process.try_wait()?.map(exit_code);
        }
        Ok(self.status)
    }

    pub fn signal(&self, signal: Signal) -> Result<()> {
        kill(self.pid(), signal).map_err(Error::from)
    }

    /// Resize the PTY; the kernel delivers SIGWINCH to the foreground group.
    pub fn resize(&self, size: WindowSize) -> Result<()> {
        self.pty.set_window_size(size)
    }

    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.pty.read(buf)
    }

    pub fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.pty.write_all(buf)
    }

    pub fn set_nonblocking(&self, nonblocking: bool) -> Result<()> {
        self.pty.set_nonblocking(nonblocking)
    }
}

impl AsFd for Child {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.pty.as_fd()
    }
}

impl AsRawFd for Child {
    fn as_raw_fd(&self) -> RawFd {
        self.pty.as_raw_fd()
    }
}

impl Drop for Child {
    fn drop(&mut self) {
        if self.status.is_none() {
            let _ = self.signal(Signal::SIGHUP);
            let _ = self.process.try_wait();
        }
    }
}

/// Map a wait status to a process exit code.
pub fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => 128 + status.signal().unwrap_or(0),
    }
}
