//! Application driver
//!
//! Wires the host terminal, the relay widget and the child process together
//! and runs the single-threaded event loop until the window closes.

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::os::fd::AsFd;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use miniterm_pty::{Child, WindowSize};
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM, SIGWINCH};

use crate::cli::Invocation;
use crate::controller::TerminalController;
use crate::error::Result;
use crate::host::{self, HostModes, RawMode};
use crate::relay::{HostInput, HostOutput, HostWindow, InputDecoder, RelayTerminal};
use crate::widget::{TerminalWidget, Window};

pub const DEFAULT_TITLE: &str = "miniterm";

const TERM: &str = "xterm-256color";
const POLL_TIMEOUT_MS: u16 = 100;
const READ_BUFFER_SIZE: usize = 65536;

pub struct App {
    invocation: Invocation,
    config_path: Option<PathBuf>,
    shutdown: Arc<AtomicBool>,
    resized: Arc<AtomicBool>,
}

impl App {
    pub fn new(invocation: Invocation, config_path: Option<PathBuf>) -> Self {
        Self {
            invocation,
            config_path,
            shutdown: Arc::new(AtomicBool::new(false)),
            resized: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops the event loop at its next iteration once set.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Route termination signals to the shutdown flag and SIGWINCH to the
    /// resize flag.
    pub fn register_signals(&self) -> io::Result<()> {
        for signal in [SIGHUP, SIGINT, SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&self.shutdown))?;
        }
        signal_hook::flag::register(SIGWINCH, Arc::clone(&self.resized))?;
        Ok(())
    }

    /// Run until the window closes and return the exit status for the
    /// process.
    pub fn run(self) -> Result<i32> {
        let stdin = io::stdin();
        let stdin_fd = stdin.as_fd();
        let mut host_in = File::from(stdin_fd.try_clone_to_owned()?);

        let host_size = WindowSize::of(io::stdout()).unwrap_or_else(|e| {
            log::debug!("host size unavailable ({}), using default", e);
            WindowSize::default()
        });

        let _raw = if host::is_terminal(stdin_fd) {
            Some(RawMode::enable(stdin_fd)?)
        } else {
            None
        };
        let _modes = HostModes::enable(io::stdout())?;

        let output: HostOutput = Rc::new(RefCell::new(io::stdout()));
        let terminal = Rc::new(RelayTerminal::new(
            Rc::clone(&output),
            host_size.cols,
            host_size.rows,
        ));
        let window = Rc::new(HostWindow::new(output));
        window.set_title(self.invocation.title.as_deref().unwrap_or(DEFAULT_TITLE));

        let mut controller = TerminalController::new(
            Rc::clone(&terminal),
            Rc::clone(&window),
            self.invocation.title.clone(),
            self.config_path.clone(),
        );
        controller.reload();

        let (cols, rows) = terminal.size();
        let mut child = Child::spawn(
            self.invocation.argv.as_slice(),
            self.invocation.directory.as_deref(),
            &[("TERM", TERM)],
            WindowSize::new(cols, rows),
        )?;
        child.set_nonblocking(true)?;
        log::info!("started {:?} as pid {}", self.invocation.argv, child.pid());

        let keep = self.invocation.keep;
        let mut decoder = InputDecoder::new();
        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        let mut synced_size = (cols, rows);
        let mut exit_status = None;
        let mut child_open = true;
        let mut host_open = true;

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                log::info!("termination signal received, shutting down");
                break;
            }
            if self.resized.swap(false, Ordering::Relaxed) {
                match WindowSize::of(io::stdout()) {
                    Ok(size) => terminal.host_resized(size.cols, size.rows),
                    Err(e) => log::debug!("host size unavailable: {}", e),
                }
            }
            let size = terminal.size();
            if child_open && size != synced_size {
                if let Err(e) = child.resize(WindowSize::new(size.0, size.1)) {
                    log::warn!("failed to resize child terminal: {}", e);
                }
                synced_size = size;
            }
            if window.is_closed() {
                break;
            }

            let (host_ready, child_ready) = {
                let mut fds = Vec::with_capacity(2);
                let host_index = host_open.then(|| {
                    fds.push(PollFd::new(host_in.as_fd(), PollFlags::POLLIN));
                    fds.len() - 1
                });
                let child_index = child_open.then(|| {
                    fds.push(PollFd::new(child.as_fd(), PollFlags::POLLIN));
                    fds.len() - 1
                });

                match poll(&mut fds, PollTimeout::from(POLL_TIMEOUT_MS)) {
                    Ok(_) => {}
                    Err(Errno::EINTR) => continue,
                    Err(e) => return Err(e.into()),
                }
                let ready = |index: Option<usize>| {
                    index
                        .and_then(|i| fds[i].revents())
                        .is_some_and(|r| r.intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR))
                };
                (ready(host_index), ready(child_index))
            };

            if child_ready {
                match child.read(&mut buf) {
                    Ok(0) => child_open = false,
                    Ok(n) => terminal.feed(&buf[..n]),
                    Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {}
                    Err(e) => {
                        // Linux reports EIO once the last slave descriptor closes.
                        log::debug!("child terminal closed: {}", e);
                        child_open = false;
                    }
                }
            }

            if host_ready {
                match host_in.read(&mut buf) {
                    Ok(0) => {
                        log::debug!("end of host input");
                        host_open = false;
                        if exit_status.is_some() {
                            window.close();
                        }
                    }
                    Ok(n) => {
                        for event in decoder.feed(&buf[..n]) {
                            match event {
                                HostInput::Focus(focused) => window.focus_changed(focused),
                                HostInput::Key { press, raw } => {
                                    if !controller.handle_key(press) {
                                        forward(&mut child, exit_status.is_some(), &window, &raw);
                                    }
                                }
                                HostInput::Data(bytes) => {
                                    forward(&mut child, exit_status.is_some(), &window, &bytes);
                                }
                            }
                        }
                    }
                    Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {}
                    Err(e) => return Err(e.into()),
                }
            }

            let pasted = terminal.take_input();
            if !pasted.is_empty() && exit_status.is_none() {
                forward(&mut child, false, &window, &pasted);
            }

            if exit_status.is_none() {
                if let Some(code) = child.try_wait()? {
                    log::info!("child exited with status {}", code);
                    exit_status = Some(code);
                    if child_open {
                        drain(&mut child, &terminal, &mut buf);
                        child_open = false;
                    }
                    if !keep || !host_open {
                        window.close();
                    }
                }
            }
        }

        Ok(exit_status.unwrap_or(0))
    }
}

/// Relay whatever the exited child left in the PTY.
fn drain(child: &mut Child, terminal: &RelayTerminal, buf: &mut [u8]) {
    loop {
        let mut fds = [PollFd::new(child.as_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, PollTimeout::from(POLL_TIMEOUT_MS)) {
            Ok(0) => return,
            Ok(_) => {}
            Err(Errno::EINTR) => continue,
            Err(e) => {
                log::debug!("poll failed while draining child output: {}", e);
                return;
            }
        }
        match child.read(buf) {
            Ok(0) => return,
            Ok(n) => terminal.feed(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) if e.kind() == ErrorKind::WouldBlock => return,
            Err(e) => {
                log::debug!("child terminal closed: {}", e);
                return;
            }
        }
    }
}

/// Send host input to the child, or close a kept window whose child is gone.
fn forward(child: &mut Child, exited: bool, window: &HostWindow, bytes: &[u8]) {
    if exited {
        window.close();
        return;
    }
    if let Err(e) = child.write_all(bytes) {
        log::warn!("failed to write to child: {}", e);
    }
}
