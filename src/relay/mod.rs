//! Terminal backend that relays a child PTY to the host terminal
//!
//! The host terminal miniterm was started from does the rendering. This
//! backend owns the widget-side state, forwards child output, and turns
//! the bell and title sequences it sees into signals.

mod input;
mod scan;

use std::cell::{Cell, RefCell};
use std::io::Write;
use std::rc::Rc;

use arboard::Clipboard;

pub use input::{HostInput, InputDecoder};
pub use scan::{Output, OutputScanner};

use crate::color::ColorScheme;
use crate::font::FontDescription;
use crate::settings::ScrollbarPolicy;
use crate::signal::Signal;
use crate::widget::{TerminalWidget, Window};

/// Shared writer for everything sent to the host terminal
pub type HostOutput = Rc<RefCell<dyn Write>>;

pub const DEFAULT_FONT: &str = "Monospace 12";
pub const DEFAULT_SCROLLBACK_LINES: u32 = 512;

fn write_host(host: &HostOutput, bytes: &[u8]) {
    let mut host = host.borrow_mut();
    if let Err(e) = host.write_all(bytes).and_then(|()| host.flush()) {
        log::warn!("failed to write to host terminal: {}", e);
    }
}

/// Observable widget state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalState {
    pub audible_bell: bool,
    pub scrollback_lines: u32,
    pub mouse_autohide: bool,
    pub font: FontDescription,
    pub colors: Option<ColorScheme>,
    pub columns: u16,
    pub rows: u16,
    pub scrollbar: ScrollbarPolicy,
    /// Last title reported by the child
    pub title: Option<String>,
}

pub struct RelayTerminal {
    host: HostOutput,
    state: RefCell<TerminalState>,
    scanner: RefCell<OutputScanner>,
    /// Bytes waiting to be written to the child
    input: RefCell<Vec<u8>>,
    clipboard: RefCell<Option<Clipboard>>,
    bell: Signal<()>,
    title_changed: Signal<String>,
}

impl RelayTerminal {
    pub fn new(host: HostOutput, columns: u16, rows: u16) -> Self {
        Self {
            host,
            state: RefCell::new(TerminalState {
                audible_bell: true,
                scrollback_lines: DEFAULT_SCROLLBACK_LINES,
                mouse_autohide: false,
                font: FontDescription::parse(DEFAULT_FONT),
                colors: None,
                columns,
                rows,
                scrollbar: ScrollbarPolicy::Never,
                title: None,
            }),
            scanner: RefCell::new(OutputScanner::new()),
            input: RefCell::new(Vec::new()),
            clipboard: RefCell::new(None),
            bell: Signal::new(),
            title_changed: Signal::new(),
        }
    }

    pub fn state(&self) -> TerminalState {
        self.state.borrow().clone()
    }

    /// Process output read from the child.
    pub fn feed(&self, output: &[u8]) {
        let outputs = self.scanner.borrow_mut().scan(output);
        for item in outputs {
            match item {
                Output::Data(bytes) => write_host(&self.host, &bytes),
                Output::Bell => {
                    if self.state.borrow().audible_bell {
                        write_host(&self.host, b"\x07");
                    }
                    self.bell.emit(&());
                }
                Output::Title(title) => {
                    self.state.borrow_mut().title = Some(title.clone());
                    self.title_changed.emit(&title);
                }
            }
        }
    }

    /// Take the bytes queued for the child, such as pasted text.
    pub fn take_input(&self) -> Vec<u8> {
        std::mem::take(&mut *self.input.borrow_mut())
    }

    /// Record a size change made by the host itself.
    pub fn host_resized(&self, columns: u16, rows: u16) {
        let mut state = self.state.borrow_mut();
        state.columns = columns;
        state.rows = rows;
    }
}

impl TerminalWidget for RelayTerminal {
    fn set_audible_bell(&self, enabled: bool) {
        self.state.borrow_mut().audible_bell = enabled;
    }

    fn set_scrollback_lines(&self, lines: u32) {
        // The host keeps its own history; recorded for the widget state only.
        self.state.borrow_mut().scrollback_lines = lines;
    }

    fn set_mouse_autohide(&self, enabled: bool) {
        self.state.borrow_mut().mouse_autohide = enabled;
    }

    fn font(&self) -> FontDescription {
        self.state.borrow().font.clone()
    }

    fn set_font(&self, font: &FontDescription) {
        self.state.borrow_mut().font = font.clone();
        write_host(&self.host, format!("\x1b]50;{}\x07", font).as_bytes());
    }

    fn set_colors(&self, colors: &ColorScheme) {
        self.state.borrow_mut().colors = Some(colors.clone());

        let mut seq = format!(
            "\x1b]10;{}\x07\x1b]11;{}\x07",
            colors.foreground.to_x11_spec(),
            colors.background.to_x11_spec()
        );
        for (index, color) in colors.palette.iter().enumerate() {
            seq.push_str(&format!("\x1b]4;{};{}\x07", index, color.to_x11_spec()));
        }
        write_host(&self.host, seq.as_bytes());
    }

    fn size(&self) -> (u16, u16) {
        let state = self.state.borrow();
        (state.columns, state.rows)
    }

    fn set_size(&self, columns: u16, rows: u16) {
        self.host_resized(columns, rows);
        write_host(&self.host, format!("\x1b[8;{};{}t", rows, columns).as_bytes());
    }

    fn set_scrollbar_policy(&self, policy: ScrollbarPolicy) {
        self.state.borrow_mut().scrollbar = policy;
    }

    fn copy_clipboard(&self) {
        // Selections are made and owned by the host terminal.
        log::debug!("copy requested, selection belongs to the host terminal");
    }

    fn paste_clipboard(&self) {
        let mut clipboard = self.clipboard.borrow_mut();
        if clipboard.is_none() {
            match Clipboard::new() {
                Ok(c) => *clipboard = Some(c),
                Err(e) => {
                    log::warn!("clipboard unavailable: {}", e);
                    return;
                }
            }
        }
        let Some(clipboard) = clipboard.as_mut() else {
            return;
        };
        match clipboard.get_text() {
            Ok(text) => self.input.borrow_mut().extend_from_slice(text.as_bytes()),
            Err(e) => log::warn!("failed to read clipboard: {}", e),
        }
    }

    fn bell_signal(&self) -> &Signal<()> {
        &self.bell
    }

    fn title_signal(&self) -> &Signal<String> {
        &self.title_changed
    }
}

/// The host terminal's own window, as far as it can be controlled
pub struct HostWindow {
    host: HostOutput,
    title: RefCell<String>,
    urgent: Cell<bool>,
    closed: Cell<bool>,
    focus_in: Signal<()>,
    focus_out: Signal<()>,
}

impl HostWindow {
    pub fn new(host: HostOutput) -> Self {
        Self {
            host,
            title: RefCell::new(String::new()),
            urgent: Cell::new(false),
            closed: Cell::new(false),
            focus_in: Signal::new(),
            focus_out: Signal::new(),
        }
    }

    /// Report a focus change from the host.
    pub fn focus_changed(&self, focused: bool) {
        if focused {
            self.focus_in.emit(&());
        } else {
            self.focus_out.emit(&());
        }
    }

    pub fn close(&self) {
        self.closed.set(true);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl Window for HostWindow {
    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
        // Control characters would end the sequence early.
        let clean: String = title.chars().filter(|c| !c.is_control()).collect();
        write_host(&self.host, format!("\x1b]2;{}\x07", clean).as_bytes());
    }

    fn title(&self) -> String {
        self.title.borrow().clone()
    }

    fn set_urgent(&self, urgent: bool) {
        if self.urgent.replace(urgent) != urgent {
            log::debug!("window urgency {}", urgent);
        }
    }

    fn is_urgent(&self) -> bool {
        self.urgent.get()
    }

    fn focus_in_signal(&self) -> &Signal<()> {
        &self.focus_in
    }

    fn focus_out_signal(&self) -> &Signal<()> {
        &self.focus_out
    }
}
