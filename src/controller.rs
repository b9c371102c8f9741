//! Applies settings to a terminal widget and reacts to its key bindings

use std::path::PathBuf;
use std::rc::Rc;

use crate::font::{self, FontDescription, FALLBACK_SIZE};
use crate::keys::{self, Action, KeyPress};
use crate::settings::Settings;
use crate::signal::Subscriptions;
use crate::widget::{TerminalWidget, Window};

/// Owns the settings-driven state of one terminal window
pub struct TerminalController<T, W> {
    terminal: Rc<T>,
    window: Rc<W>,
    /// Title from the command line; disables title following
    fixed_title: Option<String>,
    config_path: Option<PathBuf>,
    subscriptions: Subscriptions,
    /// Font size restored by a reset
    reset_size: i32,
}

impl<T, W> TerminalController<T, W>
where
    T: TerminalWidget + 'static,
    W: Window + 'static,
{
    pub fn new(
        terminal: Rc<T>,
        window: Rc<W>,
        fixed_title: Option<String>,
        config_path: Option<PathBuf>,
    ) -> Self {
        let reset_size = terminal.font().size();
        Self {
            terminal,
            window,
            fixed_title,
            config_path,
            subscriptions: Subscriptions::default(),
            reset_size,
        }
    }

    pub fn terminal(&self) -> &Rc<T> {
        &self.terminal
    }

    pub fn window(&self) -> &Rc<W> {
        &self.window
    }

    /// Number of live event subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Size a font reset returns to.
    pub fn reset_size(&self) -> i32 {
        self.reset_size
    }

    /// Load the configuration file and apply it.
    pub fn reload(&mut self) {
        let settings = match &self.config_path {
            Some(path) => Settings::load(path),
            None => {
                log::warn!("no configuration directory, using default settings");
                Settings::default()
            }
        };
        self.apply(&settings);
    }

    /// Push `settings` into the terminal and rewire its subscriptions.
    ///
    /// Safe to call repeatedly: previous subscriptions are dropped first.
    pub fn apply(&mut self, settings: &Settings) {
        let terminal = &self.terminal;
        terminal.set_audible_bell(settings.audible_bell);
        terminal.set_scrollback_lines(settings.scrollback_lines);
        terminal.set_mouse_autohide(settings.autohide_mouse);

        self.subscriptions.clear();
        if settings.urgent_on_bell {
            let window = Rc::downgrade(&self.window);
            self.subscriptions.push(terminal.bell_signal().connect(move |_| {
                if let Some(window) = window.upgrade() {
                    window.set_urgent(true);
                }
            }));
            // Any focus change means the user has seen the window.
            for focus_signal in [self.window.focus_in_signal(), self.window.focus_out_signal()] {
                let window = Rc::downgrade(&self.window);
                self.subscriptions.push(focus_signal.connect(move |_| {
                    if let Some(window) = window.upgrade() {
                        window.set_urgent(false);
                    }
                }));
            }
        }
        if settings.dynamic_window_title && self.fixed_title.is_none() {
            let window = Rc::downgrade(&self.window);
            self.subscriptions
                .push(terminal.title_signal().connect(move |title: &String| {
                    if let Some(window) = window.upgrade() {
                        window.set_title(title);
                    }
                }));
        }

        match &settings.font_name {
            Some(name) => {
                let font = FontDescription::parse(name);
                terminal.set_font(&font);
                self.reset_size = font.size();
            }
            None => self.reset_size = terminal.font().size(),
        }
        if self.reset_size == 0 {
            self.reset_size = FALLBACK_SIZE;
        }

        if settings.columns.is_some() || settings.rows.is_some() {
            let (columns, rows) = terminal.size();
            terminal.set_size(
                settings.columns.unwrap_or(columns),
                settings.rows.unwrap_or(rows),
            );
        }

        if let Some(colors) = &settings.colors {
            terminal.set_colors(colors);
        }

        terminal.set_scrollbar_policy(settings.scrollbar);
        log::debug!(
            "settings applied, {} subscriptions",
            self.subscriptions.len()
        );
    }

    pub fn increase_font_size(&self) {
        let font = self.terminal.font();
        if let Some(size) = font::increased_size(font.size()) {
            self.terminal.set_font(&font.with_size(size));
        }
    }

    pub fn decrease_font_size(&self) {
        let font = self.terminal.font();
        if let Some(size) = font::decreased_size(font.size()) {
            self.terminal.set_font(&font.with_size(size));
        }
    }

    pub fn reset_font_size(&self) {
        let font = self.terminal.font().with_size(self.reset_size);
        self.terminal.set_font(&font);
    }

    pub fn perform(&mut self, action: Action) {
        log::debug!("key action {:?}", action);
        match action {
            Action::Copy => self.terminal.copy_clipboard(),
            Action::Paste => self.terminal.paste_clipboard(),
            Action::IncreaseFontSize => self.increase_font_size(),
            Action::DecreaseFontSize => self.decrease_font_size(),
            Action::ResetFontSize => self.reset_font_size(),
            Action::ReloadSettings => self.reload(),
        }
    }

    /// Handle a key press; returns whether it was consumed.
    pub fn handle_key(&mut self, press: KeyPress) -> bool {
        match keys::action_for(press) {
            Some(action) => {
                self.perform(action);
                true
            }
            None => false,
        }
    }
}
