//! User settings for miniterm
//!
//! Settings live in `miniterm.conf` under the per-user configuration
//! directory. Loading never fails: a missing or invalid value falls back to
//! its default, with a warning, field by field. A file that cannot be
//! parsed at all gives the defaults.

mod key_file;
mod template;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use key_file::{KeyFile, KeyFileError};
pub use template::TEMPLATE;

use crate::color::{ColorScheme, Rgba, PALETTE_SIZE};

pub const CONFIG_DIR_NAME: &str = "miniterm";
pub const CONFIG_FILE_NAME: &str = "miniterm.conf";
pub const DEFAULT_SCROLLBACK_LINES: u32 = 10_000;

const FONT_GROUP: &str = "Font";
const COLORS_GROUP: &str = "Colors";
const MISC_GROUP: &str = "Misc";

/// Visibility of the vertical scrollbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollbarPolicy {
    #[default]
    Never,
    Always,
}

impl From<bool> for ScrollbarPolicy {
    fn from(use_scrollbar: bool) -> Self {
        if use_scrollbar {
            ScrollbarPolicy::Always
        } else {
            ScrollbarPolicy::Never
        }
    }
}

/// A validated settings snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub dynamic_window_title: bool,
    pub urgent_on_bell: bool,
    pub audible_bell: bool,
    pub autohide_mouse: bool,
    pub scrollbar: ScrollbarPolicy,
    pub scrollback_lines: u32,
    /// None keeps the terminal's built-in font
    pub font_name: Option<String>,
    /// Present only when every color parsed
    pub colors: Option<ColorScheme>,
    pub columns: Option<u16>,
    pub rows: Option<u16>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dynamic_window_title: true,
            urgent_on_bell: true,
            audible_bell: false,
            autohide_mouse: true,
            scrollbar: ScrollbarPolicy::Never,
            scrollback_lines: DEFAULT_SCROLLBACK_LINES,
            font_name: None,
            colors: None,
            columns: None,
            rows: None,
        }
    }
}

impl Settings {
    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Build settings from parsed key-file contents.
    pub fn from_key_file(file: &KeyFile) -> Self {
        let defaults = Settings::default();
        Self {
            dynamic_window_title: read_bool(
                file,
                "dynamic-window-title",
                defaults.dynamic_window_title,
            ),
            urgent_on_bell: read_bool(file, "urgent-on-bell", defaults.urgent_on_bell),
            audible_bell: read_bool(file, "audible-bell", defaults.audible_bell),
            autohide_mouse: read_bool(file, "autohide-mouse", defaults.autohide_mouse),
            scrollbar: read_bool(file, "use-scrollbar", false).into(),
            scrollback_lines: read_scrollback(file),
            font_name: read_font(file),
            colors: read_colors(file),
            columns: read_dimension(file, "columns"),
            rows: read_dimension(file, "rows"),
        }
    }

    /// Parse settings from configuration text.
    pub fn parse(text: &str) -> Self {
        match KeyFile::parse(text) {
            Ok(file) => Self::from_key_file(&file),
            Err(e) => {
                log::warn!("invalid configuration ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields the defaults and a commented template is
    /// written in its place. An unreadable file yields the defaults and is
    /// left alone.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => {
                log::debug!("loaded settings from {}", path.display());
                Self::parse(&text)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                match write_template(path) {
                    Ok(()) => log::info!("wrote settings template to {}", path.display()),
                    Err(e) => log::warn!(
                        "failed to write settings template to {}: {}",
                        path.display(),
                        e
                    ),
                }
                Self::default()
            }
            Err(e) => {
                log::warn!("failed to read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

/// `$XDG_CONFIG_HOME/miniterm/miniterm.conf` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Write the commented template, creating the parent directory.
pub fn write_template(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, TEMPLATE)
}

fn read_bool(file: &KeyFile, key: &str, default: bool) -> bool {
    match file.get_bool(MISC_GROUP, key) {
        Ok(value) => value,
        Err(KeyFileError::KeyNotFound { .. }) => default,
        Err(e) => {
            log::warn!("{}, using default {}", e, default);
            default
        }
    }
}

fn read_integer(file: &KeyFile, key: &str) -> Option<i32> {
    match file.get_integer(MISC_GROUP, key) {
        Ok(value) => Some(value),
        Err(KeyFileError::KeyNotFound { .. }) => None,
        Err(e) => {
            log::warn!("{}, using default", e);
            None
        }
    }
}

fn read_scrollback(file: &KeyFile) -> u32 {
    match read_integer(file, "scrollback-lines") {
        None => DEFAULT_SCROLLBACK_LINES,
        Some(lines) if lines < 0 => {
            log::warn!("scrollback-lines must not be negative ({}), using 0", lines);
            0
        }
        Some(lines) => lines as u32,
    }
}

fn read_dimension(file: &KeyFile, key: &str) -> Option<u16> {
    let value = read_integer(file, key)?;
    if value <= 0 {
        return None;
    }
    match u16::try_from(value) {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("{} is too large ({}), ignored", key, value);
            None
        }
    }
}

fn read_font(file: &KeyFile) -> Option<String> {
    match file.get_string(FONT_GROUP, "font") {
        Ok(font) if font.trim().is_empty() => None,
        Ok(font) => Some(font),
        Err(KeyFileError::KeyNotFound { .. }) => None,
        Err(e) => {
            log::warn!("{}, keeping the default font", e);
            None
        }
    }
}

fn read_color(file: &KeyFile, key: &str) -> Option<Rgba> {
    let value = file.get_string(COLORS_GROUP, key).ok()?;
    match value.parse() {
        Ok(color) => Some(color),
        Err(e) => {
            log::warn!("Colors.{}: {}, ignoring all colors", key, e);
            None
        }
    }
}

/// Key name of palette slot `index`: `color00` through `color0f`.
pub fn palette_key(index: usize) -> String {
    format!("color{:02x}", index)
}

fn read_colors(file: &KeyFile) -> Option<ColorScheme> {
    if !file.has_group(COLORS_GROUP) {
        return None;
    }
    let foreground = read_color(file, "foreground")?;
    let background = read_color(file, "background")?;
    let mut palette = [Rgba::rgb(0, 0, 0); PALETTE_SIZE];
    for (index, slot) in palette.iter_mut().enumerate() {
        let key = palette_key(index);
        match read_color(file, &key) {
            Some(color) => *slot = color,
            None => {
                log::warn!("Colors.{} missing or invalid, ignoring all colors", key);
                return None;
            }
        }
    }
    Some(ColorScheme {
        foreground,
        background,
        palette,
    })
}
