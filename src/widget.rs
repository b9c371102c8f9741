//! The toolkit seam: what the application needs from a terminal widget
//! and from the window that hosts it.
//!
//! Setters take `&self`; implementations are single-threaded and use
//! interior mutability, the way toolkit objects behave.

use crate::color::ColorScheme;
use crate::font::FontDescription;
use crate::settings::ScrollbarPolicy;
use crate::signal::Signal;

pub trait TerminalWidget {
    fn set_audible_bell(&self, enabled: bool);

    fn set_scrollback_lines(&self, lines: u32);

    fn set_mouse_autohide(&self, enabled: bool);

    fn font(&self) -> FontDescription;

    fn set_font(&self, font: &FontDescription);

    /// Foreground, background and palette in one call.
    fn set_colors(&self, colors: &ColorScheme);

    /// Size in character cells as `(columns, rows)`.
    fn size(&self) -> (u16, u16);

    fn set_size(&self, columns: u16, rows: u16);

    fn set_scrollbar_policy(&self, policy: ScrollbarPolicy);

    fn copy_clipboard(&self);

    fn paste_clipboard(&self);

    /// Emitted when the child rings the bell.
    fn bell_signal(&self) -> &Signal<()>;

    /// Emitted with the new title when the child sets one.
    fn title_signal(&self) -> &Signal<String>;
}

pub trait Window {
    fn set_title(&self, title: &str);

    fn title(&self) -> String;

    fn set_urgent(&self, urgent: bool);

    fn is_urgent(&self) -> bool;

    /// Emitted when the window gains input focus.
    fn focus_in_signal(&self) -> &Signal<()>;

    fn focus_out_signal(&self) -> &Signal<()>;
}
