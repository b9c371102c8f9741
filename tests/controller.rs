//! Tests for applying settings to the relay terminal
//!
//! The host terminal is replaced with an in-memory buffer so the escape
//! sequences sent to it can be inspected.

use std::cell::RefCell;
use std::rc::Rc;

use miniterm::font::{FALLBACK_SIZE, MAX_SIZE, SCALE};
use miniterm::keys::{Key, KeyPress, Modifiers};
use miniterm::relay::{HostOutput, HostWindow, RelayTerminal};
use miniterm::settings::{palette_key, ScrollbarPolicy};
use miniterm::widget::{TerminalWidget, Window};
use miniterm::{Settings, TerminalController};

type Controller = TerminalController<RelayTerminal, HostWindow>;

struct Harness {
    host: Rc<RefCell<Vec<u8>>>,
    terminal: Rc<RelayTerminal>,
    window: Rc<HostWindow>,
    controller: Controller,
}

impl Harness {
    fn new(fixed_title: Option<&str>) -> Self {
        let host = Rc::new(RefCell::new(Vec::new()));
        let output: HostOutput = host.clone();
        let terminal = Rc::new(RelayTerminal::new(output.clone(), 80, 24));
        let window = Rc::new(HostWindow::new(output));
        let controller = TerminalController::new(
            Rc::clone(&terminal),
            Rc::clone(&window),
            fixed_title.map(str::to_string),
            None,
        );
        Self {
            host,
            terminal,
            window,
            controller,
        }
    }

    fn host_text(&self) -> String {
        String::from_utf8_lossy(&self.host.borrow()).into_owned()
    }

    fn clear_host(&self) {
        self.host.borrow_mut().clear();
    }
}

fn full_colors_config() -> String {
    let mut text = String::from("[Colors]\nforeground=#000000\nbackground=#ffffff\n");
    for i in 0..16 {
        text.push_str(&format!("{}=#{:02x}{:02x}{:02x}\n", palette_key(i), i * 10, i * 5, i));
    }
    text
}

fn font_size(terminal: &RelayTerminal) -> i32 {
    terminal.font().size()
}

// ============================================================================
// Applier
// ============================================================================

#[test]
fn test_apply_pushes_scalar_settings() {
    let mut h = Harness::new(None);
    let settings = Settings::parse(
        "[Misc]\naudible-bell=true\nscrollback-lines=250\nuse-scrollbar=true\nautohide-mouse=false\n",
    );
    h.controller.apply(&settings);

    let state = h.terminal.state();
    assert!(state.audible_bell);
    assert_eq!(state.scrollback_lines, 250);
    assert_eq!(state.scrollbar, ScrollbarPolicy::Always);
    assert!(!state.mouse_autohide);
}

#[test]
fn test_apply_twice_is_idempotent() {
    let mut h = Harness::new(None);
    let settings = Settings::parse(&full_colors_config());

    h.controller.apply(&settings);
    let first = h.terminal.state();
    let count = h.controller.subscription_count();

    h.controller.apply(&settings);
    assert_eq!(h.terminal.state(), first);
    assert_eq!(h.controller.subscription_count(), count);
    assert_eq!(count, 4);
    assert_eq!(h.terminal.bell_signal().handler_count(), 1);
    assert_eq!(h.terminal.title_signal().handler_count(), 1);
    assert_eq!(h.window.focus_in_signal().handler_count(), 1);
    assert_eq!(h.window.focus_out_signal().handler_count(), 1);
}

#[test]
fn test_disabled_features_drop_subscriptions() {
    let mut h = Harness::new(None);
    h.controller.apply(&Settings::default());
    assert_eq!(h.controller.subscription_count(), 4);

    let settings = Settings::parse("[Misc]\nurgent-on-bell=false\ndynamic-window-title=false\n");
    h.controller.apply(&settings);
    assert_eq!(h.controller.subscription_count(), 0);
    assert_eq!(h.terminal.bell_signal().handler_count(), 0);

    h.terminal.feed(b"\x07\x1b]2;ignored\x07");
    assert!(!h.window.is_urgent());
    assert_eq!(h.window.title(), "");
}

#[test]
fn test_fixed_title_suppresses_title_subscription() {
    let mut h = Harness::new(Some("fixed"));
    h.window.set_title("fixed");
    let settings = Settings::parse("[Misc]\ndynamic-window-title=true\n");
    h.controller.apply(&settings);

    assert_eq!(h.terminal.title_signal().handler_count(), 0);
    h.terminal.feed(b"\x1b]2;vim\x07");
    assert_eq!(h.window.title(), "fixed");
}

#[test]
fn test_dynamic_title_follows_child() {
    let mut h = Harness::new(None);
    h.controller.apply(&Settings::default());

    h.terminal.feed(b"prompt$ \x1b]0;~/src\x07");
    assert_eq!(h.window.title(), "~/src");
    assert_eq!(h.terminal.state().title.as_deref(), Some("~/src"));
    assert!(h.host_text().contains("\x1b]2;~/src\x07"));
    assert!(h.host_text().contains("prompt$ "));
}

#[test]
fn test_full_palette_pushes_seventeen_colors() {
    let mut h = Harness::new(None);
    let settings = Settings::parse(&full_colors_config());
    assert!(settings.has_colors());

    h.clear_host();
    h.controller.apply(&settings);

    let text = h.host_text();
    assert_eq!(text.matches("\x1b]10;").count(), 1);
    assert_eq!(text.matches("\x1b]11;").count(), 1);
    assert_eq!(text.matches("\x1b]4;").count(), 16);
    assert!(text.contains("\x1b]10;rgb:00/00/00\x07"));
    assert!(text.contains("\x1b]11;rgb:ff/ff/ff\x07"));
    assert_eq!(h.terminal.state().colors, settings.colors);
}

#[test]
fn test_partial_palette_pushes_no_colors() {
    let mut h = Harness::new(None);
    let text = full_colors_config().replace("color0f=", "colour0f=");
    let settings = Settings::parse(&text);
    assert!(!settings.has_colors());

    h.clear_host();
    h.controller.apply(&settings);
    assert!(!h.host_text().contains("\x1b]4;"));
    assert_eq!(h.terminal.state().colors, None);
}

#[test]
fn test_dimensions_keep_the_other_axis() {
    let mut h = Harness::new(None);
    h.controller.apply(&Settings::parse("[Misc]\ncolumns=100\n"));
    assert_eq!(h.terminal.size(), (100, 24));
    assert!(h.host_text().contains("\x1b[8;24;100t"));

    h.controller.apply(&Settings::parse("[Misc]\nrows=40\n"));
    assert_eq!(h.terminal.size(), (100, 40));
}

// ============================================================================
// Bell and urgency
// ============================================================================

#[test]
fn test_bell_marks_window_urgent_until_focus() {
    let mut h = Harness::new(None);
    h.controller.apply(&Settings::default());

    h.terminal.feed(b"\x07");
    assert!(h.window.is_urgent());
    h.window.focus_changed(true);
    assert!(!h.window.is_urgent());
}

#[test]
fn test_losing_focus_also_clears_urgency() {
    let mut h = Harness::new(None);
    h.controller.apply(&Settings::default());

    h.terminal.feed(b"\x07");
    assert!(h.window.is_urgent());
    h.window.focus_changed(false);
    assert!(!h.window.is_urgent());
}

#[test]
fn test_audible_bell_reaches_host_only_when_enabled() {
    let mut h = Harness::new(None);
    h.controller.apply(&Settings::default());
    h.clear_host();
    h.terminal.feed(b"a\x07b");
    assert_eq!(h.host_text(), "ab");

    h.controller.apply(&Settings::parse("[Misc]\naudible-bell=true\n"));
    h.clear_host();
    h.terminal.feed(b"a\x07b");
    assert_eq!(h.host_text(), "a\x07b");
}

// ============================================================================
// Font size
// ============================================================================

#[test]
fn test_decrease_never_reaches_zero() {
    let mut h = Harness::new(None);
    h.controller.apply(&Settings::parse("[Font]\nfont=Monospace 3\n"));
    assert_eq!(font_size(&h.terminal), 3 * SCALE);

    for _ in 0..10 {
        h.controller.decrease_font_size();
        assert!(font_size(&h.terminal) > 0);
    }
    assert_eq!(font_size(&h.terminal), SCALE);
}

#[test]
fn test_increase_at_largest_size_is_ignored() {
    let mut h = Harness::new(None);
    h.controller.apply(&Settings::parse("[Font]\nfont=Monospace 9999999\n"));
    assert_eq!(font_size(&h.terminal), MAX_SIZE);

    h.controller.increase_font_size();
    assert_eq!(font_size(&h.terminal), MAX_SIZE);
    assert!(h
        .controller
        .handle_key(KeyPress::new(Key::KeypadAdd, Modifiers::CTRL_SHIFT)));
    assert_eq!(font_size(&h.terminal), MAX_SIZE);

    h.controller.decrease_font_size();
    assert_eq!(font_size(&h.terminal), MAX_SIZE - SCALE);
}

#[test]
fn test_reset_restores_applied_size() {
    let mut h = Harness::new(None);
    h.controller.apply(&Settings::parse("[Font]\nfont=Monospace Bold 10\n"));

    h.controller.increase_font_size();
    h.controller.increase_font_size();
    assert_eq!(font_size(&h.terminal), 12 * SCALE);
    h.controller.reset_font_size();
    assert_eq!(font_size(&h.terminal), 10 * SCALE);

    h.controller.decrease_font_size();
    h.controller.reset_font_size();
    assert_eq!(font_size(&h.terminal), 10 * SCALE);
    assert_eq!(h.terminal.font().family(), Some("Monospace"));
}

#[test]
fn test_font_without_size_resets_to_fallback() {
    let mut h = Harness::new(None);
    h.controller.apply(&Settings::parse("[Font]\nfont=Monospace\n"));
    assert_eq!(h.controller.reset_size(), FALLBACK_SIZE);
}

#[test]
fn test_no_font_keeps_widget_font() {
    let mut h = Harness::new(None);
    let before = h.terminal.font();
    h.clear_host();
    h.controller.apply(&Settings::default());
    assert_eq!(h.terminal.font(), before);
    assert!(!h.host_text().contains("\x1b]50;"));
    assert_eq!(h.controller.reset_size(), before.size());
}

#[test]
fn test_font_sent_to_host() {
    let mut h = Harness::new(None);
    h.controller.apply(&Settings::parse("[Font]\nfont=DejaVu Sans Mono 11\n"));
    assert!(h.host_text().contains("\x1b]50;DejaVu Sans Mono 11\x07"));
}

// ============================================================================
// Key bindings
// ============================================================================

#[test]
fn test_bound_keys_are_consumed() {
    let mut h = Harness::new(None);
    h.controller.apply(&Settings::parse("[Font]\nfont=Monospace 12\n"));

    assert!(h
        .controller
        .handle_key(KeyPress::new(Key::Char('+'), Modifiers::CTRL_SHIFT)));
    assert_eq!(font_size(&h.terminal), 13 * SCALE);
    assert!(h
        .controller
        .handle_key(KeyPress::new(Key::KeypadSubtract, Modifiers::CTRL)));
    assert!(h.controller.handle_key(KeyPress::new(Key::Char('-'), Modifiers::CTRL)));
    assert_eq!(font_size(&h.terminal), 11 * SCALE);
    assert!(h.controller.handle_key(KeyPress::new(Key::Char('='), Modifiers::CTRL)));
    assert_eq!(font_size(&h.terminal), 12 * SCALE);
    assert!(h
        .controller
        .handle_key(KeyPress::new(Key::Char('C'), Modifiers::CTRL_SHIFT)));
}

#[test]
fn test_unbound_keys_are_forwarded() {
    let mut h = Harness::new(None);
    assert!(!h.controller.handle_key(KeyPress::new(Key::Char('c'), Modifiers::CTRL)));
    assert!(!h
        .controller
        .handle_key(KeyPress::new(Key::Char('x'), Modifiers::CTRL_SHIFT)));
}
