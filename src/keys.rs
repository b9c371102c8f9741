//! Key bindings handled by miniterm itself

/// Modifier state of a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: true,
    };
    pub const CTRL_SHIFT: Modifiers = Modifiers {
        shift: true,
        alt: false,
        ctrl: true,
    };

    /// Decode the xterm modifier parameter (1 + bitmask).
    pub fn from_param(param: u32) -> Self {
        let bits = param.saturating_sub(1);
        Self {
            shift: bits & 1 != 0,
            alt: bits & 2 != 0,
            ctrl: bits & 4 != 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    KeypadAdd,
    KeypadSubtract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Copy,
    Paste,
    IncreaseFontSize,
    DecreaseFontSize,
    ResetFontSize,
    ReloadSettings,
}

/// Look up the binding for `press`, if any.
pub fn action_for(press: KeyPress) -> Option<Action> {
    let key = match press.key {
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        other => other,
    };

    if press.modifiers == Modifiers::CTRL_SHIFT {
        match key {
            Key::Char('c') => Some(Action::Copy),
            Key::Char('v') => Some(Action::Paste),
            Key::Char('+') | Key::Char('=') | Key::KeypadAdd => Some(Action::IncreaseFontSize),
            Key::Char('r') => Some(Action::ReloadSettings),
            _ => None,
        }
    } else if press.modifiers == Modifiers::CTRL {
        match key {
            Key::Char('-') | Key::KeypadSubtract => Some(Action::DecreaseFontSize),
            Key::Char('=') => Some(Action::ResetFontSize),
            _ => None,
        }
    } else {
        None
    }
}
