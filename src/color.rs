//! Color values for the terminal palette
//!
//! Accepts the textual forms found in configuration files:
//! `#rgb`, `#rrggbb`, `#rrrgggbbb`, `#rrrrggggbbbb`, `rgb(r,g,b)` and
//! `rgba(r,g,b,a)` where components are 0-255 or percentages and alpha is
//! a fraction between 0 and 1. Common X11 color names such as `red` or
//! `dark gray` are accepted too, ignoring case and spaces.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of indexed colors in the palette
pub const PALETTE_SIZE: usize = 16;

/// Failure to parse a color string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{0}'")]
pub struct ParseColorError(pub String);

/// X11 names for the colors most often written by hand
const NAMED_COLORS: &[(&str, Rgba)] = &[
    ("black", Rgba::rgb(0, 0, 0)),
    ("white", Rgba::rgb(255, 255, 255)),
    ("red", Rgba::rgb(255, 0, 0)),
    ("green", Rgba::rgb(0, 255, 0)),
    ("blue", Rgba::rgb(0, 0, 255)),
    ("yellow", Rgba::rgb(255, 255, 0)),
    ("cyan", Rgba::rgb(0, 255, 255)),
    ("magenta", Rgba::rgb(255, 0, 255)),
    ("gray", Rgba::rgb(190, 190, 190)),
    ("grey", Rgba::rgb(190, 190, 190)),
    ("darkgray", Rgba::rgb(169, 169, 169)),
    ("darkgrey", Rgba::rgb(169, 169, 169)),
    ("lightgray", Rgba::rgb(211, 211, 211)),
    ("lightgrey", Rgba::rgb(211, 211, 211)),
    ("darkred", Rgba::rgb(139, 0, 0)),
    ("darkgreen", Rgba::rgb(0, 100, 0)),
    ("darkblue", Rgba::rgb(0, 0, 139)),
    ("darkcyan", Rgba::rgb(0, 139, 139)),
    ("darkmagenta", Rgba::rgb(139, 0, 139)),
    ("orange", Rgba::rgb(255, 165, 0)),
    ("purple", Rgba::rgb(160, 32, 240)),
    ("brown", Rgba::rgb(165, 42, 42)),
    ("navy", Rgba::rgb(0, 0, 128)),
];

/// An 8-bit per channel color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Rgba {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    /// X11 color spec (`rgb:rr/gg/bb`) as understood by OSC 4/10/11.
    pub fn to_x11_spec(&self) -> String {
        format!("rgb:{:02x}/{:02x}/{:02x}", self.red, self.green, self.blue)
    }

    fn parse_hex(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let width = match digits.len() {
            3 | 6 | 9 | 12 => digits.len() / 3,
            _ => return None,
        };
        let channel = |i: usize| -> Option<u8> {
            let value = u32::from_str_radix(&digits[i * width..(i + 1) * width], 16).ok()?;
            let max = (1u32 << (4 * width)) - 1;
            Some(((value * 255 + max / 2) / max) as u8)
        };
        Some(Self::rgb(channel(0)?, channel(1)?, channel(2)?))
    }

    fn parse_name(name: &str) -> Option<Self> {
        let key: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        NAMED_COLORS
            .iter()
            .find(|(known, _)| *known == key)
            .map(|&(_, color)| color)
    }

    fn parse_function(s: &str) -> Option<Self> {
        let (with_alpha, args) = if let Some(rest) = s.strip_prefix("rgba(") {
            (true, rest)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (false, rest)
        } else {
            return None;
        };
        let args = args.strip_suffix(')')?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }

        let mut color = Self::rgb(
            parse_component(parts[0])?,
            parse_component(parts[1])?,
            parse_component(parts[2])?,
        );
        if with_alpha {
            let alpha: f64 = parts[3].parse().ok()?;
            if !(0.0..=1.0).contains(&alpha) {
                return None;
            }
            color.alpha = (alpha * 255.0).round() as u8;
        }
        Some(color)
    }
}

fn parse_component(s: &str) -> Option<u8> {
    if let Some(percent) = s.strip_suffix('%') {
        let value: f64 = percent.trim().parse().ok()?;
        if !(0.0..=100.0).contains(&value) {
            return None;
        }
        return Some((value * 255.0 / 100.0).round() as u8);
    }
    let value: u16 = s.parse().ok()?;
    u8::try_from(value).ok()
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix('#') {
            Some(digits) => Self::parse_hex(digits),
            None => {
                let lower = trimmed.to_ascii_lowercase();
                Self::parse_function(&lower).or_else(|| Self::parse_name(&lower))
            }
        };
        parsed.ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Foreground, background and the 16 indexed colors, always complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub foreground: Rgba,
    pub background: Rgba,
    pub palette: [Rgba; PALETTE_SIZE],
}
