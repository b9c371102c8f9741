//! Font descriptions and font size stepping
//!
//! A description is written as `"[FAMILY] [STYLE-WORDS] [SIZE]"`, for example
//! `Monospace Bold 12` or `DejaVu Sans Mono 10.5`. Sizes are stored in
//! `1/SCALE` point units; zoom steps are always one whole point.

use std::fmt;

/// Fixed-point scale of font sizes (units per point)
pub const SCALE: i32 = 1024;

/// Size recorded for reset when a description carries no size
pub const FALLBACK_SIZE: i32 = 12 * SCALE;

/// Largest size a description may carry or zooming may reach
pub const MAX_SIZE: i32 = 1000 * SCALE;

const STYLE_WORDS: &[&str] = &[
    "normal",
    "roman",
    "oblique",
    "italic",
    "small-caps",
    "thin",
    "ultra-light",
    "extra-light",
    "light",
    "semi-light",
    "book",
    "regular",
    "medium",
    "semi-bold",
    "demi-bold",
    "bold",
    "ultra-bold",
    "extra-bold",
    "heavy",
    "black",
    "ultra-condensed",
    "extra-condensed",
    "condensed",
    "semi-condensed",
    "semi-expanded",
    "expanded",
    "extra-expanded",
    "ultra-expanded",
];

/// Parsed font description
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontDescription {
    family: Option<String>,
    styles: Vec<String>,
    /// Size in `1/SCALE` points, 0 when unset
    size: i32,
}

impl FontDescription {
    /// Parse a description string. Never fails: unknown words are taken as
    /// part of the family name.
    pub fn parse(s: &str) -> Self {
        let mut words: Vec<&str> = s.split_whitespace().collect();

        let mut size = 0;
        if let Some(points) = words.last().and_then(|w| w.parse::<f64>().ok()) {
            if points.is_finite() && points > 0.0 {
                size = (points * SCALE as f64).round().min(MAX_SIZE as f64) as i32;
                words.pop();
            }
        }

        let mut styles = Vec::new();
        while let Some(word) = words.last() {
            if !STYLE_WORDS.contains(&word.to_ascii_lowercase().as_str()) {
                break;
            }
            styles.insert(0, word.to_string());
            words.pop();
        }

        let family = words.join(" ");
        let family = family.trim_end_matches(',').trim();
        Self {
            family: (!family.is_empty()).then(|| family.to_string()),
            styles,
            size,
        }
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn set_size(&mut self, size: i32) {
        self.size = size.clamp(0, MAX_SIZE);
    }

    pub fn with_size(mut self, size: i32) -> Self {
        self.set_size(size);
        self
    }
}

impl fmt::Display for FontDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words: Vec<String> = Vec::new();
        if let Some(family) = &self.family {
            words.push(family.clone());
        }
        words.extend(self.styles.iter().cloned());
        if self.size > 0 {
            if self.size % SCALE == 0 {
                words.push((self.size / SCALE).to_string());
            } else {
                let points = self.size as f64 / SCALE as f64;
                words.push(format!("{}", (points * 100.0).round() / 100.0));
            }
        }
        f.write_str(&words.join(" "))
    }
}

/// One whole point larger, dropping any fractional part, or `None` past
/// [`MAX_SIZE`].
pub fn increased_size(size: i32) -> Option<i32> {
    (size / SCALE + 1)
        .checked_mul(SCALE)
        .filter(|&size| size <= MAX_SIZE)
}

/// One whole point smaller, or `None` if that would reach zero.
pub fn decreased_size(size: i32) -> Option<i32> {
    let points = size / SCALE - 1;
    (points > 0).then_some(points * SCALE)
}
