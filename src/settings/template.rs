//! Commented configuration written on first run

/// Every recognized key, commented out, with its default or an example value.
pub const TEMPLATE: &str = "\
# miniterm configuration
#
# Remove the leading '#' of a line to change that setting.

[Font]
# Font description: family, optional style words, size in points.
#font=Monospace 12

[Colors]
# Colors are used only when foreground, background and all sixteen
# colorNN entries are set and valid.
#foreground=#d4d4d4
#background=#1e1e1e
#color00=#000000
#color01=#cd3131
#color02=#0dbc79
#color03=#e5e510
#color04=#2472c8
#color05=#bc3fbc
#color06=#11a8cd
#color07=#e5e5e5
#color08=#666666
#color09=#f14c4c
#color0a=#23d18b
#color0b=#f5f543
#color0c=#3b8eea
#color0d=#d670d6
#color0e=#29b8db
#color0f=#ffffff

[Misc]
# Follow the title reported by the running program.
#dynamic-window-title=true
# Mark the window urgent when the bell rings.
#urgent-on-bell=true
#audible-bell=false
#use-scrollbar=false
#autohide-mouse=true
#scrollback-lines=10000
# Initial size in character cells.
#columns=80
#rows=24
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Rgba, PALETTE_SIZE};
    use crate::settings::{palette_key, Settings};

    const KEYS: &[&str] = &[
        "font",
        "foreground",
        "background",
        "dynamic-window-title",
        "urgent-on-bell",
        "audible-bell",
        "use-scrollbar",
        "autohide-mouse",
        "scrollback-lines",
        "columns",
        "rows",
    ];

    #[test]
    fn test_template_lists_every_key_commented() {
        let palette: Vec<String> = (0..PALETTE_SIZE).map(palette_key).collect();
        for key in KEYS.iter().copied().chain(palette.iter().map(String::as_str)) {
            let commented = format!("\n#{}=", key);
            assert!(TEMPLATE.contains(&commented), "template lacks {}", key);
        }
    }

    #[test]
    fn test_template_parses_to_defaults() {
        assert_eq!(Settings::parse(TEMPLATE), Settings::default());
    }

    #[test]
    fn test_template_colors_are_valid_when_uncommented() {
        let enabled = TEMPLATE.replace("\n#foreground", "\nforeground").replace(
            "\n#background",
            "\nbackground",
        );
        let enabled = (0..PALETTE_SIZE).fold(enabled, |text, i| {
            let key = palette_key(i);
            text.replace(&format!("\n#{}=", key), &format!("\n{}=", key))
        });
        let colors = Settings::parse(&enabled).colors.expect("template colors parse");
        assert_eq!(colors.background, Rgba::rgb(0x1e, 0x1e, 0x1e));
    }
}
