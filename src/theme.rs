// ── Dark theme ────────────────────────────────────────────────────────────────
//
// One palette of named colours keyed by role, consumed by the class
// background brush, the WM_CTLCOLOR* handlers, and the WM_PAINT chrome path.
// The status line reuses the title-bar colour.
//
// Users may override individual roles via `%APPDATA%\ModernNotepad\theme.json`
// (`{"background": "#1E1E1E", ...}`).  Unknown keys are ignored; a missing or
// malformed file falls back to the built-in palette silently.
//
// Colour conventions:
//   • Roles are stored as BGR COLORREF values, ready for the GDI calls.
//   • The `rgb!` macro converts 0xRR, 0xGG, 0xBB components to that form.

use std::{fs, path::PathBuf};

use serde::Deserialize;

// ── Colour macro ──────────────────────────────────────────────────────────────

/// Convert R, G, B components → a BGR COLORREF value.
macro_rules! rgb {
    ($r:expr, $g:expr, $b:expr) => {
        (($b as u32) << 16) | (($g as u32) << 8) | ($r as u32)
    };
}

// ── Palette ───────────────────────────────────────────────────────────────────

/// Every colour role the chrome and controls draw with.
#[derive(Clone, Copy)]
pub(crate) struct Theme {
    /// Window and editor background.
    pub(crate) background: u32,
    /// Title bar fill; also the status-line fill.
    pub(crate) title_bar: u32,
    /// Menu bar strip fill.
    pub(crate) menu_bar: u32,
    /// Foreground for every piece of text.
    pub(crate) text: u32,
    /// Hover fill for the minimize/maximize caption buttons.
    pub(crate) button_hover: u32,
    /// Hover fill for the close caption button.
    pub(crate) close_button_hover: u32,
    /// Hover fill for the menu bar items.
    pub(crate) menu_hover: u32,
}

/// Built-in dark palette.
pub(crate) const DARK: Theme = Theme {
    background: rgb!(0x1E, 0x1E, 0x1E),
    title_bar: rgb!(0x2D, 0x2D, 0x2D),
    menu_bar: rgb!(0x3A, 0x3A, 0x3A),
    text: rgb!(0xFF, 0xFF, 0xFF),
    button_hover: rgb!(0x3A, 0x3A, 0x3A),
    close_button_hover: rgb!(0xE8, 0x11, 0x23),
    menu_hover: rgb!(0x4A, 0x4A, 0x4A),
};

// ── Override file ─────────────────────────────────────────────────────────────

/// On-disk shape of the optional theme override.  Every role is optional;
/// colours are `"#RRGGBB"` (the `#` may be omitted).
#[derive(Default, Deserialize)]
#[serde(default)]
struct ThemeFile {
    background: Option<String>,
    title_bar: Option<String>,
    menu_bar: Option<String>,
    text: Option<String>,
    button_hover: Option<String>,
    close_button_hover: Option<String>,
    menu_hover: Option<String>,
}

/// Return the override path: `%APPDATA%\ModernNotepad\theme.json`.
///
/// `None` when `APPDATA` is absent from the environment.
fn theme_path() -> Option<PathBuf> {
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("ModernNotepad");
    p.push("theme.json");
    Some(p)
}

/// Load the effective palette: built-in dark, with any roles the override
/// file redefines.  Any error (no file, bad JSON, bad colour) keeps the
/// corresponding defaults.
pub(crate) fn load() -> Theme {
    let Some(path) = theme_path() else {
        return DARK;
    };
    let Ok(data) = fs::read_to_string(&path) else {
        return DARK;
    };
    match parse_theme_file(&data) {
        Some(overrides) => apply_overrides(DARK, &overrides),
        None => DARK,
    }
}

fn parse_theme_file(json: &str) -> Option<ThemeFile> {
    serde_json::from_str(json).ok()
}

fn apply_overrides(mut theme: Theme, file: &ThemeFile) -> Theme {
    if let Some(c) = file.background.as_deref().and_then(parse_color) {
        theme.background = c;
    }
    if let Some(c) = file.title_bar.as_deref().and_then(parse_color) {
        theme.title_bar = c;
    }
    if let Some(c) = file.menu_bar.as_deref().and_then(parse_color) {
        theme.menu_bar = c;
    }
    if let Some(c) = file.text.as_deref().and_then(parse_color) {
        theme.text = c;
    }
    if let Some(c) = file.button_hover.as_deref().and_then(parse_color) {
        theme.button_hover = c;
    }
    if let Some(c) = file.close_button_hover.as_deref().and_then(parse_color) {
        theme.close_button_hover = c;
    }
    if let Some(c) = file.menu_hover.as_deref().and_then(parse_color) {
        theme.menu_hover = c;
    }
    theme
}

/// Parse `"#RRGGBB"` (hash optional) into a COLORREF.
fn parse_color(s: &str) -> Option<u32> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(rgb!(r, g, b))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorref_is_bgr() {
        // COLORREF byte order is 0x00BBGGRR.
        assert_eq!(parse_color("#E81123"), Some(0x2311E8));
    }

    #[test]
    fn hash_prefix_is_optional() {
        assert_eq!(parse_color("2D2D2D"), parse_color("#2D2D2D"));
    }

    #[test]
    fn bad_colors_are_rejected() {
        assert_eq!(parse_color(""), None);
        assert_eq!(parse_color("#FFF"), None);
        assert_eq!(parse_color("#GGGGGG"), None);
        assert_eq!(parse_color("#1E1E1E1E"), None);
    }

    #[test]
    fn default_palette_spot_values() {
        assert_eq!(DARK.background, rgb!(0x1E, 0x1E, 0x1E));
        assert_eq!(DARK.close_button_hover, rgb!(0xE8, 0x11, 0x23));
        assert_eq!(DARK.text, rgb!(0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn override_replaces_only_named_roles() {
        let file = parse_theme_file(r##"{"background": "#000000"}"##).expect("parse");
        let theme = apply_overrides(DARK, &file);
        assert_eq!(theme.background, 0);
        assert_eq!(theme.title_bar, DARK.title_bar);
        assert_eq!(theme.menu_hover, DARK.menu_hover);
    }

    #[test]
    fn unknown_roles_are_ignored() {
        let file = parse_theme_file(r##"{"sparkle": "#FFFFFF", "text": "#ABCDEF"}"##)
            .expect("parse");
        let theme = apply_overrides(DARK, &file);
        assert_eq!(theme.text, rgb!(0xAB, 0xCD, 0xEF));
        assert_eq!(theme.background, DARK.background);
    }

    #[test]
    fn invalid_color_keeps_default() {
        let file = parse_theme_file(r##"{"title_bar": "not-a-color"}"##).expect("parse");
        let theme = apply_overrides(DARK, &file);
        assert_eq!(theme.title_bar, DARK.title_bar);
    }

    #[test]
    fn malformed_json_falls_back() {
        assert!(parse_theme_file("{not json").is_none());
    }
}
