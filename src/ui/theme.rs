//! Color schemes and ANSI escape sequence generation.
//!
//! Built-in themes are embedded TOML files; custom themes are loaded from a TOML
//! file at startup.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: dark (default)
//! - `catppuccin-latte`: light
//! - `gruvbox-dark`: warm dark with a header background
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! # header_bg = "#313244"   (optional)
//! cursor_fg = "#1e1e2e"
//! cursor_bg = "#89b4fa"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#89b4fa"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! checkbox_fg = "#a6e3a1"
//! badge_fg = "#1e1e2e"
//! badge_bg = "#cba6f7"
//! scrollbar_track = "#313244"
//! scrollbar_thumb = "#7f849c"
//! empty_state_fg = "#89b4fa"
//! loader_fg = "#f5c2e7"
//! ```

use crate::domain::error::{Result, ZontactsError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colors (`"#rrggbb"`) for every UI element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_bg: Option<String>,

    /// Row under the keyboard cursor.
    pub cursor_fg: String,
    pub cursor_bg: String,

    pub text_normal: String,
    /// Secondary text: avatar URLs, placeholder, footer.
    pub text_dim: String,

    pub border: String,
    pub search_bar_border: String,

    /// Search match highlight.
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    /// Checked checkbox mark.
    pub checkbox_fg: String,

    /// Initials badge standing in for the avatar image.
    pub badge_fg: String,
    pub badge_bg: String,

    pub scrollbar_track: String,
    pub scrollbar_thumb: String,

    pub empty_state_fg: String,
    pub loader_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name, or `None` for an unknown name.
    ///
    /// # Example
    ///
    /// ```
    /// use zontacts::ui::Theme;
    ///
    /// let theme = Theme::from_name("catppuccin-latte").unwrap();
    /// assert_eq!(theme.name, "catppuccin-latte");
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "gruvbox-dark" => include_str!("../../themes/gruvbox-dark.toml"),
            _ => return None,
        };

        toml::from_str(toml_str)
            .map_err(|e| tracing::warn!(theme = name, error = %e, "built-in theme failed to parse"))
            .ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ZontactsError::Theme`] if the file cannot be read or is not a
    /// valid theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ZontactsError::Theme(format!("failed to read theme file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| ZontactsError::Theme(format!("failed to parse theme TOML: {e}")))
    }

    /// Parses `#rrggbb`; anything else renders as white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// 24-bit foreground escape sequence.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn italic() -> &'static str {
        "\u{001b}[3m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }

    /// Palette used if the embedded default theme cannot be parsed.
    fn fallback() -> Self {
        let c = |hex: &str| hex.to_string();
        Self {
            name: "fallback".to_string(),
            colors: ThemeColors {
                header_fg: c("#ffffff"),
                header_bg: None,
                cursor_fg: c("#000000"),
                cursor_bg: c("#c0c0c0"),
                text_normal: c("#ffffff"),
                text_dim: c("#808080"),
                border: c("#808080"),
                search_bar_border: c("#c0c0c0"),
                match_highlight_fg: c("#000000"),
                match_highlight_bg: c("#ffff00"),
                checkbox_fg: c("#00ff00"),
                badge_fg: c("#000000"),
                badge_bg: c("#c0c0c0"),
                scrollbar_track: c("#404040"),
                scrollbar_thumb: c("#c0c0c0"),
                empty_state_fg: c("#c0c0c0"),
                loader_fg: c("#c0c0c0"),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(Self::fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn every_builtin_theme_parses() {
        for name in ["catppuccin-mocha", "catppuccin-latte", "gruvbox-dark"] {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert_eq!(Theme::default().name, DEFAULT_THEME);
    }

    #[test]
    fn hex_colors_become_escape_sequences() {
        assert_eq!(Theme::fg("#ff8000"), "\u{1b}[38;2;255;128;0m");
        assert_eq!(Theme::bg("000000"), "\u{1b}[48;2;0;0;0m");
        assert_eq!(Theme::fg("nope"), "\u{1b}[38;2;255;255;255m");
    }

    #[test]
    fn theme_file_round_trip_and_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let toml = toml::to_string(&Theme::fallback()).unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        assert_eq!(Theme::from_file(file.path()).unwrap(), Theme::fallback());

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Theme::from_file(dir.path().join("missing.toml")),
            Err(ZontactsError::Theme(_))
        ));
    }
}
