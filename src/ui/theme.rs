use std::fs;
use std::path::Path;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

pub const DEFAULT_THEME: &str = "crayon";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_dim: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub correct: String,
    pub wrong: String,
    pub highlight: String,
}

impl Theme {
    /// User themes in `<config_dir>/letterpop/themes/` shadow bundled ones.
    pub fn load(name: &str) -> Option<Self> {
        Self::load_from(&Config::config_dir().join("themes"), name)
    }

    fn load_from(user_dir: &Path, name: &str) -> Option<Self> {
        let filename = format!("{name}.toml");

        let user_theme_path = user_dir.join(&filename);
        if let Ok(content) = fs::read_to_string(&user_theme_path) {
            match toml::from_str::<Theme>(&content) {
                Ok(theme) => return Some(theme),
                Err(e) => log::warn!("ignoring theme {}: {e}", user_theme_path.display()),
            }
        }

        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#fdfcf0".to_string(),
            fg: "#3d3d3d".to_string(),
            text_dim: "#9a9a8c".to_string(),
            accent: "#ff924c".to_string(),
            accent_dim: "#ffd8b8".to_string(),
            border: "#d8d6c4".to_string(),
            border_focused: "#ff924c".to_string(),
            header_bg: "#ffca3a".to_string(),
            header_fg: "#3d3d3d".to_string(),
            bar_filled: "#8ac926".to_string(),
            bar_empty: "#ecebdc".to_string(),
            correct: "#52a675".to_string(),
            wrong: "#e63946".to_string(),
            highlight: "#1982c4".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_dim(&self) -> Color { Self::parse_color(&self.text_dim) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn correct(&self) -> Color { Self::parse_color(&self.correct) }
    pub fn wrong(&self) -> Color { Self::parse_color(&self.wrong) }
    pub fn highlight(&self) -> Color { Self::parse_color(&self.highlight) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"crayon".to_string()));
        assert!(names.contains(&"chalkboard".to_string()));
        let empty = TempDir::new().unwrap();
        for name in names {
            assert!(Theme::load_from(empty.path(), &name).is_some(), "{name} failed to parse");
        }
    }

    #[test]
    fn user_theme_shadows_bundled() {
        let dir = TempDir::new().unwrap();
        let mut theme = Theme::load_from(dir.path(), "crayon").unwrap();
        theme.name = "my crayon".to_string();
        theme.colors.accent = "#000000".to_string();
        fs::write(dir.path().join("crayon.toml"), toml::to_string(&theme).unwrap()).unwrap();

        let loaded = Theme::load_from(dir.path(), "crayon").unwrap();
        assert_eq!(loaded.name, "my crayon");
        assert_eq!(loaded.colors.accent(), Color::Rgb(0, 0, 0));
    }

    #[test]
    fn unknown_theme_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(Theme::load_from(dir.path(), "neon-void").is_none());
    }

    #[test]
    fn bad_hex_falls_back_to_white() {
        assert_eq!(ThemeColors::parse_color("#12345"), Color::White);
        assert_eq!(ThemeColors::parse_color("zzzzzz"), Color::White);
        assert_eq!(ThemeColors::parse_color("#ff0080"), Color::Rgb(255, 0, 128));
    }
}
