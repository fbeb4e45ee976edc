//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::playfield::CellColor;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Capsule colours plus the few UI colours the board and sidebar use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Cell colours indexed by `CellColor::index()`: red, green, blue, yellow.
    pub cells: [Color; 4],
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, level).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Finished or inactive player.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// One Dark hex values: red, green, blue, yellow.
const ONEDARK_CELLS: [Color; 4] = [
    Color::Rgb(0xE0, 0x6C, 0x75),
    Color::Rgb(0x98, 0xC3, 0x79),
    Color::Rgb(0x61, 0xAF, 0xEF),
    Color::Rgb(0xE5, 0xC0, 0x7B),
];

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    pub fn onedark_default() -> Self {
        Self {
            cells: ONEDARK_CELLS,
            bg: Color::Rgb(0x28, 0x2C, 0x34),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0xE5, 0xC0, 0x7B),
            inactive_fg: Color::Rgb(0x5C, 0x63, 0x70),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark if path is None or the file is missing.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => Self::from_map(&parse_theme_file(&std::fs::read_to_string(p)?))?,
            _ => Self::onedark_default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override cell colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.cells = [
                    Color::Rgb(0xFF, 0x00, 0x00),
                    Color::Rgb(0x00, 0xFF, 0x00),
                    Color::Rgb(0x00, 0x88, 0xFF),
                    Color::Rgb(0xFF, 0xFF, 0x00),
                ];
            }
            crate::Palette::Colorblind => {
                // Paul Tol's bright scheme: no red/green pair.
                self.cells = [
                    Color::Rgb(0xEE, 0x77, 0x33),
                    Color::Rgb(0x00, 0x99, 0x88),
                    Color::Rgb(0x00, 0x77, 0xBB),
                    Color::Rgb(0xBB, 0xBB, 0x00),
                ];
            }
        }
    }

    /// Keys: `red`, `green`, `blue`, `yellow`, `bg`, `div_line`, `main_fg`, `title`,
    /// `inactive_fg`. Missing keys keep the One Dark value; a malformed hex is an error.
    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let base = Self::onedark_default();
        let get = |key: &str, fallback: Color| -> Result<Color, ThemeError> {
            map.get(key).map_or(Ok(fallback), |v| parse_hex(v))
        };
        Ok(Self {
            cells: [
                get("red", base.cells[0])?,
                get("green", base.cells[1])?,
                get("blue", base.cells[2])?,
                get("yellow", base.cells[3])?,
            ],
            bg: get("bg", base.bg)?,
            div_line: get("div_line", base.div_line)?,
            main_fg: get("main_fg", base.main_fg)?,
            title: get("title", base.title)?,
            inactive_fg: get("inactive_fg", base.inactive_fg)?,
        })
    }

    #[inline]
    pub fn cell_color(&self, color: CellColor) -> Color {
        self.cells[color.index() as usize]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some((key, rest)) = stripped.split_once(']') else {
            continue;
        };
        let Some((_, value)) = rest.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        if !value.is_empty() {
            map.insert(key.trim().to_string(), value.to_string());
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(matches!(parse_hex("#12"), Err(ThemeError::InvalidHex(_))));
        assert!(matches!(parse_hex("#GG0000"), Err(ThemeError::InvalidHex(_))));
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file("# comment\ntheme[red]=\"#FF0000\"\ntheme[ bg ]='#000'\nnot a theme line");
        assert_eq!(map.get("red"), Some(&"#FF0000".to_string()));
        assert_eq!(map.get("bg"), Some(&"#000".to_string()));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_from_map_overrides_and_falls_back() {
        let map = parse_theme_file("theme[yellow]=\"#FFFF00\"");
        let t = Theme::from_map(&map).unwrap();
        assert_eq!(t.cell_color(CellColor::Yellow), Color::Rgb(255, 255, 0));
        assert_eq!(t.cell_color(CellColor::Red), ONEDARK_CELLS[0]);
    }

    #[test]
    fn test_load_missing_file_uses_default() {
        let t = Theme::load(Some(Path::new("/nonexistent/capsule.theme")), crate::Palette::Normal).unwrap();
        assert_eq!(t, Theme::default());
    }

    #[test]
    fn test_palette_changes_cells_only() {
        let mut t = Theme::default();
        t.apply_palette(crate::Palette::Colorblind);
        assert_ne!(t.cells, ONEDARK_CELLS);
        assert_eq!(t.bg, Theme::default().bg);
    }
}
