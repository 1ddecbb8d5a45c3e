use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::settings::Error;

static COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("colour pattern is valid"));

pub const COLOR_KEYS: [&str; 15] = [
    "window_bg",
    "title_bg",
    "title_fg",
    "button_frame_bg",
    "button_bg",
    "button_fg",
    "list_bg",
    "list_select_bg",
    "list_fg",
    "search_bg",
    "search_fg",
    "status_bg",
    "status_fg",
    "preview_bg",
    "preview_fg",
];

pub const OPACITY_KEYS: [&str; 4] =
    ["window_opacity", "text_opacity", "button_opacity", "status_opacity"];

/// Colour and opacity table of the history window.
///
/// Keys missing from a settings file take their Light preset value.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Theme {
    pub name: String,

    pub window_bg: String,
    pub title_bg: String,
    pub title_fg: String,
    pub button_frame_bg: String,
    pub button_bg: String,
    pub button_fg: String,
    pub list_bg: String,
    pub list_select_bg: String,
    pub list_fg: String,
    pub search_bg: String,
    pub search_fg: String,
    pub status_bg: String,
    pub status_fg: String,
    pub preview_bg: String,
    pub preview_fg: String,

    pub window_opacity: f64,
    pub text_opacity: f64,
    pub button_opacity: f64,
    pub status_opacity: f64,
}

impl Default for Theme {
    fn default() -> Self { ThemePreset::Light.theme() }
}

impl Theme {
    fn from_palette(name: &str, palette: [&str; 15]) -> Self {
        let [window_bg, title_bg, title_fg, button_frame_bg, button_bg, button_fg, list_bg, list_select_bg, list_fg, search_bg, search_fg, status_bg, status_fg, preview_bg, preview_fg] =
            palette.map(str::to_string);
        Self {
            name: name.to_string(),
            window_bg,
            title_bg,
            title_fg,
            button_frame_bg,
            button_bg,
            button_fg,
            list_bg,
            list_select_bg,
            list_fg,
            search_bg,
            search_fg,
            status_bg,
            status_fg,
            preview_bg,
            preview_fg,
            window_opacity: 1.0,
            text_opacity: 1.0,
            button_opacity: 1.0,
            status_opacity: 1.0,
        }
    }

    fn color_mut(&mut self, key: &str) -> Option<&mut String> {
        let color = match key {
            "window_bg" => &mut self.window_bg,
            "title_bg" => &mut self.title_bg,
            "title_fg" => &mut self.title_fg,
            "button_frame_bg" => &mut self.button_frame_bg,
            "button_bg" => &mut self.button_bg,
            "button_fg" => &mut self.button_fg,
            "list_bg" => &mut self.list_bg,
            "list_select_bg" => &mut self.list_select_bg,
            "list_fg" => &mut self.list_fg,
            "search_bg" => &mut self.search_bg,
            "search_fg" => &mut self.search_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "preview_bg" => &mut self.preview_bg,
            "preview_fg" => &mut self.preview_fg,
            _ => return None,
        };
        Some(color)
    }

    fn opacity_mut(&mut self, key: &str) -> Option<&mut f64> {
        let opacity = match key {
            "window_opacity" => &mut self.window_opacity,
            "text_opacity" => &mut self.text_opacity,
            "button_opacity" => &mut self.button_opacity,
            "status_opacity" => &mut self.status_opacity,
            _ => return None,
        };
        Some(opacity)
    }

    /// Sets one key of the table, a customized theme is renamed to `Custom`.
    ///
    /// # Errors
    /// Returns an error if `key` is unknown or `value` does not fit the key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let value = value.trim();
        if key == "name" {
            value.clone_into(&mut self.name);
            return Ok(());
        }

        if let Some(color) = self.color_mut(key) {
            if !COLOR_REGEX.is_match(value) {
                return Err(Error::InvalidColor { value: value.to_string() });
            }
            *color = value.to_lowercase();
        } else if let Some(opacity) = self.opacity_mut(key) {
            *opacity = value
                .parse::<f64>()
                .ok()
                .filter(|v| (0.0..=1.0).contains(v))
                .ok_or_else(|| Error::InvalidOpacity { value: value.to_string() })?;
        } else {
            return Err(Error::UnknownThemeKey { key: key.to_string() });
        }

        "Custom".clone_into(&mut self.name);
        Ok(())
    }

    /// All keys and their values in file order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut theme = self.clone();
        let mut entries = vec![("name", self.name.clone())];
        for key in COLOR_KEYS {
            let value = theme.color_mut(key).cloned().unwrap_or_default();
            entries.push((key, value));
        }
        for key in OPACITY_KEYS {
            let value = theme.opacity_mut(key).map(|o| format!("{o:.2}")).unwrap_or_default();
            entries.push((key, value));
        }
        entries
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ThemePreset {
    #[default]
    Light,
    Dark,
    Ocean,
    Purple,
}

impl ThemePreset {
    pub const ALL: [Self; 4] = [Self::Light, Self::Dark, Self::Ocean, Self::Purple];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::Ocean => "Ocean",
            Self::Purple => "Purple",
        }
    }

    #[must_use]
    pub fn theme(self) -> Theme {
        let palette = match self {
            Self::Light => [
                "#ecf0f1", "#2c3e50", "#ffffff", "#34495e", "#3498db", "#ffffff", "#ecf0f1",
                "#3498db", "#000000", "#ecf0f1", "#000000", "#34495e", "#ffffff", "#ecf0f1",
                "#000000",
            ],
            Self::Dark => [
                "#2c3e50", "#1a1a1a", "#ecf0f1", "#34495e", "#3498db", "#ffffff", "#34495e",
                "#3498db", "#ecf0f1", "#2c3e50", "#ecf0f1", "#1a1a1a", "#ecf0f1", "#34495e",
                "#ecf0f1",
            ],
            Self::Ocean => [
                "#e8f4f8", "#006994", "#ffffff", "#0080b8", "#00a8e8", "#ffffff", "#d9f0f7",
                "#00a8e8", "#003f5c", "#d9f0f7", "#003f5c", "#006994", "#ffffff", "#d9f0f7",
                "#003f5c",
            ],
            Self::Purple => [
                "#f3e5f5", "#6a1b9a", "#ffffff", "#8e24aa", "#ab47bc", "#ffffff", "#e1bee7",
                "#ab47bc", "#4a148c", "#e1bee7", "#4a148c", "#6a1b9a", "#ffffff", "#e1bee7",
                "#4a148c",
            ],
        };
        Theme::from_palette(self.name(), palette)
    }
}

impl fmt::Display for ThemePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for ThemePreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownPreset { value: s.to_string() })
    }
}
