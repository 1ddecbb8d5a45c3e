mod error;
mod theme;

use std::{io::ErrorKind, path::Path};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::{
    error::Error,
    theme::{Theme, ThemePreset, COLOR_KEYS, OPACITY_KEYS},
};

static GEOMETRY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+x\d+([+-]\d+[+-]\d+)?$").expect("geometry pattern is valid"));

/// Window state and theme of the history window, kept apart from the history.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct WindowSettings {
    pub geometry: String,

    pub locked: bool,

    pub theme: Theme,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self { geometry: Self::default_geometry(), locked: false, theme: Theme::default() }
    }
}

impl WindowSettings {
    #[inline]
    #[must_use]
    pub fn default_geometry() -> String { "800x500".to_string() }

    /// Reads settings from `file_path`, a missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but can not be read or parsed.
    pub async fn load<P>(file_path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let file_path = file_path.as_ref();
        match tokio::fs::read(file_path).await {
            Ok(content) => serde_json::from_slice(&content)
                .context(error::ParseSettingsSnafu { file_path: file_path.to_path_buf() }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("Settings file `{}` does not exist", file_path.display());
                Ok(Self::default())
            }
            Err(source) => Err(Error::ReadFile { source, file_path: file_path.to_path_buf() }),
        }
    }

    /// # Errors
    pub async fn save<P>(&self, file_path: P) -> Result<(), Error>
    where
        P: AsRef<Path>,
    {
        let file_path = file_path.as_ref();
        let content =
            serde_json::to_string_pretty(self).context(error::SerializeSettingsSnafu)?;
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context(error::CreateDirectorySnafu { file_path: parent.to_path_buf() })?;
        }
        tokio::fs::write(file_path, content)
            .await
            .context(error::WriteFileSnafu { file_path: file_path.to_path_buf() })
    }

    /// # Errors
    /// Returns an error unless `geometry` looks like `800x500` or `800x500+10+20`.
    pub fn set_geometry(&mut self, geometry: &str) -> Result<(), Error> {
        let geometry = geometry.trim();
        if !GEOMETRY_REGEX.is_match(geometry) {
            return Err(Error::InvalidGeometry { value: geometry.to_string() });
        }
        geometry.clone_into(&mut self.geometry);
        Ok(())
    }

    pub fn apply_preset(&mut self, preset: ThemePreset) { self.theme = preset.theme(); }
}
