use std::path::Path;

use clap::Subcommand;
use clipnest_store::{ThemePreset, WindowSettings};

use crate::error::Error;

#[derive(Clone, Subcommand)]
pub enum ThemeCommands {
    #[clap(about = "Print the current theme")]
    Show,

    #[clap(about = "List the theme presets")]
    Presets,

    #[clap(about = "Replace the theme with a preset (Light, Dark, Ocean, Purple)")]
    Apply { preset: ThemePreset },

    #[clap(about = "Set one colour (#rrggbb) or opacity (0.0 - 1.0) of the theme")]
    Set { key: String, value: String },

    #[clap(about = "Restore the Light theme")]
    Reset,
}

/// Applies a theme command to the settings file and returns the lines to
/// print.
pub async fn run_theme(command: ThemeCommands, file_path: &Path) -> Result<Vec<String>, Error> {
    let mut settings = WindowSettings::load(file_path).await?;
    let lines = match command {
        ThemeCommands::Show => {
            return Ok(settings
                .theme
                .entries()
                .into_iter()
                .map(|(key, value)| format!("{key} = {value}"))
                .collect());
        }
        ThemeCommands::Presets => {
            return Ok(ThemePreset::ALL.iter().map(ToString::to_string).collect());
        }
        ThemeCommands::Apply { preset } => {
            settings.apply_preset(preset);
            vec![format!("Theme is set to {preset}")]
        }
        ThemeCommands::Set { key, value } => {
            settings.theme.set(&key, &value)?;
            vec![format!("{key} is set to {}", value.trim())]
        }
        ThemeCommands::Reset => {
            settings.apply_preset(ThemePreset::default());
            vec!["Theme is reset to default".to_string()]
        }
    };
    settings.save(file_path).await?;
    Ok(lines)
}

pub async fn set_locked(locked: bool, file_path: &Path) -> Result<String, Error> {
    let mut settings = WindowSettings::load(file_path).await?;
    settings.locked = locked;
    settings.save(file_path).await?;
    Ok(if locked { "Window locked" } else { "Window unlocked" }.to_string())
}

/// Prints the window geometry, or changes it when `geometry` is given.
pub async fn geometry(geometry: Option<String>, file_path: &Path) -> Result<String, Error> {
    let mut settings = WindowSettings::load(file_path).await?;
    match geometry {
        Some(geometry) => {
            settings.set_geometry(&geometry)?;
            settings.save(file_path).await?;
            Ok(format!("Geometry is set to {}", settings.geometry))
        }
        None => Ok(settings.geometry),
    }
}
