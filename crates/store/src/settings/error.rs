use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to read settings file {}, error: {source}", file_path.display()))]
    ReadFile { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to write settings file {}, error: {source}", file_path.display()))]
    WriteFile { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to create directory {}, error: {source}", file_path.display()))]
    CreateDirectory { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to parse settings file {}, error: {source}", file_path.display()))]
    ParseSettings { source: serde_json::Error, file_path: PathBuf },

    #[snafu(display("Failed to serialize settings, error: {source}"))]
    SerializeSettings { source: serde_json::Error },

    #[snafu(display("Unknown theme key `{key}`"))]
    UnknownThemeKey { key: String },

    #[snafu(display("Invalid colour `{value}`, expected `#rrggbb`"))]
    InvalidColor { value: String },

    #[snafu(display("Invalid opacity `{value}`, expected a number between 0.0 and 1.0"))]
    InvalidOpacity { value: String },

    #[snafu(display("Invalid geometry `{value}`, expected `WIDTHxHEIGHT[+X+Y]`"))]
    InvalidGeometry { value: String },

    #[snafu(display("Unknown theme preset `{value}`"))]
    UnknownPreset { value: String },
}
