use std::{path::PathBuf, process::ExitStatus};

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not write file {}, error: {source}", filename.display()))]
    WriteFile { filename: PathBuf, source: std::io::Error },

    #[snafu(display("Could not write to stdout, error: {source}"))]
    WriteStdout { source: std::io::Error },

    #[snafu(display("Could not create tokio runtime, error: {source}"))]
    InitializeTokioRuntime { source: std::io::Error },

    #[snafu(display("Could not serialize config, error: {source}"))]
    SerializeConfig { source: toml::ser::Error },

    #[snafu(display("{source}"))]
    History { source: clipnest_store::HistoryError },

    #[snafu(display("{source}"))]
    Settings { source: clipnest_store::SettingsError },

    #[snafu(display("Could not access clipboard, error: {source}"))]
    Clipboard { source: clipnest_clipboard::Error },

    #[snafu(display("Could not decode image, error: {source}"))]
    DecodeImage { source: clipnest_base::ImageError },

    #[snafu(display("{source}"))]
    Preview { source: clipnest_preview::Error },

    #[snafu(display("Background task failed, error: {source}"))]
    JoinTask { source: tokio::task::JoinError },

    #[snafu(display("Could not call {program}, error: {source}"))]
    CallOpener { program: String, source: std::io::Error },

    #[snafu(display("{program} exited with {status}"))]
    OpenerFailed { program: String, status: ExitStatus },

    #[snafu(display("No entry at index {index}"))]
    NoSuchEntry { index: usize },

    #[snafu(display("Entry at index {index} is not an image"))]
    NotAnImage { index: usize },

    #[snafu(display("Entry at index {index} is not a text"))]
    NotAText { index: usize },

    #[snafu(display("Image at index {index} has no recognized text"))]
    NoOcrText { index: usize },
}

impl From<clipnest_store::HistoryError> for Error {
    fn from(source: clipnest_store::HistoryError) -> Self { Self::History { source } }
}

impl From<clipnest_store::SettingsError> for Error {
    fn from(source: clipnest_store::SettingsError) -> Self { Self::Settings { source } }
}

impl From<clipnest_clipboard::Error> for Error {
    fn from(source: clipnest_clipboard::Error) -> Self { Self::Clipboard { source } }
}

pub trait CommandError {
    fn exit_code(&self) -> exitcode::ExitCode;
}

impl CommandError for Error {
    fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::NoSuchEntry { .. }
            | Self::NotAnImage { .. }
            | Self::NotAText { .. }
            | Self::NoOcrText { .. } => exitcode::USAGE,
            Self::History { .. } | Self::DecodeImage { .. } => exitcode::DATAERR,
            Self::Settings { source } => match source {
                clipnest_store::SettingsError::UnknownThemeKey { .. }
                | clipnest_store::SettingsError::InvalidColor { .. }
                | clipnest_store::SettingsError::InvalidOpacity { .. }
                | clipnest_store::SettingsError::InvalidGeometry { .. }
                | clipnest_store::SettingsError::UnknownPreset { .. } => exitcode::USAGE,
                _ => exitcode::IOERR,
            },
            Self::SerializeConfig { .. } => exitcode::CONFIG,
            Self::Clipboard { .. }
            | Self::Preview { .. }
            | Self::CallOpener { .. }
            | Self::OpenerFailed { .. } => exitcode::UNAVAILABLE,
            Self::JoinTask { .. } => exitcode::SOFTWARE,
            Self::WriteFile { .. } | Self::WriteStdout { .. } | Self::InitializeTokioRuntime { .. } => {
                exitcode::IOERR
            }
        }
    }
}
